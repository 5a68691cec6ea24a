//! Platform error types
//!
//! This module defines error types returned by storage backends.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// Storage drivers map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Non-volatile storage operation failed
    Rom(RomError),
    /// Storage peripheral not ready or busy
    ResourceUnavailable,
}

/// Non-volatile storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RomError {
    /// Read operation failed
    ReadFailed,
    /// Write operation failed
    WriteFailed,
    /// Offset or length outside the device
    InvalidAddress,
}

impl From<RomError> for PlatformError {
    fn from(err: RomError) -> Self {
        PlatformError::Rom(err)
    }
}

impl fmt::Display for RomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RomError::ReadFailed => write!(f, "read failed"),
            RomError::WriteFailed => write!(f, "write failed"),
            RomError::InvalidAddress => write!(f, "invalid address"),
        }
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Rom(e) => write!(f, "ROM error: {}", e),
            PlatformError::ResourceUnavailable => write!(f, "Resource not available"),
        }
    }
}
