//! Parameter table error types
//!
//! Every public table operation reports failure through [`ParamError`].

use super::sync::{SyncDirection, SyncTarget};

/// Errors from parameter table operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamError {
    /// Cell index lies past the end of the RAM block (never retried)
    AddressOutOfBounds {
        /// Offending cell index
        index: u16,
    },
    /// Every sync attempt failed
    SyncFailure {
        /// Header or cell being synchronized
        target: SyncTarget,
        /// Copy direction
        direction: SyncDirection,
        /// Attempts made before giving up
        attempts: u8,
    },
    /// Replayed cells do not match the stored check value
    ChecksumMismatch {
        /// Check value stored in the header
        stored: u16,
        /// Check value computed over the RAM mirror
        computed: u16,
    },
    /// Unrecognized type tag, or value type differs from the stored type
    TypeMismatch {
        /// Offending type tag
        tag: u8,
    },
    /// No matching cell and no free slot left in the block
    NoSpaceAvailable,
    /// No occupied cell with the requested name
    NotFound,
    /// Parameter name longer than 15 bytes
    NameTooLong,
    /// Table tag longer than 15 bytes
    TagTooLong,
    /// Identifier is empty, contains NUL, or is not UTF-8
    InvalidName,
    /// RAM block holds more cells than a `u16` can count
    BlockTooLarge,
}

impl core::fmt::Display for ParamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParamError::AddressOutOfBounds { index } => {
                write!(f, "cell {} lies outside the parameter block", index)
            }
            ParamError::SyncFailure {
                target,
                direction,
                attempts,
            } => write!(
                f,
                "sync of {} ({}) failed after {} attempts",
                target, direction, attempts
            ),
            ParamError::ChecksumMismatch { stored, computed } => write!(
                f,
                "parameter table corrupted (stored {:#06x}, computed {:#06x})",
                stored, computed
            ),
            ParamError::TypeMismatch { tag } => write!(f, "type mismatch for tag {}", tag),
            ParamError::NoSpaceAvailable => write!(f, "parameter table full"),
            ParamError::NotFound => write!(f, "parameter not found"),
            ParamError::NameTooLong => write!(f, "parameter name too long"),
            ParamError::TagTooLong => write!(f, "table tag too long"),
            ParamError::InvalidName => write!(f, "invalid identifier"),
            ParamError::BlockTooLarge => write!(f, "parameter block too large"),
        }
    }
}
