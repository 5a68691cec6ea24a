//! Platform abstraction layer
//!
//! This module isolates everything that touches physical storage. The table
//! engine only sees the [`RomInterface`] trait.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result, RomError};
pub use traits::RomInterface;
