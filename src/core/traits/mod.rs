//! Core traits for platform-agnostic table access.
//!
//! # Features
//!
//! - **`embassy`**: Enables `EmbassyState<T>`
//! - `MockState<T>` is always available for host testing

pub mod sync;

pub use sync::{MockState, SharedState};

#[cfg(feature = "embassy")]
pub use sync::EmbassyState;
