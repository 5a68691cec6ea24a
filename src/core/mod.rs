//! Core parameter table functionality
//!
//! This module contains the table engine, the logging macros it uses, and the
//! wrappers that serialize access to a shared table.

pub mod logging;
pub mod parameters;
pub mod traits;
