//! Platform abstraction traits
//!
//! This module defines the traits that storage backends must provide.

pub mod rom;

pub use rom::RomInterface;
