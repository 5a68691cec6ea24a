//! Mock platform implementation for testing
//!
//! This module provides a mock storage backend that can be used for unit
//! testing without requiring actual hardware.
//!
//! # Feature Gate
//!
//! This module is available in two contexts:
//! - During test builds (`#[cfg(test)]`)
//! - When the `mock` feature is enabled

#![cfg(any(test, feature = "mock"))]

pub mod rom;

pub use rom::{Fault, MockRom};
