#![cfg_attr(not(test), no_std)]

//! nvparam - Non-volatile parameter table for firmware
//!
//! Maps short string identifiers to fixed-size typed scalar values. A working
//! copy lives in a caller-owned RAM block and a durable mirror lives in
//! byte-addressable non-volatile storage (EEPROM, flash, battery-backed RAM).
//! Every mutation is propagated cell-by-cell through the [`RomInterface`]
//! capability, and the table header carries a checksum that is verified on
//! startup.
//!
//! # Modules
//!
//! - [`platform`]: storage capability trait, platform errors, mock ROM
//! - [`core`]: parameter table engine, logging, shared-access wrappers
//!
//! # Example
//!
//! ```
//! use nvparam::core::parameters::{ParamTable, ParamValue, TableConfig, TableTag};
//! use nvparam::platform::mock::MockRom;
//!
//! let mut ram = [0u8; 1024];
//! let mut rom = MockRom::<2048>::new();
//! let config = TableConfig::new(TableTag::new("TEST").unwrap());
//!
//! let mut table = ParamTable::init(config, &mut ram, &mut rom).unwrap();
//! let speed = table.create("WP_SPEED", ParamValue::F32(2.5)).unwrap();
//! assert_eq!(speed, ParamValue::F32(2.5));
//! ```
//!
//! [`RomInterface`]: platform::traits::RomInterface

pub mod core;
pub mod platform;
