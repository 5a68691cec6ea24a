//! Non-volatile storage interface trait
//!
//! This module defines the storage capability the parameter table consumes.
//! It covers byte-addressable EEPROM, flash behind a translation layer, FRAM,
//! or battery-backed SRAM.

use crate::core::parameters::checksum::calculate_crc16;
use crate::platform::Result;

/// Non-volatile storage capability
///
/// Three operations are required by the table engine: read a byte range,
/// write a byte range, and compute a checksum over a RAM byte range.
///
/// # Storage Characteristics
///
/// - Offsets are byte offsets relative to the start of the device
/// - Writes must be byte-granular: any `data.len()` at any offset
/// - A failed read or write may be retried by the caller; it must leave the
///   device in a state where a retry can succeed
///
/// # Safety Invariants
///
/// - Only one owner per device (no concurrent access)
/// - `checksum` must be a pure function and must not change between firmware
///   builds, otherwise every stored table fails its startup check
///
/// # Memory Layout
///
/// ```text
/// [TableInfo]   rom_base                    (20 bytes)
/// [Cell 0]      rom_base + 20               (25 bytes)
/// [Cell 1]      rom_base + 45               (25 bytes)
/// ...
/// [Cell i]      rom_base + 20 + i * 25
/// ```
pub trait RomInterface {
    /// Read data from storage
    ///
    /// Reads `buf.len()` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Rom(RomError::InvalidAddress)` if the range is out of bounds.
    /// Returns `PlatformError::Rom(RomError::ReadFailed)` if the device reports a failure.
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<()>;

    /// Write data to storage
    ///
    /// Writes `data` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Rom(RomError::InvalidAddress)` if the range is out of bounds.
    /// Returns `PlatformError::Rom(RomError::WriteFailed)` if the device reports a failure.
    fn write(&mut self, offset: u32, data: &[u8]) -> Result<()>;

    /// Compute the check value over a byte range
    ///
    /// Defaults to CRC-16/IBM-3740.
    fn checksum(&self, data: &[u8]) -> u16 {
        calculate_crc16(data)
    }
}

impl<T: RomInterface + ?Sized> RomInterface for &mut T {
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        (**self).write(offset, data)
    }

    fn checksum(&self, data: &[u8]) -> u16 {
        (**self).checksum(data)
    }
}
