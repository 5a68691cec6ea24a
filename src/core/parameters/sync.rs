//! RAM/ROM synchronization with bounded retry
//!
//! This is the only path by which the RAM mirror and the durable tier
//! exchange data. Each sync copies exactly one record (one cell, or the
//! header) in one direction.

use super::error::ParamError;
use super::layout::{TableInfo, CELL_SIZE, TABLE_INFO_SIZE};
use crate::platform::traits::RomInterface;

/// Copy direction of a sync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncDirection {
    /// Persist the RAM copy
    RamToRom,
    /// Load the durable copy
    RomToRam,
}

/// Record being synchronized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncTarget {
    /// Table header
    Header,
    /// Cell at index
    Cell(u16),
}

impl core::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SyncDirection::RamToRom => write!(f, "RAM->ROM"),
            SyncDirection::RomToRam => write!(f, "ROM->RAM"),
        }
    }
}

impl core::fmt::Display for SyncTarget {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SyncTarget::Header => write!(f, "header"),
            SyncTarget::Cell(index) => write!(f, "cell {}", index),
        }
    }
}

/// Retry budget exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryExhausted {
    /// Attempts made
    pub attempts: u8,
}

/// Run `op` up to `max_attempts` times, stopping at the first success
///
/// The closure receives the 1-based attempt number. There is no delay
/// between attempts. A budget of zero fails without calling `op`.
pub fn retry<T, E, F>(max_attempts: u8, mut op: F) -> Result<T, RetryExhausted>
where
    F: FnMut(u8) -> Result<T, E>,
{
    for attempt in 1..=max_attempts {
        if let Ok(value) = op(attempt) {
            return Ok(value);
        }
        crate::log_trace!("sync attempt {} of {} failed", attempt, max_attempts);
    }
    Err(RetryExhausted {
        attempts: max_attempts,
    })
}

/// Sync engine bound to one table region in ROM
///
/// Holds the storage capability and the ROM base offset. Cell `i` lives at
/// `rom_base + TABLE_INFO_SIZE + i * CELL_SIZE`; the header at `rom_base`.
pub struct SyncEngine<R: RomInterface> {
    rom: R,
    rom_base: u32,
}

impl<R: RomInterface> SyncEngine<R> {
    /// Create a sync engine for the table at `rom_base`
    pub fn new(rom: R, rom_base: u32) -> Self {
        Self { rom, rom_base }
    }

    /// ROM base offset of the table
    pub fn rom_base(&self) -> u32 {
        self.rom_base
    }

    /// ROM offset of cell `index`
    pub fn cell_offset(&self, index: u16) -> Option<u32> {
        let rel = TABLE_INFO_SIZE as u32 + index as u32 * CELL_SIZE as u32;
        self.rom_base.checked_add(rel)
    }

    /// Checksum through the storage capability
    pub fn checksum(&self, data: &[u8]) -> u16 {
        self.rom.checksum(data)
    }

    /// Storage capability
    pub fn rom(&self) -> &R {
        &self.rom
    }

    /// Storage capability (mutable, for testing)
    pub fn rom_mut(&mut self) -> &mut R {
        &mut self.rom
    }

    /// Release the storage capability
    pub fn into_rom(self) -> R {
        self.rom
    }

    /// Synchronize one cell of `ram` with its ROM mirror
    ///
    /// # Errors
    ///
    /// - `AddressOutOfBounds` if the cell does not fit in `ram`; checked
    ///   before any storage access, no attempt is consumed
    /// - `SyncFailure` once `max_retry` attempts have failed
    pub fn cell_sync(
        &mut self,
        ram: &mut [u8],
        index: u16,
        direction: SyncDirection,
        max_retry: u8,
    ) -> Result<(), ParamError> {
        let start = index as usize * CELL_SIZE;
        let end = start + CELL_SIZE;
        if end > ram.len() {
            crate::log_warn!("cell {} outside parameter block", index);
            return Err(ParamError::AddressOutOfBounds { index });
        }
        let offset = self
            .cell_offset(index)
            .ok_or(ParamError::AddressOutOfBounds { index })?;

        let cell = &mut ram[start..end];
        let rom = &mut self.rom;
        retry(max_retry, |_| match direction {
            SyncDirection::RamToRom => rom.write(offset, &*cell),
            SyncDirection::RomToRam => rom.read(offset, &mut *cell),
        })
        .map_err(|e| {
            crate::log_warn!("sync cell {} failed after {} attempts", index, e.attempts);
            ParamError::SyncFailure {
                target: SyncTarget::Cell(index),
                direction,
                attempts: e.attempts,
            }
        })
    }

    /// Synchronize the table header with its ROM mirror
    ///
    /// On a failed `RomToRam` sync `info` is left untouched.
    ///
    /// # Errors
    ///
    /// `SyncFailure` once `max_retry` attempts have failed.
    pub fn info_sync(
        &mut self,
        info: &mut TableInfo,
        direction: SyncDirection,
        max_retry: u8,
    ) -> Result<(), ParamError> {
        let offset = self.rom_base;
        let rom = &mut self.rom;
        let mut buf = info.to_bytes();

        retry(max_retry, |_| match direction {
            SyncDirection::RamToRom => rom.write(offset, &buf),
            SyncDirection::RomToRam => rom.read(offset, &mut buf),
        })
        .map_err(|e| {
            crate::log_warn!("sync header failed after {} attempts", e.attempts);
            ParamError::SyncFailure {
                target: SyncTarget::Header,
                direction,
                attempts: e.attempts,
            }
        })?;

        if direction == SyncDirection::RomToRam {
            if let Some(loaded) = TableInfo::from_bytes(&buf) {
                *info = loaded;
            }
        }
        Ok(())
    }
}
