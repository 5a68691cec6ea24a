//! Parameter table engine
//!
//! `ParamTable` owns nothing but the table header: the RAM block is borrowed
//! from the caller and the storage capability is supplied at init. All reads
//! are served from RAM; every mutation is propagated to ROM one record at a
//! time, cells first and the header last.
//!
//! # Partial failures
//!
//! A mutating operation updates RAM before syncing. When a sync fails the
//! operation stops at once, returns `SyncFailure`, and RAM keeps the change.
//! No further record is attempted: the remaining cells of a `delete` are not
//! written, and the header is never written after a failed cell sync.
//!
//! What ROM holds afterwards depends on the operation:
//!
//! - `create`: the new cell lies past the stored `used_index`, so the next
//!   `init` loads the previous table.
//! - `change`: the cell may hold the new value under the old check value,
//!   and the next `init` reports `ChecksumMismatch`.
//! - `delete`: ROM may hold a mix of shifted and unshifted cells under the
//!   old header, and the next `init` reports `ChecksumMismatch`.
//!
//! [`ParamTable::format`] is the recovery path after `ChecksumMismatch`.

use super::config::TableConfig;
use super::error::ParamError;
use super::layout::{Cell, ParamName, TableInfo, TableTag, CELL_SIZE, EMPTY_BYTE};
use super::sync::{SyncDirection, SyncEngine};
use super::value::{load_value, ParamType, ParamValue};
use crate::platform::traits::RomInterface;

/// Search outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Cell holding the requested name
    Occupied(u16),
    /// First unused cell
    Free(u16),
}

/// Non-volatile parameter table
///
/// # Example
///
/// ```
/// use nvparam::core::parameters::{ParamTable, ParamValue, TableConfig, TableTag};
/// use nvparam::platform::mock::MockRom;
///
/// let mut ram = [0u8; 1024];
/// let mut rom = MockRom::<2048>::new();
/// let config = TableConfig::new(TableTag::new("TEST").unwrap());
///
/// let mut table = ParamTable::init(config, &mut ram, &mut rom).unwrap();
/// table.create("ABCDEF", ParamValue::F64(1024.0)).unwrap();
/// table.change("ABCDEF", ParamValue::F64(512.0)).unwrap();
/// assert_eq!(table.get("ABCDEF"), Some(ParamValue::F64(512.0)));
/// ```
pub struct ParamTable<'a, R: RomInterface> {
    /// RAM mirror, `capacity()` cells
    ram: &'a mut [u8],
    /// Header (RAM copy)
    info: TableInfo,
    /// Tag this table answers to
    tag: TableTag,
    /// Attempts per sync
    max_retry: u8,
    /// ROM access
    sync: SyncEngine<R>,
}

impl<'a, R: RomInterface> ParamTable<'a, R> {
    fn new_unloaded(config: TableConfig, ram: &'a mut [u8], rom: R) -> Result<Self, ParamError> {
        if ram.len() / CELL_SIZE > u16::MAX as usize {
            return Err(ParamError::BlockTooLarge);
        }
        ram.fill(EMPTY_BYTE);

        Ok(Self {
            ram,
            info: TableInfo::blank(),
            tag: config.tag,
            max_retry: config.max_retry,
            sync: SyncEngine::new(rom, config.rom_base),
        })
    }

    /// Load the table from ROM
    ///
    /// Zero-fills `ram`, reads the header, and replays cells
    /// `0..used_index` into RAM. A ROM region whose tag differs from
    /// `config.tag` is formatted as a fresh empty table instead.
    ///
    /// # Errors
    ///
    /// - `BlockTooLarge` if `ram` holds more than `u16::MAX` cells
    /// - `SyncFailure` if the header or a cell could not be transferred
    /// - `AddressOutOfBounds` if the stored cell count exceeds the RAM block
    /// - `ChecksumMismatch` if the replayed cells fail the check; the caller
    ///   decides whether to [`format`](Self::format) the region
    pub fn init(config: TableConfig, ram: &'a mut [u8], rom: R) -> Result<Self, ParamError> {
        let mut table = Self::new_unloaded(config, ram, rom)?;
        table.load_header()?;

        if !table.info.tag_matches(&table.tag) {
            crate::log_info!(
                "No table '{}' at ROM offset {}, formatting",
                table.tag.as_str(),
                table.sync.rom_base()
            );
            table.write_blank_header()?;
        }

        for index in 0..table.info.used_index {
            table.load_cell(index)?;
        }

        table.verify()?;
        crate::log_debug!(
            "Parameter table '{}' loaded, {} entries",
            table.tag.as_str(),
            table.info.used_index
        );
        Ok(table)
    }

    /// Create an empty table, discarding whatever the ROM region holds
    ///
    /// Recovery path after `init` reports `ChecksumMismatch`.
    pub fn format(config: TableConfig, ram: &'a mut [u8], rom: R) -> Result<Self, ParamError> {
        let mut table = Self::new_unloaded(config, ram, rom)?;
        table.write_blank_header()?;
        crate::log_info!("Parameter table '{}' formatted", table.tag.as_str());
        Ok(table)
    }

    /// Drop every parameter and persist an empty header
    pub fn reset(&mut self) -> Result<(), ParamError> {
        self.ram.fill(EMPTY_BYTE);
        self.write_blank_header()
    }

    /// Get or create a parameter
    ///
    /// If `name` already exists its stored value is returned unchanged and
    /// `default` is ignored, even when its type differs. Otherwise a new cell
    /// holding `default` is appended and persisted.
    ///
    /// # Errors
    ///
    /// - `NameTooLong` / `InvalidName` for a malformed name
    /// - `NoSpaceAvailable` if the block is full (nothing is mutated)
    /// - `SyncFailure` if persisting failed; the cell stays in RAM
    pub fn create(&mut self, name: &str, default: ParamValue) -> Result<ParamValue, ParamError> {
        let name = ParamName::new(name)?;
        self.create_cell(&name, default.param_type(), &default.to_bytes())
    }

    /// Get or create a parameter from a raw type tag and payload bytes
    ///
    /// `default` holds the little-endian payload; only the type's width is
    /// copied. An unrecognized tag is rejected before anything is written.
    pub fn create_raw(
        &mut self,
        name: &str,
        type_tag: u8,
        default: &[u8],
    ) -> Result<ParamValue, ParamError> {
        let name = ParamName::new(name)?;
        let param_type = ParamType::from_tag(type_tag).ok_or_else(|| {
            crate::log_warn!("Parameter {} type error (tag {})", name.as_str(), type_tag);
            ParamError::TypeMismatch { tag: type_tag }
        })?;
        self.create_cell(&name, param_type, default)
    }

    fn create_cell(
        &mut self,
        name: &ParamName,
        param_type: ParamType,
        default: &[u8],
    ) -> Result<ParamValue, ParamError> {
        let index = match self.search(name) {
            Some(Slot::Occupied(index)) => return self.value_at(index),
            Some(Slot::Free(index)) => index,
            None => {
                crate::log_warn!("No space for parameter {}", name.as_str());
                return Err(ParamError::NoSpaceAvailable);
            }
        };

        let mut cell = Cell::empty();
        cell.name = name.to_bytes();
        cell.type_tag = param_type.tag();
        load_value(&mut cell.data, default, cell.type_tag)?;

        self.write_cell(index, &cell);
        self.info.used_index += 1;
        self.refresh_check_value();
        crate::log_debug!("Parameter {} created at cell {}", name.as_str(), index);

        self.persist_cell(index)?;
        self.persist_header()?;
        cell.value()
    }

    /// Overwrite the value of an existing parameter
    ///
    /// The type is fixed at creation: `value` must have the stored type.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no parameter has this name
    /// - `TypeMismatch` if `value` has a different type (nothing is mutated)
    /// - `SyncFailure` if persisting failed; RAM keeps the new value
    pub fn change(&mut self, name: &str, value: ParamValue) -> Result<ParamValue, ParamError> {
        let name = ParamName::new(name)?;
        let index = self.find(&name).ok_or(ParamError::NotFound)?;
        let cell = self.cell(index).ok_or(ParamError::AddressOutOfBounds { index })?;

        let tag = value.param_type().tag();
        if tag != cell.type_tag {
            crate::log_warn!("Parameter {} type error (tag {})", name.as_str(), tag);
            return Err(ParamError::TypeMismatch { tag });
        }

        self.update_data(index, cell, &value.to_bytes())
    }

    /// Overwrite the value of an existing parameter with raw payload bytes
    ///
    /// Copies the width of the stored type from `value`.
    pub fn change_raw(&mut self, name: &str, value: &[u8]) -> Result<ParamValue, ParamError> {
        let name = ParamName::new(name)?;
        let index = self.find(&name).ok_or(ParamError::NotFound)?;
        let cell = self.cell(index).ok_or(ParamError::AddressOutOfBounds { index })?;
        self.update_data(index, cell, value)
    }

    fn update_data(&mut self, index: u16, mut cell: Cell, src: &[u8]) -> Result<ParamValue, ParamError> {
        load_value(&mut cell.data, src, cell.type_tag)?;

        self.write_cell(index, &cell);
        self.refresh_check_value();

        self.persist_cell(index)?;
        self.persist_header()?;
        cell.value()
    }

    /// Remove a parameter
    ///
    /// Every later cell moves down one slot, so the occupied cells stay
    /// contiguous. All moved cells and the vacated tail slot are re-synced,
    /// then the header.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no parameter has this name
    /// - `SyncFailure` if persisting failed; RAM keeps the compacted table
    pub fn delete(&mut self, name: &str) -> Result<(), ParamError> {
        let name = ParamName::new(name)?;
        let index = self.find(&name).ok_or(ParamError::NotFound)?;

        let start = index as usize * CELL_SIZE;
        let end = self.info.used_index as usize * CELL_SIZE;
        self.ram[start..start + CELL_SIZE].fill(EMPTY_BYTE);
        self.ram.copy_within(start + CELL_SIZE..end, start);
        self.ram[end - CELL_SIZE..end].fill(EMPTY_BYTE);

        self.info.used_index -= 1;
        self.refresh_check_value();
        crate::log_debug!("Parameter {} deleted from cell {}", name.as_str(), index);

        for moved in index..=self.info.used_index {
            self.persist_cell(moved)?;
        }
        self.persist_header()
    }

    /// Current value of a parameter
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        let name = ParamName::new(name).ok()?;
        let index = self.find(&name)?;
        self.value_at(index).ok()
    }

    /// Cell index of a parameter
    pub fn index_of(&self, name: &str) -> Option<u16> {
        let name = ParamName::new(name).ok()?;
        self.find(&name)
    }

    /// Name of the parameter stored at `index`
    ///
    /// # Errors
    ///
    /// `NotFound` if `index >= len()`.
    pub fn name_at(&self, index: u16) -> Result<ParamName, ParamError> {
        if index >= self.info.used_index {
            return Err(ParamError::NotFound);
        }
        self.cell(index).ok_or(ParamError::NotFound)?.name()
    }

    /// Occupied cells in index order
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.info.used_index).filter_map(move |index| self.cell(index))
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.info.used_index as usize
    }

    pub fn is_empty(&self) -> bool {
        self.info.used_index == 0
    }

    /// Number of cells that fit in the RAM block
    pub fn capacity(&self) -> usize {
        self.ram.len() / CELL_SIZE
    }

    pub fn table_tag(&self) -> &TableTag {
        &self.tag
    }

    /// Check value over the occupied region, as last computed
    pub fn check_value(&self) -> u16 {
        self.info.check_value
    }

    /// Header (RAM copy)
    pub fn info(&self) -> &TableInfo {
        &self.info
    }

    /// Raw RAM mirror
    pub fn ram(&self) -> &[u8] {
        self.ram
    }

    /// Storage capability
    pub fn rom(&self) -> &R {
        self.sync.rom()
    }

    /// Storage capability (mutable, for testing)
    pub fn rom_mut(&mut self) -> &mut R {
        self.sync.rom_mut()
    }

    /// Release the storage capability
    pub fn into_rom(self) -> R {
        self.sync.into_rom()
    }

    /// Recompute the check value over RAM and compare with the header
    pub fn verify(&self) -> Result<(), ParamError> {
        let stored = self.info.check_value;
        let computed = self.sync.checksum(self.occupied());
        if computed != stored {
            crate::log_error!(
                "Parameter table '{}' checksum error: stored {}, computed {}",
                self.tag.as_str(),
                stored,
                computed
            );
            return Err(ParamError::ChecksumMismatch { stored, computed });
        }
        Ok(())
    }

    /// Linear scan for `name` or the first unused cell
    ///
    /// `None` when the block is full and holds no cell named `name`.
    fn search(&self, name: &ParamName) -> Option<Slot> {
        let mut index = 0u16;
        while let Some(cell) = self.cell(index) {
            if cell.is_empty() {
                return Some(Slot::Free(index));
            }
            if name.matches(&cell.name) {
                return Some(Slot::Occupied(index));
            }
            index += 1;
        }
        None
    }

    /// Index of the occupied cell named `name`
    fn find(&self, name: &ParamName) -> Option<u16> {
        match self.search(name) {
            Some(Slot::Occupied(index)) if index < self.info.used_index => Some(index),
            _ => None,
        }
    }

    /// Cell at `index`, `None` if it does not fit in the block
    fn cell(&self, index: u16) -> Option<Cell> {
        let start = index as usize * CELL_SIZE;
        self.ram
            .get(start..start + CELL_SIZE)
            .and_then(Cell::from_bytes)
    }

    fn value_at(&self, index: u16) -> Result<ParamValue, ParamError> {
        self.cell(index)
            .ok_or(ParamError::AddressOutOfBounds { index })?
            .value()
    }

    fn write_cell(&mut self, index: u16, cell: &Cell) {
        let start = index as usize * CELL_SIZE;
        self.ram[start..start + CELL_SIZE].copy_from_slice(&cell.to_bytes());
    }

    fn occupied(&self) -> &[u8] {
        &self.ram[..self.info.used_index as usize * CELL_SIZE]
    }

    fn refresh_check_value(&mut self) {
        self.info.check_value = self.sync.checksum(self.occupied());
    }

    fn write_blank_header(&mut self) -> Result<(), ParamError> {
        let check_value = self.sync.checksum(&[]);
        self.info = TableInfo::new(&self.tag, 0, check_value);
        self.persist_header()
    }

    fn load_header(&mut self) -> Result<(), ParamError> {
        self.sync
            .info_sync(&mut self.info, SyncDirection::RomToRam, self.max_retry)
    }

    fn persist_header(&mut self) -> Result<(), ParamError> {
        self.sync
            .info_sync(&mut self.info, SyncDirection::RamToRom, self.max_retry)
    }

    fn load_cell(&mut self, index: u16) -> Result<(), ParamError> {
        self.sync
            .cell_sync(self.ram, index, SyncDirection::RomToRam, self.max_retry)
    }

    fn persist_cell(&mut self, index: u16) -> Result<(), ParamError> {
        self.sync
            .cell_sync(self.ram, index, SyncDirection::RamToRom, self.max_retry)
    }
}
