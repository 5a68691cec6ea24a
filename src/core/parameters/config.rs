//! Parameter table configuration

use super::layout::TableTag;

/// Sync attempts per record before giving up
pub const DEFAULT_MAX_RETRY: u8 = 4;

/// Parameter table configuration
///
/// # Example
///
/// ```
/// use nvparam::core::parameters::{TableConfig, TableTag};
///
/// let config = TableConfig::new(TableTag::new("NAV").unwrap())
///     .with_rom_base(0x0100)
///     .with_max_retry(2);
///
/// assert_eq!(config.rom_base, 0x0100);
/// assert_eq!(config.max_retry, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Tag identifying the table in ROM
    pub tag: TableTag,
    /// ROM offset of the table header
    pub rom_base: u32,
    /// Attempts per sync before reporting `SyncFailure`
    pub max_retry: u8,
}

impl TableConfig {
    /// Configuration with the table at ROM offset 0 and the default retry budget
    pub fn new(tag: TableTag) -> Self {
        Self {
            tag,
            rom_base: 0,
            max_retry: DEFAULT_MAX_RETRY,
        }
    }

    /// Place the table header at `rom_base`
    pub fn with_rom_base(mut self, rom_base: u32) -> Self {
        self.rom_base = rom_base;
        self
    }

    /// Set the number of attempts per sync
    pub fn with_max_retry(mut self, max_retry: u8) -> Self {
        self.max_retry = max_retry;
        self
    }
}
