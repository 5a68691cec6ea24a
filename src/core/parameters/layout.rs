//! Binary layout of the parameter table
//!
//! The table is an array of fixed-width cells preceded (in ROM only) by a
//! header. Both records are packed with no padding and encoded field by field,
//! so the in-memory representation of the Rust structs never leaks into
//! storage.
//!
//! ```text
//! Cell (25 bytes)                 TableInfo (20 bytes)
//! +--------+------+---------+     +-----------+------------+-------------+
//! | name   | type | data    |     | table_tag | used_index | check_value |
//! | 0..16  | 16   | 17..25  |     | 0..16     | 16..18 LE  | 18..20 LE   |
//! +--------+------+---------+     +-----------+------------+-------------+
//! ```

use super::error::ParamError;
use super::value::{ParamType, ParamValue, DATA_LEN};
use heapless::String;

/// Size of the name and tag buffers, including the NUL terminator
pub const NAME_LEN: usize = 16;

/// Maximum identifier length in bytes
pub const MAX_NAME_LEN: usize = NAME_LEN - 1;

/// First name byte of an unused cell
pub const EMPTY_BYTE: u8 = 0x00;

/// Size of one cell in bytes
pub const CELL_SIZE: usize = NAME_LEN + 1 + DATA_LEN;

/// Size of the table header in bytes
pub const TABLE_INFO_SIZE: usize = NAME_LEN + 2 + 2;

/// Offset of the type tag inside a cell
pub const TYPE_OFFSET: usize = NAME_LEN;

/// Offset of the payload inside a cell
pub const DATA_OFFSET: usize = NAME_LEN + 1;

fn validate_identifier(ident: &str) -> Result<(), ParamError> {
    if ident.is_empty() || ident.as_bytes().contains(&0) {
        return Err(ParamError::InvalidName);
    }
    Ok(())
}

fn identifier_bytes(ident: &str) -> [u8; NAME_LEN] {
    let mut buf = [EMPTY_BYTE; NAME_LEN];
    buf[..ident.len()].copy_from_slice(ident.as_bytes());
    buf
}

/// Stored identifier: bytes up to the first NUL, or the whole buffer
fn stored_identifier(buf: &[u8; NAME_LEN]) -> &[u8] {
    let end = buf.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
    &buf[..end]
}

fn identifier_from_bytes(
    buf: &[u8; NAME_LEN],
    too_long: ParamError,
) -> Result<String<MAX_NAME_LEN>, ParamError> {
    let raw = stored_identifier(buf);
    let text = core::str::from_utf8(raw).map_err(|_| ParamError::InvalidName)?;
    validate_identifier(text)?;
    let mut out = String::new();
    out.push_str(text).map_err(|_| too_long)?;
    Ok(out)
}

/// Parameter identifier, 1 to 15 bytes, no NUL
///
/// Oversized names are rejected, never truncated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamName(String<MAX_NAME_LEN>);

impl ParamName {
    /// Validate and wrap a parameter name
    pub fn new(name: &str) -> Result<Self, ParamError> {
        validate_identifier(name)?;
        let mut inner = String::new();
        inner
            .push_str(name)
            .map_err(|_| ParamError::NameTooLong)?;
        Ok(Self(inner))
    }

    /// Decode a stored name buffer
    pub fn from_bytes(buf: &[u8; NAME_LEN]) -> Result<Self, ParamError> {
        identifier_from_bytes(buf, ParamError::NameTooLong).map(Self)
    }

    /// NUL-padded name buffer
    pub fn to_bytes(&self) -> [u8; NAME_LEN] {
        identifier_bytes(&self.0)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare against a stored NUL-terminated name buffer
    pub fn matches(&self, buf: &[u8; NAME_LEN]) -> bool {
        stored_identifier(buf) == self.0.as_bytes()
    }
}

impl TryFrom<&str> for ParamName {
    type Error = ParamError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl core::fmt::Display for ParamName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table identification tag, 1 to 15 bytes, no NUL
///
/// A ROM region whose stored tag differs from this one byte-for-byte is
/// treated as foreign and reformatted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableTag(String<MAX_NAME_LEN>);

impl TableTag {
    /// Validate and wrap a table tag
    pub fn new(tag: &str) -> Result<Self, ParamError> {
        validate_identifier(tag)?;
        let mut inner = String::new();
        inner.push_str(tag).map_err(|_| ParamError::TagTooLong)?;
        Ok(Self(inner))
    }

    /// NUL-padded tag buffer
    pub fn to_bytes(&self) -> [u8; NAME_LEN] {
        identifier_bytes(&self.0)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<&str> for TableTag {
    type Error = ParamError;

    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        Self::new(tag)
    }
}

/// One parameter record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// NUL-terminated name, first byte `EMPTY_BYTE` when unused
    pub name: [u8; NAME_LEN],
    /// Scalar type tag
    pub type_tag: u8,
    /// Little-endian payload
    pub data: [u8; DATA_LEN],
}

impl Cell {
    /// Size of a cell in bytes
    pub const SIZE: usize = CELL_SIZE;

    /// An unused cell (all bytes `EMPTY_BYTE`)
    pub const fn empty() -> Self {
        Self {
            name: [EMPTY_BYTE; NAME_LEN],
            type_tag: EMPTY_BYTE,
            data: [EMPTY_BYTE; DATA_LEN],
        }
    }

    /// Create an occupied cell holding `value`
    pub fn new(name: &ParamName, value: ParamValue) -> Self {
        Self {
            name: name.to_bytes(),
            type_tag: value.param_type().tag(),
            data: value.to_bytes(),
        }
    }

    /// Serialize cell to bytes
    pub fn to_bytes(&self) -> [u8; CELL_SIZE] {
        let mut buf = [0u8; CELL_SIZE];
        buf[..NAME_LEN].copy_from_slice(&self.name);
        buf[TYPE_OFFSET] = self.type_tag;
        buf[DATA_OFFSET..].copy_from_slice(&self.data);
        buf
    }

    /// Deserialize cell from bytes
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < CELL_SIZE {
            return None;
        }

        let mut cell = Self::empty();
        cell.name.copy_from_slice(&buf[..NAME_LEN]);
        cell.type_tag = buf[TYPE_OFFSET];
        cell.data.copy_from_slice(&buf[DATA_OFFSET..CELL_SIZE]);
        Some(cell)
    }

    /// True when the slot holds no parameter
    pub fn is_empty(&self) -> bool {
        self.name[0] == EMPTY_BYTE
    }

    /// Decode the stored name
    pub fn name(&self) -> Result<ParamName, ParamError> {
        ParamName::from_bytes(&self.name)
    }

    /// Decode the stored type, `None` for an unrecognized tag
    pub fn param_type(&self) -> Option<ParamType> {
        ParamType::from_tag(self.type_tag)
    }

    /// Decode the stored value
    pub fn value(&self) -> Result<ParamValue, ParamError> {
        ParamValue::decode(self.type_tag, &self.data)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

/// Table header
///
/// Kept outside the RAM block; stored in ROM at the table base offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableInfo {
    /// NUL-padded table identification tag
    pub table_tag: [u8; NAME_LEN],
    /// Number of occupied cells (index of the first free cell)
    pub used_index: u16,
    /// Checksum over the occupied region of the RAM block
    pub check_value: u16,
}

impl TableInfo {
    /// Size of header in bytes
    pub const SIZE: usize = TABLE_INFO_SIZE;

    /// All-zero header, as found in blank EEPROM
    pub const fn blank() -> Self {
        Self {
            table_tag: [EMPTY_BYTE; NAME_LEN],
            used_index: 0,
            check_value: 0,
        }
    }

    /// Create a header for `tag`
    pub fn new(tag: &TableTag, used_index: u16, check_value: u16) -> Self {
        Self {
            table_tag: tag.to_bytes(),
            used_index,
            check_value,
        }
    }

    /// Byte-for-byte tag comparison, NUL padding included
    pub fn tag_matches(&self, tag: &TableTag) -> bool {
        self.table_tag == tag.to_bytes()
    }

    /// Serialize header to bytes (little-endian)
    pub fn to_bytes(&self) -> [u8; TABLE_INFO_SIZE] {
        let mut buf = [0u8; TABLE_INFO_SIZE];
        buf[..NAME_LEN].copy_from_slice(&self.table_tag);
        buf[16..18].copy_from_slice(&self.used_index.to_le_bytes());
        buf[18..20].copy_from_slice(&self.check_value.to_le_bytes());
        buf
    }

    /// Deserialize header from bytes (little-endian)
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < TABLE_INFO_SIZE {
            return None;
        }

        let mut table_tag = [0u8; NAME_LEN];
        table_tag.copy_from_slice(&buf[..NAME_LEN]);
        let used_index = u16::from_le_bytes([buf[16], buf[17]]);
        let check_value = u16::from_le_bytes([buf[18], buf[19]]);

        Some(Self {
            table_tag,
            used_index,
            check_value,
        })
    }
}
