//! Parameter table
//!
//! Named, typed scalar parameters kept in a caller-owned RAM block and
//! mirrored cell-by-cell into non-volatile storage.
//!
//! # Layout
//!
//! ```text
//! rom_base + 0                 TableInfo   tag[16] used_index:u16 check_value:u16
//! rom_base + 20 + i * 25       Cell i      name[16] type:u8 data[8]
//! ```
//!
//! All multi-byte fields are little-endian. The RAM block holds cells only;
//! the header lives in [`ParamTable`].

pub mod checksum;
pub mod config;
pub mod error;
pub mod layout;
pub mod sync;
pub mod table;
pub mod value;

pub use checksum::calculate_crc16;
pub use config::{TableConfig, DEFAULT_MAX_RETRY};
pub use error::ParamError;
pub use layout::{
    Cell, ParamName, TableInfo, TableTag, CELL_SIZE, EMPTY_BYTE, MAX_NAME_LEN, NAME_LEN,
    TABLE_INFO_SIZE,
};
pub use sync::{SyncDirection, SyncTarget};
pub use table::ParamTable;
pub use value::{load_value, ParamType, ParamValue, DATA_LEN};
