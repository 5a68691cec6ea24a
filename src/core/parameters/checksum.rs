//! Check value calculation for the parameter table
//!
//! The table header stores a 16-bit check value computed over the occupied
//! region of the RAM block. The storage backend chooses the algorithm through
//! [`RomInterface::checksum`]; this module provides the default.
//!
//! [`RomInterface::checksum`]: crate::platform::traits::RomInterface::checksum

use crc::{Crc, CRC_16_IBM_3740};

/// CRC-16 algorithm (IBM-3740 / CCITT-FALSE)
const CRC16: Crc<u16> = Crc::<u16>::new(&CRC_16_IBM_3740);

/// Calculate CRC-16 checksum of data
///
/// Uses CRC-16/IBM-3740 (polynomial 0x1021, init 0xFFFF, no reflection).
///
/// # Example
///
/// ```
/// use nvparam::core::parameters::checksum::calculate_crc16;
///
/// assert_eq!(calculate_crc16(b"123456789"), 0x29B1);
/// ```
pub fn calculate_crc16(data: &[u8]) -> u16 {
    CRC16.checksum(data)
}
