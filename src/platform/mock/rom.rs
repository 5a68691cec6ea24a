//! Mock ROM implementation for testing
//!
//! Provides an in-memory, byte-addressable non-volatile store with fault
//! injection for host tests.

use crate::platform::{
    error::{PlatformError, RomError},
    traits::RomInterface,
    Result,
};

/// Fault injection policy for one direction (read or write)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fault {
    /// Every call succeeds
    #[default]
    None,
    /// Every call fails
    Always,
    /// The next `n` calls fail, later calls succeed
    Next(u32),
    /// The next `n` calls succeed, every later call fails
    AfterSuccesses(u32),
}

impl Fault {
    /// Consume one call and report whether it fails
    fn trip(&mut self) -> bool {
        match self {
            Fault::None => false,
            Fault::Always => true,
            Fault::Next(0) => {
                *self = Fault::None;
                false
            }
            Fault::Next(n) => {
                *n -= 1;
                true
            }
            Fault::AfterSuccesses(0) => true,
            Fault::AfterSuccesses(n) => {
                *n -= 1;
                false
            }
        }
    }
}

/// Mock ROM of `N` bytes
///
/// Simulates a byte-addressable non-volatile device. Supports:
/// - Read/write with bounds checking
/// - Failure injection per direction
/// - Corruption injection (bit-rot simulation)
/// - Torn writes (power-loss simulation)
/// - Call counters for retry verification
/// - An overridable checksum function
///
/// # Example
///
/// ```
/// use nvparam::platform::mock::MockRom;
/// use nvparam::platform::traits::RomInterface;
///
/// let mut rom = MockRom::<256>::new();
/// rom.write(0x10, &[0x50, 0x41, 0x52, 0x41]).unwrap();
///
/// let mut buf = [0u8; 4];
/// rom.read(0x10, &mut buf).unwrap();
/// assert_eq!(&buf, b"PARA");
/// assert_eq!(rom.write_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct MockRom<const N: usize> {
    /// Device contents
    storage: [u8; N],
    /// Read fault policy
    read_fault: Fault,
    /// Write fault policy
    write_fault: Fault,
    /// Tear the next write in half and fail every write after it
    power_loss: bool,
    /// Set once a simulated power loss has happened
    powered_off: bool,
    /// Number of read calls (successful or not)
    reads: u32,
    /// Number of write calls (successful or not)
    writes: u32,
    /// Checksum override
    checksum_fn: Option<fn(&[u8]) -> u16>,
}

impl<const N: usize> MockRom<N> {
    /// Create a zero-filled device (fresh EEPROM)
    pub fn new() -> Self {
        Self::filled(0x00)
    }

    /// Create a device in the erased flash state (all 0xFF)
    pub fn erased() -> Self {
        Self::filled(0xFF)
    }

    fn filled(byte: u8) -> Self {
        Self {
            storage: [byte; N],
            read_fault: Fault::None,
            write_fault: Fault::None,
            power_loss: false,
            powered_off: false,
            reads: 0,
            writes: 0,
            checksum_fn: None,
        }
    }

    /// Use `f` instead of the default CRC-16 as check function
    pub fn with_checksum(mut self, f: fn(&[u8]) -> u16) -> Self {
        self.checksum_fn = Some(f);
        self
    }

    /// Get device contents (for test verification)
    pub fn contents(&self, offset: u32, len: usize) -> &[u8] {
        &self.storage[offset as usize..offset as usize + len]
    }

    /// Whole device image
    pub fn image(&self) -> &[u8; N] {
        &self.storage
    }

    /// Inject corruption at offset (bit-rot simulation)
    ///
    /// Every byte in the range is XORed with `0xAA`, so it always changes.
    pub fn inject_corruption(&mut self, offset: u32, len: usize) {
        for byte in &mut self.storage[offset as usize..offset as usize + len] {
            *byte ^= 0xAA;
        }
    }

    /// Set the read fault policy
    pub fn set_read_fault(&mut self, fault: Fault) {
        self.read_fault = fault;
    }

    /// Set the write fault policy
    pub fn set_write_fault(&mut self, fault: Fault) {
        self.write_fault = fault;
    }

    /// Simulate power loss during the next write
    ///
    /// The next write only stores its first half and fails. Every later
    /// write fails with `ResourceUnavailable` until
    /// [`MockRom::restore_power`] is called.
    pub fn simulate_power_loss(&mut self) {
        self.power_loss = true;
    }

    /// Bring the device back after a simulated power loss
    pub fn restore_power(&mut self) {
        self.power_loss = false;
        self.powered_off = false;
    }

    /// Number of read calls so far
    pub fn read_count(&self) -> u32 {
        self.reads
    }

    /// Number of write calls so far
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Reset read and write counters
    pub fn reset_counters(&mut self) {
        self.reads = 0;
        self.writes = 0;
    }

    fn check_range(offset: u32, len: usize) -> Result<core::ops::Range<usize>> {
        let start = offset as usize;
        let end = start
            .checked_add(len)
            .ok_or(RomError::InvalidAddress)?;
        if end > N {
            return Err(RomError::InvalidAddress.into());
        }
        Ok(start..end)
    }
}

impl<const N: usize> Default for MockRom<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RomInterface for MockRom<N> {
    fn read(&mut self, offset: u32, buf: &mut [u8]) -> Result<()> {
        self.reads += 1;
        let range = Self::check_range(offset, buf.len())?;

        if self.read_fault.trip() {
            return Err(RomError::ReadFailed.into());
        }

        buf.copy_from_slice(&self.storage[range]);
        Ok(())
    }

    fn write(&mut self, offset: u32, data: &[u8]) -> Result<()> {
        self.writes += 1;
        let range = Self::check_range(offset, data.len())?;

        if self.powered_off {
            return Err(PlatformError::ResourceUnavailable);
        }

        if self.power_loss {
            // Torn write: only the first half reaches the device
            let half = data.len() / 2;
            self.storage[range.start..range.start + half].copy_from_slice(&data[..half]);
            self.power_loss = false;
            self.powered_off = true;
            return Err(RomError::WriteFailed.into());
        }

        if self.write_fault.trip() {
            return Err(RomError::WriteFailed.into());
        }

        self.storage[range].copy_from_slice(data);
        Ok(())
    }

    fn checksum(&self, data: &[u8]) -> u16 {
        match self.checksum_fn {
            Some(f) => f(data),
            None => crate::core::parameters::checksum::calculate_crc16(data),
        }
    }
}
