use thiserror::Error;

/// Failure of a single bus access.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    #[error("illegal access at 0x{addr:04X}: address is not mapped")]
    Unmapped { addr: u16 },

    #[error("write to ROM at 0x{addr:04X}")]
    ReadOnly { addr: u16 },
}

impl BusError {
    pub fn addr(&self) -> u16 {
        match *self {
            BusError::Unmapped { addr } | BusError::ReadOnly { addr } => addr,
        }
    }
}

/// Byte-addressable memory as seen by the CPU.
///
/// A multi-byte access is all-or-nothing: when any byte of the range is
/// rejected the whole call fails and nothing is written.
pub trait Bus {
    /// Returns `len` consecutive bytes starting at `addr`.
    fn read(&self, addr: u16, len: usize) -> Result<&[u8], BusError>;

    /// Stores `bytes` starting at `addr`.
    fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), BusError>;

    fn read_byte(&self, addr: u16) -> Result<u8, BusError> {
        Ok(self.read(addr, 1)?[0])
    }

    /// Little-endian 16-bit read.
    fn read_word(&self, addr: u16) -> Result<u16, BusError> {
        let bytes = self.read(addr, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn write_byte(&mut self, addr: u16, val: u8) -> Result<(), BusError> {
        self.write(addr, &[val])
    }
}
