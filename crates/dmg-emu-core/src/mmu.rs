use std::ops::RangeInclusive;

use crate::bus::{Bus, BusError};

// Memory map from gbdev.io/pandocs/Memory_Map.html, limited to the regions
// backed by this machine. Everything else is unmapped, including the I/O
// registers at 0xFE00..=0xFF7F: accesses there fail instead of being dropped.
const ROM_RANGE: RangeInclusive<u16> = 0x0000..=0x3FFF;
const VRAM_RANGE: RangeInclusive<u16> = 0x8000..=0x9FFF;
const WRAM_RANGE: RangeInclusive<u16> = 0xC000..=0xDFFF;
const HRAM_RANGE: RangeInclusive<u16> = 0xFF80..=0xFFFE;

const ROM_BANK_SIZE: usize = 0x4000;
const VRAM_SIZE: usize = 0x2000;
const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7F;

// Value seen when reading past the end of a short ROM image.
const OPEN_BUS: u8 = 0xFF;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Region {
    Rom,
    Vram,
    Wram,
    Hram,
}

impl Region {
    fn range(self) -> RangeInclusive<u16> {
        match self {
            Region::Rom => ROM_RANGE,
            Region::Vram => VRAM_RANGE,
            Region::Wram => WRAM_RANGE,
            Region::Hram => HRAM_RANGE,
        }
    }

    fn containing(addr: u16) -> Option<Self> {
        [Region::Rom, Region::Vram, Region::Wram, Region::Hram]
            .into_iter()
            .find(|r| r.range().contains(&addr))
    }
}

/// Address-mapped bus for a DMG without bank switching or I/O registers.
pub struct Mmu {
    rom: Vec<u8>,
    vram: [u8; VRAM_SIZE],
    wram: [u8; WRAM_SIZE],
    hram: [u8; HRAM_SIZE],
}

impl Mmu {
    /// Map the first ROM bank of `image` at 0x0000.
    pub fn new(mut image: Vec<u8>) -> Self {
        if image.len() > ROM_BANK_SIZE {
            log::warn!(
                "ROM image is {} bytes; only the first 0x{ROM_BANK_SIZE:04X} are mapped",
                image.len()
            );
        } else if image.len() < ROM_BANK_SIZE {
            log::debug!(
                "ROM image is {} bytes; padding to 0x{ROM_BANK_SIZE:04X}",
                image.len()
            );
        }
        image.resize(ROM_BANK_SIZE, OPEN_BUS);

        Self {
            rom: image,
            vram: [0; VRAM_SIZE],
            wram: [0; WRAM_SIZE],
            hram: [0; HRAM_SIZE],
        }
    }

    /// Resolve `len` bytes at `addr` to a region and the offset into it.
    /// The whole span has to sit inside a single region.
    fn locate(addr: u16, len: usize) -> Result<(Region, usize), BusError> {
        let region = Region::containing(addr).ok_or(BusError::Unmapped { addr })?;
        let range = region.range();
        let last = addr as usize + len.saturating_sub(1);
        if last > *range.end() as usize {
            // Report the first byte that falls off the region.
            let addr = (*range.end()).wrapping_add(1);
            return Err(BusError::Unmapped { addr });
        }
        Ok((region, (addr - range.start()) as usize))
    }

    fn backing(&self, region: Region) -> &[u8] {
        match region {
            Region::Rom => &self.rom,
            Region::Vram => &self.vram,
            Region::Wram => &self.wram,
            Region::Hram => &self.hram,
        }
    }
}

impl Bus for Mmu {
    fn read(&self, addr: u16, len: usize) -> Result<&[u8], BusError> {
        let (region, offset) = Self::locate(addr, len)?;
        Ok(&self.backing(region)[offset..offset + len])
    }

    fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), BusError> {
        let (region, offset) = Self::locate(addr, bytes.len())?;
        let dest = match region {
            Region::Rom => return Err(BusError::ReadOnly { addr }),
            Region::Vram => &mut self.vram[..],
            Region::Wram => &mut self.wram[..],
            Region::Hram => &mut self.hram[..],
        };
        dest[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }
}
