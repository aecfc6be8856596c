use crate::flags::{FLAG_MASK, Flag};

// Post-boot CPU state from gbdev.io/pandocs/Power_Up_State.html
const BOOT_PC: u16 = 0x0100;
const BOOT_SP: u16 = 0xFFFE;

const DMG_ABC_BOOT_A: u8 = 0x01;
const DMG_ABC_BOOT_F: u8 = 0xB0;
const DMG_ABC_BOOT_B: u8 = 0x00;
const DMG_ABC_BOOT_C: u8 = 0x13;
const DMG_ABC_BOOT_D: u8 = 0x00;
const DMG_ABC_BOOT_E: u8 = 0xD8;
const DMG_ABC_BOOT_H: u8 = 0x01;
const DMG_ABC_BOOT_L: u8 = 0x4D;

/// LR35902 register file.
///
/// Only the eight 8-bit slots plus `sp`/`pc` hold state. `BC`, `DE`, `HL`
/// and `AF` are computed from their halves on every access so a pair can
/// never disagree with its backing bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    pub a: u8,
    f: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl Registers {
    /// All registers cleared, execution starting at 0x0000.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register contents after the DMG boot ROM hands off to the cartridge.
    pub fn post_boot() -> Self {
        Self {
            a: DMG_ABC_BOOT_A,
            f: DMG_ABC_BOOT_F,
            b: DMG_ABC_BOOT_B,
            c: DMG_ABC_BOOT_C,
            d: DMG_ABC_BOOT_D,
            e: DMG_ABC_BOOT_E,
            h: DMG_ABC_BOOT_H,
            l: DMG_ABC_BOOT_L,
            sp: BOOT_SP,
            pc: BOOT_PC,
        }
    }

    #[inline]
    pub fn f(&self) -> u8 {
        self.f
    }

    /// Stores `val` into `F`, discarding the unused low nibble.
    #[inline]
    pub fn set_f(&mut self, val: u8) {
        self.f = val & FLAG_MASK;
    }

    #[inline]
    pub fn flag(&self, flag: Flag) -> bool {
        flag.is_set(self.f)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flag, state: bool) {
        self.f = flag.apply(self.f, state);
    }

    pub fn get_af(&self) -> u16 {
        ((self.a as u16) << 8) | self.f as u16
    }

    pub fn set_af(&mut self, val: u16) {
        self.a = (val >> 8) as u8;
        self.set_f(val as u8);
    }

    pub fn get_bc(&self) -> u16 {
        ((self.b as u16) << 8) | self.c as u16
    }

    pub fn set_bc(&mut self, val: u16) {
        self.b = (val >> 8) as u8;
        self.c = val as u8;
    }

    pub fn get_de(&self) -> u16 {
        ((self.d as u16) << 8) | self.e as u16
    }

    pub fn set_de(&mut self, val: u16) {
        self.d = (val >> 8) as u8;
        self.e = val as u8;
    }

    pub fn get_hl(&self) -> u16 {
        ((self.h as u16) << 8) | self.l as u16
    }

    pub fn set_hl(&mut self, val: u16) {
        self.h = (val >> 8) as u8;
        self.l = val as u8;
    }
}
