//! Condition flags packed into the upper nibble of `F`.

// CPU flag bits as documented in gbdev.io/pandocs/The_CPU_Flags.html
pub const FLAG_Z: u8 = 0x80; // Zero
pub const FLAG_N: u8 = 0x40; // Subtract
pub const FLAG_H: u8 = 0x20; // Half Carry
pub const FLAG_C: u8 = 0x10; // Carry

/// Bits of `F` that carry meaning. The low nibble always reads as zero.
pub const FLAG_MASK: u8 = FLAG_Z | FLAG_N | FLAG_H | FLAG_C;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag {
    Zero,
    Subtract,
    HalfCarry,
    Carry,
}

impl Flag {
    #[inline]
    pub const fn mask(self) -> u8 {
        match self {
            Flag::Zero => FLAG_Z,
            Flag::Subtract => FLAG_N,
            Flag::HalfCarry => FLAG_H,
            Flag::Carry => FLAG_C,
        }
    }

    /// Returns whether this flag is set in `f`.
    #[inline]
    pub const fn is_set(self, f: u8) -> bool {
        f & self.mask() != 0
    }

    /// Returns `f` with only this flag's bit changed.
    #[inline]
    pub const fn apply(self, f: u8, state: bool) -> u8 {
        let f = if state {
            f | self.mask()
        } else {
            f & !self.mask()
        };
        f & FLAG_MASK
    }
}
