//! Flag-setting arithmetic shared by several opcodes.
//!
//! Each primitive takes the operand by value and returns the result so the
//! caller decides which register receives it.

use crate::flags::Flag;
use crate::registers::Registers;

impl Registers {
    /// 8-bit increment. Carry is left alone.
    pub fn inc(&mut self, val: u8) -> u8 {
        let res = val.wrapping_add(1);
        self.set_flag(Flag::Zero, res == 0);
        self.set_flag(Flag::Subtract, false);
        self.set_flag(Flag::HalfCarry, val & 0x0F == 0x0F);
        res
    }

    /// 8-bit decrement. Carry is left alone.
    pub fn dec(&mut self, val: u8) -> u8 {
        let res = val.wrapping_sub(1);
        self.set_flag(Flag::Zero, res == 0);
        self.set_flag(Flag::Subtract, true);
        self.set_flag(Flag::HalfCarry, val & 0x0F == 0x00);
        res
    }

    /// Rotate left through carry (`RL r`). Zero reflects the result; `RLA`
    /// clears it afterwards.
    pub fn rl(&mut self, val: u8) -> u8 {
        let carry_in = self.flag(Flag::Carry) as u8;
        let res = (val << 1) | carry_in;
        self.set_flag(Flag::Carry, val & 0x80 != 0);
        self.set_flag(Flag::Zero, res == 0);
        self.set_flag(Flag::Subtract, false);
        self.set_flag(Flag::HalfCarry, false);
        res
    }

    /// `BIT n, r`. Carry is left alone.
    pub fn bit(&mut self, bit: u8, val: u8) {
        self.set_flag(Flag::Zero, val & (1 << bit) == 0);
        self.set_flag(Flag::Subtract, false);
        self.set_flag(Flag::HalfCarry, true);
    }

    /// `XOR r`: A ^= val, clearing every flag but Zero.
    pub fn xor(&mut self, val: u8) {
        self.a ^= val;
        self.set_f(if self.a == 0 { Flag::Zero.mask() } else { 0 });
    }
}
