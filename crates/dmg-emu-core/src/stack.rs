//! Stack and subroutine linkage. The stack grows downward and stores
//! words little-endian.

use crate::bus::{Bus, BusError};
use crate::registers::Registers;

impl Registers {
    pub fn push<B: Bus + ?Sized>(&mut self, bus: &mut B, val: u16) -> Result<(), BusError> {
        self.sp = self.sp.wrapping_sub(2);
        bus.write(self.sp, &val.to_le_bytes())
    }

    /// Pops a word. `sp` only moves once both bytes were read.
    pub fn pop<B: Bus + ?Sized>(&mut self, bus: &mut B) -> Result<u16, BusError> {
        let val = bus.read_word(self.sp)?;
        self.sp = self.sp.wrapping_add(2);
        Ok(val)
    }

    /// Pushes the return address (already past the CALL) and jumps.
    pub fn call<B: Bus + ?Sized>(&mut self, bus: &mut B, target: u16) -> Result<(), BusError> {
        self.push(bus, self.pc)?;
        self.pc = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmu::Mmu;

    fn setup(sp: u16) -> (Registers, Mmu) {
        let mut regs = Registers::new();
        regs.sp = sp;
        (regs, Mmu::new(Vec::new()))
    }

    #[test]
    fn push_then_pop_restores_value_and_sp() {
        let (mut regs, mut mmu) = setup(0xFFFE);
        for val in [0x0000, 0x00FF, 0xBEEF, 0xFFFF] {
            regs.push(&mut mmu, val).unwrap();
            assert_eq!(regs.sp, 0xFFFC);
            assert_eq!(regs.pop(&mut mmu).unwrap(), val);
            assert_eq!(regs.sp, 0xFFFE);
        }
    }

    #[test]
    fn push_stores_low_byte_at_lower_address() {
        let (mut regs, mut mmu) = setup(0xD000);
        regs.push(&mut mmu, 0x1234).unwrap();
        assert_eq!(regs.sp, 0xCFFE);
        assert_eq!(mmu.read_byte(0xCFFE).unwrap(), 0x34);
        assert_eq!(mmu.read_byte(0xCFFF).unwrap(), 0x12);
    }

    #[test]
    fn pop_from_unmapped_stack_fails_without_moving_sp() {
        let (mut regs, mut mmu) = setup(0xFFFF);
        assert_eq!(
            regs.pop(&mut mmu),
            Err(BusError::Unmapped { addr: 0xFFFF })
        );
        assert_eq!(regs.sp, 0xFFFF);
    }

    #[test]
    fn call_pushes_return_address() {
        let (mut regs, mut mmu) = setup(0xFFFE);
        regs.pc = 0x0103;
        regs.call(&mut mmu, 0x0200).unwrap();
        assert_eq!(regs.pc, 0x0200);
        assert_eq!(regs.sp, 0xFFFC);
        assert_eq!(mmu.read_word(0xFFFC).unwrap(), 0x0103);
    }

    #[test]
    fn failed_call_keeps_pc() {
        // SP at 0 wraps the push into 0xFFFE..=0xFFFF, where the high byte
        // is unmapped.
        let (mut regs, mut mmu) = setup(0x0000);
        regs.pc = 0x0010;
        assert!(regs.call(&mut mmu, 0x0200).is_err());
        assert_eq!(regs.pc, 0x0010);
    }
}
