#![allow(dead_code)]

use dmg_emu_core::{Bus, BusError, Cpu};

const MEMORY_SIZE: usize = 0x10000;

/// 64 KiB of plain RAM with no regions or protection.
pub struct FlatBus {
    pub mem: Vec<u8>,
    pub writes: Vec<(u16, u8)>,
}

impl FlatBus {
    pub fn new() -> Self {
        Self {
            mem: vec![0; MEMORY_SIZE],
            writes: Vec::new(),
        }
    }

    pub fn with_program(origin: u16, program: &[u8]) -> Self {
        let mut bus = Self::new();
        bus.load(origin, program);
        bus
    }

    pub fn load(&mut self, origin: u16, bytes: &[u8]) {
        let start = origin as usize;
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

impl Bus for FlatBus {
    fn read(&self, addr: u16, len: usize) -> Result<&[u8], BusError> {
        let start = addr as usize;
        if start + len > MEMORY_SIZE {
            return Err(BusError::Unmapped { addr: 0xFFFF });
        }
        Ok(&self.mem[start..start + len])
    }

    fn write(&mut self, addr: u16, bytes: &[u8]) -> Result<(), BusError> {
        let start = addr as usize;
        if start + bytes.len() > MEMORY_SIZE {
            return Err(BusError::Unmapped { addr: 0xFFFF });
        }
        self.mem[start..start + bytes.len()].copy_from_slice(bytes);
        for (i, b) in bytes.iter().enumerate() {
            self.writes.push((addr.wrapping_add(i as u16), *b));
        }
        Ok(())
    }
}

/// A CPU positioned at `origin` with `program` loaded there.
pub fn cpu_with_program(origin: u16, program: &[u8]) -> (Cpu, FlatBus) {
    let mut cpu = Cpu::new();
    cpu.regs.pc = origin;
    (cpu, FlatBus::with_program(origin, program))
}

/// Execute one instruction, panicking on failure.
pub fn step(cpu: &mut Cpu, bus: &mut FlatBus) -> u32 {
    cpu.step(bus).unwrap_or_else(|e| panic!("step failed: {e}"))
}
