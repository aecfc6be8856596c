use thiserror::Error;

use crate::bus::{Bus, BusError};
use crate::opcodes::{self, CB_PREFIX, Context, Instruction, Operands};
use crate::registers::Registers;
use crate::trace::Trace;

#[cfg(feature = "cpu-trace")]
macro_rules! cpu_trace {
    ($($arg:tt)*) => {
        log::trace!(target: "dmg_emu_core::cpu", $($arg)*);
    };
}
#[cfg(not(feature = "cpu-trace"))]
macro_rules! cpu_trace {
    ($($arg:tt)*) => {};
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpuError {
    #[error("illegal / unknown opcode 0x{opcode:02X} (prefixed: {prefixed}) at 0x{addr:04X}")]
    UnknownOpcode { opcode: u8, prefixed: bool, addr: u16 },

    #[error("cpu error on fetch at 0x{pc:04X}: {source}")]
    Fetch { pc: u16, source: BusError },

    #[error("cpu error executing instruction at 0x{pc:04X}: {source}")]
    Execute { pc: u16, source: BusError },
}

impl CpuError {
    /// Address of the first byte of the faulting instruction.
    pub fn pc(&self) -> u16 {
        match *self {
            CpuError::UnknownOpcode { addr, .. } => addr,
            CpuError::Fetch { pc, .. } | CpuError::Execute { pc, .. } => pc,
        }
    }
}

pub struct Cpu {
    pub regs: Registers,
    pub cycles: u64,
    trace: Trace,
    fault: Option<CpuError>,
}

impl Cpu {
    /// Zeroed registers, execution starting at 0x0000.
    pub fn new() -> Self {
        Self::with_registers(Registers::new())
    }

    /// Registers as left by the DMG boot ROM, execution starting at 0x0100.
    pub fn post_boot() -> Self {
        Self::with_registers(Registers::post_boot())
    }

    pub fn with_registers(regs: Registers) -> Self {
        Self {
            regs,
            cycles: 0,
            trace: Trace::new(),
            fault: None,
        }
    }

    /// Keep only the most recent `depth` instructions in the trace.
    pub fn with_trace_depth(mut self, depth: usize) -> Self {
        self.trace = Trace::with_depth(depth);
        self
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// The failure that stopped this CPU, if any.
    pub fn fault(&self) -> Option<&CpuError> {
        self.fault.as_ref()
    }

    /// Decode the instruction at PC without changing any state.
    pub fn fetch(&self, bus: &dyn Bus) -> Result<Instruction, CpuError> {
        let pc = self.regs.pc;
        let fetch_err = |source: BusError| CpuError::Fetch { pc, source };

        let first = bus.read_byte(pc).map_err(fetch_err)?;
        let prefixed = first == CB_PREFIX;
        let (code, code_addr) = if prefixed {
            let addr = pc.wrapping_add(1);
            (bus.read_byte(addr).map_err(fetch_err)?, addr)
        } else {
            (first, pc)
        };

        let opcode = opcodes::lookup(code, prefixed).ok_or(CpuError::UnknownOpcode {
            opcode: code,
            prefixed,
            addr: pc,
        })?;

        let operands = match opcode.operand_len() {
            0 => Operands::default(),
            len => Operands::from_bytes(
                bus.read(code_addr.wrapping_add(1), len)
                    .map_err(fetch_err)?,
            ),
        };

        Ok(Instruction {
            addr: pc,
            opcode,
            operands,
        })
    }

    /// Fetch, decode and execute one instruction, returning the T-cycles it
    /// took. After a failure the CPU stays faulted and keeps returning it.
    pub fn step(&mut self, bus: &mut dyn Bus) -> Result<u32, CpuError> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        self.execute_next(bus).inspect_err(|e| {
            self.fault = Some(e.clone());
        })
    }

    fn execute_next(&mut self, bus: &mut dyn Bus) -> Result<u32, CpuError> {
        let insn = self.fetch(&*bus)?;

        // Relative jumps are measured from the end of the full encoding.
        self.regs.pc = insn.addr.wrapping_add(insn.opcode.length as u16);
        self.trace.push(insn);
        cpu_trace!("{insn}");

        let mut ctx = Context {
            regs: &mut self.regs,
            bus,
            ops: insn.operands,
        };
        let cycles = insn
            .opcode
            .execute(&mut ctx)
            .map_err(|source| CpuError::Execute {
                pc: insn.addr,
                source,
            })?;

        self.cycles += cycles as u64;
        Ok(cycles)
    }

    /// Formatted CPU state string for debugging.
    pub fn debug_state(&self) -> String {
        format!(
            "AF:{:04X} BC:{:04X} DE:{:04X} HL:{:04X} PC:{:04X} SP:{:04X} CY:{}",
            self.regs.get_af(),
            self.regs.get_bc(),
            self.regs.get_de(),
            self.regs.get_hl(),
            self.regs.pc,
            self.regs.sp,
            self.cycles
        )
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
