//! Opcode metadata and behaviors, keyed by opcode byte.
//!
//! Two separate tables exist: [`PRIMARY`] for unprefixed opcodes and
//! [`CB_PREFIXED`] for opcodes following the `0xCB` byte. The same byte value
//! means unrelated instructions in each, so they are never merged.
//!
//! Cycle counts are in T-cycles (4 per machine cycle).

use std::fmt;

use once_cell::sync::Lazy;

use crate::bus::{Bus, BusError};
use crate::flags::Flag;
use crate::registers::Registers;

/// First byte of every CB-prefixed instruction.
pub const CB_PREFIX: u8 = 0xCB;

// LDH and LD [C] address the top page.
const HIGH_PAGE: u16 = 0xFF00;

/// Immediate operands decoded for one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Operands {
    pub n8: u8,
    /// `n8` reinterpreted as a signed offset for relative jumps.
    pub e8: i8,
    /// Little-endian 16-bit immediate.
    pub n16: u16,
}

impl Operands {
    /// Stage 0, 1, or 2 trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match *bytes {
            [n8] => Self {
                n8,
                e8: n8 as i8,
                n16: 0,
            },
            [lo, hi] => Self {
                n16: u16::from_le_bytes([lo, hi]),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

/// Everything a behavior may touch while it runs. Lives for one instruction.
pub struct Context<'a> {
    pub regs: &'a mut Registers,
    pub bus: &'a mut dyn Bus,
    pub ops: Operands,
}

/// Which of an opcode's two costs applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Next,
    Branch,
}

pub type Handler = fn(&mut Context<'_>) -> Result<Flow, BusError>;

#[derive(Clone, Copy)]
pub struct Opcode {
    pub code: u8,
    pub mnemonic: &'static str,
    pub prefixed: bool,
    /// Encoded size in bytes, counting the `0xCB` prefix when present.
    pub length: u8,
    pub cycles: u32,
    /// Cost when a conditional branch is taken.
    pub branch_cycles: u32,
    handler: Handler,
}

impl Opcode {
    const fn new(
        code: u8,
        mnemonic: &'static str,
        length: u8,
        cycles: u32,
        handler: Handler,
    ) -> Self {
        Self {
            code,
            mnemonic,
            prefixed: false,
            length,
            cycles,
            branch_cycles: cycles,
            handler,
        }
    }

    const fn branching(mut self, taken: u32) -> Self {
        self.branch_cycles = taken;
        self
    }

    /// Number of immediate bytes following the opcode byte.
    pub fn operand_len(&self) -> usize {
        self.length as usize - 1 - self.prefixed as usize
    }

    /// Run the behavior and return the cycles it took.
    pub fn execute(&self, ctx: &mut Context<'_>) -> Result<u32, BusError> {
        Ok(match (self.handler)(ctx)? {
            Flow::Next => self.cycles,
            Flow::Branch => self.branch_cycles,
        })
    }
}

impl fmt::Debug for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opcode")
            .field("code", &format_args!("0x{:02X}", self.code))
            .field("mnemonic", &self.mnemonic)
            .field("prefixed", &self.prefixed)
            .field("length", &self.length)
            .field("cycles", &self.cycles)
            .finish()
    }
}

pub struct OpcodeTable {
    entries: [Option<Opcode>; 256],
}

impl OpcodeTable {
    fn build(prefixed: bool, opcodes: &[Opcode]) -> Self {
        let mut entries = [None; 256];
        for op in opcodes {
            debug_assert!(
                entries[op.code as usize].is_none(),
                "duplicate opcode 0x{:02X}",
                op.code
            );
            entries[op.code as usize] = Some(Opcode { prefixed, ..*op });
        }
        Self { entries }
    }

    pub fn get(&self, code: u8) -> Option<&Opcode> {
        self.entries[code as usize].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Opcode> {
        self.entries.iter().flatten()
    }
}

pub static PRIMARY: Lazy<OpcodeTable> = Lazy::new(|| {
    OpcodeTable::build(
        false,
        &[
            Opcode::new(0x01, "LD BC,n16", 3, 12, ld_bc_n16),
            Opcode::new(0x05, "DEC B", 1, 4, dec_b),
            Opcode::new(0x06, "LD B,n8", 2, 8, ld_b_n8),
            Opcode::new(0x0C, "INC C", 1, 4, inc_c),
            Opcode::new(0x0E, "LD C,n8", 2, 8, ld_c_n8),
            Opcode::new(0x11, "LD DE,n16", 3, 12, ld_de_n16),
            Opcode::new(0x17, "RLA", 1, 4, rla),
            Opcode::new(0x1A, "LD A,[DE]", 1, 8, ld_a_mde),
            Opcode::new(0x20, "JR NZ,e8", 2, 8, jr_nz_e8).branching(12),
            Opcode::new(0x21, "LD HL,n16", 3, 12, ld_hl_n16),
            Opcode::new(0x31, "LD SP,n16", 3, 12, ld_sp_n16),
            Opcode::new(0x32, "LD [HL-],A", 1, 8, ld_mhld_a),
            Opcode::new(0x3E, "LD A,n8", 2, 8, ld_a_n8),
            Opcode::new(0x4F, "LD C,A", 1, 4, ld_c_a),
            Opcode::new(0x77, "LD [HL],A", 1, 8, ld_mhl_a),
            Opcode::new(0xAF, "XOR A,A", 1, 4, xor_a_a),
            Opcode::new(0xC1, "POP BC", 1, 12, pop_bc),
            Opcode::new(0xC5, "PUSH BC", 1, 16, push_bc),
            Opcode::new(0xCD, "CALL n16", 3, 24, call_n16),
            Opcode::new(0xE0, "LDH [n8],A", 2, 12, ldh_mn8_a),
            Opcode::new(0xE2, "LDH [C],A", 1, 8, ldh_mc_a),
        ],
    )
});

pub static CB_PREFIXED: Lazy<OpcodeTable> = Lazy::new(|| {
    OpcodeTable::build(
        true,
        &[
            Opcode::new(0x11, "RL C", 2, 8, rl_c),
            Opcode::new(0x7C, "BIT 7,H", 2, 8, bit_7_h),
        ],
    )
});

/// Look up `code` in the table selected by `prefixed`.
pub fn lookup(code: u8, prefixed: bool) -> Option<&'static Opcode> {
    let table = if prefixed {
        Lazy::force(&CB_PREFIXED)
    } else {
        Lazy::force(&PRIMARY)
    };
    table.get(code)
}

// 16-bit loads

fn ld_bc_n16(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.set_bc(ctx.ops.n16);
    Ok(Flow::Next)
}

fn ld_de_n16(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.set_de(ctx.ops.n16);
    Ok(Flow::Next)
}

fn ld_hl_n16(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.set_hl(ctx.ops.n16);
    Ok(Flow::Next)
}

fn ld_sp_n16(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.sp = ctx.ops.n16;
    Ok(Flow::Next)
}

// 8-bit loads

fn ld_b_n8(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.b = ctx.ops.n8;
    Ok(Flow::Next)
}

fn ld_c_n8(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.c = ctx.ops.n8;
    Ok(Flow::Next)
}

fn ld_a_n8(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.a = ctx.ops.n8;
    Ok(Flow::Next)
}

fn ld_c_a(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.c = ctx.regs.a;
    Ok(Flow::Next)
}

fn ld_a_mde(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.a = ctx.bus.read_byte(ctx.regs.get_de())?;
    Ok(Flow::Next)
}

fn ld_mhl_a(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.bus.write_byte(ctx.regs.get_hl(), ctx.regs.a)?;
    Ok(Flow::Next)
}

fn ld_mhld_a(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    let hl = ctx.regs.get_hl();
    ctx.bus.write_byte(hl, ctx.regs.a)?;
    ctx.regs.set_hl(hl.wrapping_sub(1));
    Ok(Flow::Next)
}

fn ldh_mc_a(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.bus.write_byte(HIGH_PAGE | ctx.regs.c as u16, ctx.regs.a)?;
    Ok(Flow::Next)
}

fn ldh_mn8_a(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.bus.write_byte(HIGH_PAGE | ctx.ops.n8 as u16, ctx.regs.a)?;
    Ok(Flow::Next)
}

// ALU

fn xor_a_a(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    let a = ctx.regs.a;
    ctx.regs.xor(a);
    Ok(Flow::Next)
}

fn inc_c(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.c = ctx.regs.inc(ctx.regs.c);
    Ok(Flow::Next)
}

fn dec_b(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.b = ctx.regs.dec(ctx.regs.b);
    Ok(Flow::Next)
}

fn rla(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.a = ctx.regs.rl(ctx.regs.a);
    // Unlike RL A, the accumulator form always clears Z.
    ctx.regs.set_flag(Flag::Zero, false);
    Ok(Flow::Next)
}

// Control flow

fn jr_nz_e8(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    if ctx.regs.flag(Flag::Zero) {
        return Ok(Flow::Next);
    }
    // PC already points past the operand.
    ctx.regs.pc = ctx.regs.pc.wrapping_add_signed(ctx.ops.e8 as i16);
    Ok(Flow::Branch)
}

fn call_n16(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.call(&mut *ctx.bus, ctx.ops.n16)?;
    Ok(Flow::Next)
}

fn push_bc(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    let bc = ctx.regs.get_bc();
    ctx.regs.push(&mut *ctx.bus, bc)?;
    Ok(Flow::Next)
}

fn pop_bc(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    let val = ctx.regs.pop(&mut *ctx.bus)?;
    ctx.regs.set_bc(val);
    Ok(Flow::Next)
}

// CB-prefixed

fn rl_c(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.c = ctx.regs.rl(ctx.regs.c);
    Ok(Flow::Next)
}

fn bit_7_h(ctx: &mut Context<'_>) -> Result<Flow, BusError> {
    ctx.regs.bit(7, ctx.regs.h);
    Ok(Flow::Next)
}

/// An executed instruction: the opcode, where it was fetched from, and the
/// operands decoded for that occurrence.
#[derive(Clone, Copy, Debug)]
pub struct Instruction {
    pub addr: u16,
    pub opcode: &'static Opcode,
    pub operands: Operands,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "0x{:04X} opcode: {} (n8: 0x{:02X}, e8: {}, n16: 0x{:04X})",
            self.addr, self.opcode.mnemonic, self.operands.n8, self.operands.e8, self.operands.n16
        )
    }
}
