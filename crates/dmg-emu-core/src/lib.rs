//! Instruction-level emulation of the DMG (LR35902) CPU.
//!
//! The core owns the register file, decode tables and execution engine. Memory
//! is reached through the [`bus::Bus`] trait; [`mmu::Mmu`] is the concrete
//! address map used by the frontend.

/// Flag-setting arithmetic primitives.
pub mod alu;

/// Memory access contract consumed by the CPU.
pub mod bus;

/// Fetch/decode/execute engine.
pub mod cpu;

/// Condition flag bit layout.
pub mod flags;

/// Memory map backing ROM, VRAM, WRAM and HRAM.
pub mod mmu;

/// Opcode tables and per-instruction behaviors.
pub mod opcodes;

/// Register file and register pair views.
pub mod registers;

/// Push/pop/call.
pub mod stack;

/// Execution history for post-mortem dumps.
pub mod trace;

pub use bus::{Bus, BusError};
pub use cpu::{Cpu, CpuError};
pub use mmu::Mmu;
