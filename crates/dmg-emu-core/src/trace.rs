use std::collections::VecDeque;
use std::fmt;

use crate::opcodes::Instruction;

/// Append-only record of executed instructions, kept for post-mortem dumps.
///
/// Unbounded by default. With a depth only the most recent `depth`
/// instructions are retained; [`Trace::dropped`] counts the rest.
#[derive(Debug, Default)]
pub struct Trace {
    entries: VecDeque<Instruction>,
    depth: Option<usize>,
    dropped: u64,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_depth(depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            depth: Some(depth),
            dropped: 0,
        }
    }

    pub fn push(&mut self, insn: Instruction) {
        if let Some(depth) = self.depth {
            if depth == 0 {
                self.dropped += 1;
                return;
            }
            if self.entries.len() == depth {
                self.entries.pop_front();
                self.dropped += 1;
            }
        }
        self.entries.push_back(insn);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instructions evicted by the depth limit.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn last(&self) -> Option<&Instruction> {
        self.entries.back()
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.entries.iter()
    }
}

/// One line per instruction, numbered by execution order.
impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dropped > 0 {
            writeln!(f, "... {} earlier instructions not retained", self.dropped)?;
        }
        for (i, insn) in self.entries.iter().enumerate() {
            writeln!(f, "[{}] {insn}", self.dropped + i as u64)?;
        }
        Ok(())
    }
}
