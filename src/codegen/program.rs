use std::fmt;

use crate::analyzer::{StackStats, SymbolTable};

use super::{Instruction, InstructionTable};

/// Everything a compile unit produced: the post-backpatch instruction list
/// and the symbol table.
#[derive(Clone, Debug)]
pub struct Program {
    pub(super) instructions: Vec<Instruction>,
    pub(super) symbols: SymbolTable,
    pub(super) stats: StackStats,
    pub(super) pending_operands: usize,
    pub(super) pending_fixups: usize,
}

impl Program {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instruction(&self, address: usize) -> Option<&Instruction> {
        address.checked_sub(1).and_then(|i| self.instructions.get(i))
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn stats(&self) -> StackStats {
        self.stats
    }

    /// Shadow values left on the operand stack.
    pub fn pending_operands(&self) -> usize {
        self.pending_operands
    }

    /// Conditional jumps never backpatched.
    pub fn pending_fixups(&self) -> usize {
        self.pending_fixups
    }

    pub fn instruction_table(&self) -> InstructionTable<'_> {
        InstructionTable(&self.instructions)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== INSTRUCTION TABLE ===")?;
        write!(f, "{}", self.instruction_table())?;
        writeln!(f)?;
        writeln!(f, "=== SYMBOL TABLE ===")?;
        write!(f, "{}", self.symbols)
    }
}
