use super::{Instruction, Opcode, Operand};

/// Append-only instruction list plus the stack of conditional jumps whose
/// targets are still unknown.
#[derive(Clone, Debug, Default)]
pub struct Emitter {
    instructions: Vec<Instruction>,
    fixups: Vec<usize>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the next emitted instruction will get.
    pub fn next_address(&self) -> usize {
        self.instructions.len() + 1
    }

    pub fn emit(&mut self, opcode: Opcode, operand: Option<Operand>) -> usize {
        let address = self.next_address();
        log::debug!(
            "emit {:>4} {} {}",
            address,
            opcode,
            operand.map(|o| o.to_string()).unwrap_or_default()
        );
        self.instructions.push(Instruction {
            address,
            opcode,
            operand,
        });
        address
    }

    pub fn mark_fixup(&mut self, address: usize) {
        self.fixups.push(address);
    }

    /// Resolves the most recently marked jump to `target`.
    ///
    /// Only a conditional jump is patched. An empty fix-up stack is tolerated.
    pub fn backpatch(&mut self, target: usize) {
        let Some(address) = self.fixups.pop() else {
            log::warn!("backpatch to {} with no pending jump", target);
            return;
        };
        if let Some(instruction) = self.get_mut(address) {
            if instruction.is_conditional_jump() {
                log::debug!("backpatch {} -> {}", address, target);
                instruction.operand = Some(Operand::Target(target));
            }
        }
    }

    /// Sets the target of the unconditional jump at `address`, which must
    /// have been emitted without one.
    pub fn resolve_jump(&mut self, address: usize, target: usize) {
        if let Some(instruction) = self.get_mut(address) {
            if instruction.opcode == Opcode::Jump && instruction.operand.is_none() {
                log::debug!("resolve {} -> {}", address, target);
                instruction.operand = Some(Operand::Target(target));
            }
        }
    }

    fn get_mut(&mut self, address: usize) -> Option<&mut Instruction> {
        address
            .checked_sub(1)
            .and_then(|i| self.instructions.get_mut(i))
    }

    pub fn get(&self, address: usize) -> Option<&Instruction> {
        address.checked_sub(1).and_then(|i| self.instructions.get(i))
    }

    pub fn pending_fixups(&self) -> usize {
        self.fixups.len()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}
