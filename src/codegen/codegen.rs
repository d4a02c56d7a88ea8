use crate::{
    analyzer::{OperandStack, SymbolTable, Type, Value},
    error::SemanticError,
};

use super::{ArithOp, Emitter, Instruction, Opcode, Operand, Program, RelOp};

/// Symbol table, typed operand stack and instruction emitter for one
/// compile unit. Every operation that touches the operand stack keeps the
/// shadow in step with the instructions it emits.
#[derive(Debug, Default)]
pub struct Codegen {
    symbols: SymbolTable,
    stack: OperandStack,
    emitter: Emitter,
}

impl Codegen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: &str, ty: Type) -> usize {
        self.symbols.declare(name, ty)
    }

    pub fn address_of(&self, name: &str) -> Result<usize, SemanticError> {
        self.symbols.address_of(name)
    }

    pub fn push_literal(&mut self, value: i64) {
        self.stack.push(Value::Integer(Some(value)));
        self.emitter
            .emit(Opcode::PushInteger, Some(Operand::Literal(value)));
    }

    pub fn push_boolean(&mut self, value: bool) {
        self.stack.push(Value::Boolean(Some(value)));
        self.emitter
            .emit(Opcode::PushBoolean, Some(Operand::Literal(value as i64)));
    }

    /// Pushes the current declared type of `name`, not a value.
    pub fn push_variable(&mut self, name: &str) -> Result<(), SemanticError> {
        let symbol = self.symbols.lookup(name)?;
        let (ty, address) = (symbol.ty, symbol.address);
        self.stack.push(Value::of_type(ty));
        self.emitter
            .emit(Opcode::PushMemory, Some(Operand::Address(address)));
        Ok(())
    }

    /// Pushes a shadow value for a construct that is parsed but not lowered.
    /// No instruction is emitted.
    pub fn push_unlowered(&mut self) {
        self.stack.push(Value::Undefined);
    }

    pub fn pop_to(&mut self, name: &str) -> Result<(), SemanticError> {
        let address = self.symbols.address_of(name)?;
        let value = self.stack.pop("pop_to")?;
        self.symbols.set_type(name, value.ty())?;
        self.emitter
            .emit(Opcode::PopMemory, Some(Operand::Address(address)));
        Ok(())
    }

    /// Drops up to `count` shadow values without emitting anything.
    pub fn discard(&mut self, count: usize) {
        for _ in 0..count.min(self.stack.len()) {
            let _ = self.stack.pop("discard");
        }
    }

    pub fn arithmetic(&mut self, op: ArithOp) -> Result<(), SemanticError> {
        let (left, right) = self.stack.pop_pair(op.opcode().mnemonic())?;
        let result = Value::arithmetic(op, left, right);
        if left.ty() != Type::Integer || right.ty() != Type::Integer {
            log::warn!(
                "{} applied to {} and {} operands",
                op.opcode(),
                left.ty(),
                right.ty()
            );
        }
        self.stack.push(result);
        self.emitter.emit(op.opcode(), None);
        Ok(())
    }

    pub fn add(&mut self) -> Result<(), SemanticError> {
        self.arithmetic(ArithOp::Add)
    }

    pub fn subtract(&mut self) -> Result<(), SemanticError> {
        self.arithmetic(ArithOp::Sub)
    }

    pub fn multiply(&mut self) -> Result<(), SemanticError> {
        self.arithmetic(ArithOp::Mul)
    }

    pub fn divide(&mut self) -> Result<(), SemanticError> {
        self.arithmetic(ArithOp::Div)
    }

    /// Pops two operands and pushes their boolean comparison.
    pub fn compare(&mut self, op: RelOp) -> Result<(), SemanticError> {
        let (left, right) = self.stack.pop_pair(op.opcode().mnemonic())?;
        self.stack.push(Value::compare(op, left, right));
        self.emitter.emit(op.opcode(), None);
        Ok(())
    }

    /// Consumes the boolean on top and emits a `JMP0` with its target left
    /// open, marking it for [`Codegen::backpatch`].
    pub fn conditional_jump(&mut self) -> Result<usize, SemanticError> {
        self.stack.pop("JMP0")?;
        let address = self.emitter.emit(Opcode::JumpIfZero, None);
        self.emitter.mark_fixup(address);
        Ok(address)
    }

    /// A relational test followed by its speculative skip jump.
    pub fn relational(&mut self, op: RelOp) -> Result<usize, SemanticError> {
        self.compare(op)?;
        self.conditional_jump()
    }

    pub fn output(&mut self) -> Result<(), SemanticError> {
        self.stack.pop("SOUT")?;
        self.emitter.emit(Opcode::Output, None);
        Ok(())
    }

    pub fn input(&mut self, name: &str) -> Result<(), SemanticError> {
        let ty = self.symbols.lookup(name)?.ty;
        self.stack.push(Value::of_type(ty));
        self.emitter.emit(Opcode::Input, None);
        self.pop_to(name)
    }

    pub fn label(&mut self) -> usize {
        self.emitter.emit(Opcode::Label, None)
    }

    pub fn jump(&mut self, target: usize) -> usize {
        self.emitter.emit(Opcode::Jump, Some(Operand::Target(target)))
    }

    /// Emits a `JMP` whose target is filled in later by
    /// [`Codegen::resolve_jump`].
    pub fn forward_jump(&mut self) -> usize {
        self.emitter.emit(Opcode::Jump, None)
    }

    pub fn resolve_jump(&mut self, address: usize, target: usize) {
        self.emitter.resolve_jump(address, target);
    }

    pub fn mark_fixup(&mut self, address: usize) {
        self.emitter.mark_fixup(address);
    }

    pub fn backpatch(&mut self, target: usize) {
        self.emitter.backpatch(target);
    }

    pub fn next_address(&self) -> usize {
        self.emitter.next_address()
    }

    pub fn instructions(&self) -> &[Instruction] {
        self.emitter.instructions()
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn operand_stack(&self) -> &OperandStack {
        &self.stack
    }

    pub fn pending_fixups(&self) -> usize {
        self.emitter.pending_fixups()
    }

    pub fn finish(self) -> Program {
        Program {
            stats: self.stack.stats(),
            pending_operands: self.stack.len(),
            pending_fixups: self.emitter.pending_fixups(),
            instructions: self.emitter.into_instructions(),
            symbols: self.symbols,
        }
    }
}
