use super::Value;
use crate::error::SemanticError;

/// Counts of shadow pushes and pops over a compile. On well-formed input the
/// two are equal once the compile finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackStats {
    pub pushes: usize,
    pub pops: usize,
}

/// Typed shadow of the target machine's operand stack.
#[derive(Clone, Debug, Default)]
pub struct OperandStack {
    values: Vec<Value>,
    stats: StackStats,
}

impl OperandStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.stats.pushes += 1;
        self.values.push(value);
    }

    pub fn pop(&mut self, operation: &'static str) -> Result<Value, SemanticError> {
        let value = self.values.pop().ok_or(SemanticError::StackUnderflow {
            operation,
            needed: 1,
            found: 0,
        })?;
        self.stats.pops += 1;
        Ok(value)
    }

    /// Pops the two operands of a binary operator and returns them as
    /// `(left, right)`. Nothing is popped when fewer than two are present.
    pub fn pop_pair(&mut self, operation: &'static str) -> Result<(Value, Value), SemanticError> {
        if self.values.len() < 2 {
            return Err(SemanticError::StackUnderflow {
                operation,
                needed: 2,
                found: self.values.len(),
            });
        }
        let right = self.pop(operation)?;
        let left = self.pop(operation)?;
        Ok((left, right))
    }

    pub fn top(&self) -> Option<&Value> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn stats(&self) -> StackStats {
        self.stats
    }
}
