use std::fmt;

use crate::codegen::{ArithOp, RelOp};

/// Declared type of a variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Boolean,
    Undefined,
}

impl Type {
    /// Maps a `<Qualifier>` keyword. `real` has no runtime representation
    /// and maps to [`Type::Undefined`].
    pub fn from_qualifier(lexeme: &str) -> Option<Self> {
        match lexeme {
            "integer" => Some(Type::Integer),
            "boolean" => Some(Type::Boolean),
            "real" => Some(Type::Undefined),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Type::Integer => "integer",
            Type::Boolean => "boolean",
            Type::Undefined => "undefined",
        };
        f.pad(s)
    }
}

/// Compile-time shadow of one slot of the runtime operand stack.
///
/// The payload is `Some` only when the value is statically known, i.e. it
/// comes from a literal or from folding known operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(Option<i64>),
    Boolean(Option<bool>),
    Undefined,
}

impl Value {
    /// An unknown value of type `ty`.
    pub fn of_type(ty: Type) -> Self {
        match ty {
            Type::Integer => Value::Integer(None),
            Type::Boolean => Value::Boolean(None),
            Type::Undefined => Value::Undefined,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Value::Integer(_) => Type::Integer,
            Value::Boolean(_) => Type::Boolean,
            Value::Undefined => Type::Undefined,
        }
    }

    /// Result of `left OP right` for an arithmetic operator.
    ///
    /// Only integer operands produce an integer. Booleans are never
    /// reinterpreted as logical operations; any non-integer operand yields
    /// `Undefined`. Division yields `Undefined` unless the divisor is a
    /// known non-zero integer.
    pub fn arithmetic(op: ArithOp, left: Value, right: Value) -> Value {
        let (Value::Integer(l), Value::Integer(r)) = (left, right) else {
            return Value::Undefined;
        };

        match op {
            ArithOp::Add => Value::Integer(l.zip(r).and_then(|(l, r)| l.checked_add(r))),
            ArithOp::Sub => Value::Integer(l.zip(r).and_then(|(l, r)| l.checked_sub(r))),
            ArithOp::Mul => Value::Integer(l.zip(r).and_then(|(l, r)| l.checked_mul(r))),
            ArithOp::Div => match r {
                Some(d) if d != 0 => Value::Integer(l.and_then(|l| l.checked_div(d))),
                _ => Value::Undefined,
            },
        }
    }

    /// Result of `left OP right` for a relational operator. Always boolean;
    /// known only when both sides are known and of the same type.
    pub fn compare(op: RelOp, left: Value, right: Value) -> Value {
        let known = match (left, right) {
            (Value::Integer(Some(l)), Value::Integer(Some(r))) => Some(op.test(l, r)),
            (Value::Boolean(Some(l)), Value::Boolean(Some(r))) => Some(op.test(l, r)),
            _ => None,
        };
        Value::Boolean(known)
    }
}
