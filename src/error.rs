use std::fmt;

use thiserror::Error;

use crate::lexer::Token;

/// What a grammar rule was looking for when it gave up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expected {
    /// A specific reserved lexeme, e.g. `)` or `endif`.
    Lexeme(&'static str),
    /// A token class or a set of alternatives, e.g. `identifier`.
    Class(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Lexeme(s) => write!(f, "'{}'", s),
            Expected::Class(s) => f.write_str(s),
        }
    }
}

/// Errors in the input program. These are recorded and parsing goes on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("{rule}: expected {expected}, found {found}")]
    Unexpected {
        rule: &'static str,
        expected: Expected,
        found: Token,
    },
    #[error("{rule}: {construct} is not supported")]
    Unsupported {
        rule: &'static str,
        construct: String,
    },
    #[error("unbalanced program: {operands} operand(s) and {fixups} jump(s) left pending")]
    Unbalanced { operands: usize, fixups: usize },
}

impl SyntaxError {
    pub fn expected(&self) -> Option<&Expected> {
        match self {
            SyntaxError::Unexpected { expected, .. } => Some(expected),
            _ => None,
        }
    }
}

/// Broken invariants of the code generator. Well-formed input never raises
/// these; when one does, the compile unit is abandoned.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SemanticError {
    #[error("undeclared variable `{0}`")]
    UndeclaredVariable(String),
    #[error("stack underflow in {operation}: needs {needed} operand(s), found {found}")]
    StackUnderflow {
        operation: &'static str,
        needed: usize,
        found: usize,
    },
}

/// Outcome of a whole compile unit.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error("{count} syntax error(s), first: {first}")]
    Syntax { count: usize, first: SyntaxError },
}
