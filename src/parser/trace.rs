use std::fmt;

use crate::{error::SyntaxError, lexer::Token};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TraceEntry {
    /// A token consumed by a grammar procedure.
    Token(Token),
    /// A production applied, in the order it was attempted.
    Production(&'static str),
    Error(SyntaxError),
    Finished { errors: usize },
}

/// Derivation trace of one compile, renderable one line per entry.
#[derive(Clone, Debug, Default)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn productions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().filter_map(|e| match e {
            TraceEntry::Production(p) => Some(*p),
            _ => None,
        })
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEntry::Token(t) => write!(f, "Token: {:<16}Lexeme: {}", t.kind, t.lexeme),
            TraceEntry::Production(p) => f.write_str(p),
            TraceEntry::Error(e) => write!(f, "Error: {}", e),
            TraceEntry::Finished { errors: 0 } => write!(f, "Parse complete: correct syntax"),
            TraceEntry::Finished { errors } => write!(f, "Parse complete: {} error(s)", errors),
        }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}
