mod expr;
mod parser;
mod statement;
mod trace;

pub use parser::*;
pub use trace::*;
