pub mod analyzer;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;

pub use error::{CompileError, SemanticError, SyntaxError};

use lexer::{Lexer, Token};
use parser::{Compilation, Parser};

/// Compiles an already classified token sequence.
pub fn compile_tokens(tokens: Vec<Token>) -> Result<Compilation, SemanticError> {
    let parser = Parser::new(tokens);
    parser.parse()
}

/// Tokenizes and compiles Rat25S source text.
pub fn compile(user_input: &str) -> Result<Compilation, SemanticError> {
    let tokens = Lexer::tokenize(user_input);
    log::debug!("{} tokens", tokens.len());
    compile_tokens(tokens)
}
