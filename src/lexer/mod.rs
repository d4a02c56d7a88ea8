mod lexer;
mod listing;
mod stream;
mod token;

pub use lexer::*;
pub use listing::*;
pub use stream::*;
pub use token::*;
