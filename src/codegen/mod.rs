mod codegen;
mod emitter;
mod instruction;
mod program;

pub use codegen::*;
pub use emitter::*;
pub use instruction::*;
pub use program::*;
