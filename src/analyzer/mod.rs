mod operand_stack;
mod symbol_table;
mod ty;

pub use operand_stack::*;
pub use symbol_table::*;
pub use ty::*;
