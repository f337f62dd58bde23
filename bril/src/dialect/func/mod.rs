//! Function dialect.
//!
//! This dialect is meant to hold operations that are related to functions.
mod op;

pub use op::display_func;
pub use op::Func;
pub use op::FuncOp;
pub use op::ReturnOp;
