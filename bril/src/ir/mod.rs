//! Intermediate representation (IR).
//!
//! These data structures hold a parsed program. For example, this module
//! defines the generic [Operation] and the [Op] trait that specific ops
//! implement.

mod attribute;
mod block;
mod module;
mod op;
mod operation;
mod region;
mod typ;
mod value;

pub use attribute::Attribute;
pub use attribute::Attributes;
pub use block::Block;
pub use module::ModuleOp;
pub use op::Arity;
pub use op::Op;
pub use op::Shape;
pub use operation::Operation;
pub use operation::OperationName;
pub use region::Region;
pub use typ::FloatType;
pub use typ::IntegerType;
pub use typ::Type;
pub use typ::TypeInterner;
pub use typ::TypeKind;
pub use typ::Types;
pub use value::BlockArgument;
pub use value::OpOperand;
pub use value::OpOperands;
pub use value::OpResult;
pub use value::Value;
pub use value::Values;

pub fn spaces(indent: i32) -> String {
    "  ".repeat(indent.max(0) as usize)
}
