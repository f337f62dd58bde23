//! The Bril dialect.
//!
//! Bril (Big Red Intermediate Language) is a small instruction-based IR used
//! for teaching compilers. This dialect holds its operations and the
//! `!bril.ptr<T>` type. Memory is accessed through pointers via `bril.load`
//! and `bril.store`, whose pointer types are checked in [verify_load] and
//! [verify_store].

mod op;
mod typ;
mod verify;

pub use op::AddOp;
pub use op::AllocOp;
pub use op::AndOp;
pub use op::BrOp;
pub use op::CallOp;
pub use op::ConstOp;
pub use op::DivOp;
pub use op::EqOp;
pub use op::FreeOp;
pub use op::FuncOp;
pub use op::GeOp;
pub use op::GtOp;
pub use op::IdOp;
pub use op::JmpOp;
pub use op::LeOp;
pub use op::LoadOp;
pub use op::LtOp;
pub use op::MulOp;
pub use op::NopOp;
pub use op::NotOp;
pub use op::OrOp;
pub use op::PrintOp;
pub use op::PtrAddOp;
pub use op::RetOp;
pub use op::StoreOp;
pub use op::SubOp;
pub use op::UndefOp;
pub use typ::PointerType;
pub use verify::verify_load;
pub use verify::verify_store;

use crate::Dialect;

pub struct Bril;

impl Dialect for Bril {
    fn name(&self) -> &'static str {
        "bril"
    }
    fn description(&self) -> &'static str {
        "Big Red Intermediate Language"
    }
}
