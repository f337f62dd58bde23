//! Pointer checks for `bril.load` and `bril.store`.
//!
//! Both ops move a value through a `!bril.ptr<T>`. The checks only look at
//! the static types of the op itself: the pointer operand must be a pointer
//! and the transferred value must have exactly the pointee type `T`. Only one
//! level is unwrapped, so loading from `!bril.ptr<!bril.ptr<i64>>` gives a
//! `!bril.ptr<i64>`.

use crate::diagnostic::DiagnosticKind;
use crate::diagnostic::Diagnostics;
use crate::diagnostic::Failure;
use crate::diagnostic::LogicalResult;
use crate::dialect::bril::LoadOp;
use crate::dialect::bril::StoreOp;
use crate::ir::Op;
use crate::ir::Operation;
use crate::ir::Type;
use crate::shared::SharedExt;
use crate::verify::verify_structure;

const EXPECTED_POINTER: &str = "expected 'ptr' type for 'ptr' operand";

/// Check that `transferred` is the pointee type of `pointer`.
fn verify_pointee(
    operation: &Operation,
    pointer: &Type,
    transferred: &Type,
    mismatch: &str,
    diagnostics: &mut Diagnostics,
) -> LogicalResult {
    let Some(pointer) = pointer.as_pointer() else {
        return diagnostics.emit_op_error(operation, DiagnosticKind::TypeMismatch, EXPECTED_POINTER);
    };
    if pointer.pointee() != transferred {
        return diagnostics.emit_op_error(operation, DiagnosticKind::TypeMismatch, mismatch);
    }
    Ok(())
}

pub fn verify_load(op: &LoadOp, diagnostics: &mut Diagnostics) -> LogicalResult {
    verify_structure(op, diagnostics)?;
    let (Some(pointer), Some(result_type)) = (op.pointer(), op.result_type()) else {
        return Err(Failure);
    };
    let operation = op.operation().rd();
    let mismatch = "result type must match pointee type of pointer";
    verify_pointee(&operation, &pointer.typ(), &result_type, mismatch, diagnostics)
}

pub fn verify_store(op: &StoreOp, diagnostics: &mut Diagnostics) -> LogicalResult {
    verify_structure(op, diagnostics)?;
    let (Some(pointer), Some(value)) = (op.pointer(), op.value()) else {
        return Err(Failure);
    };
    let operation = op.operation().rd();
    let mismatch = "value type must match pointee type of pointer";
    verify_pointee(&operation, &pointer.typ(), &value.typ(), mismatch, diagnostics)
}
