//! The verification pass.
//!
//! Walks all ops of a tree and checks each op in two stages. First the
//! structure (operand/result/successor counts, required attributes and the
//! placement of terminators) and then, only if the structure is valid, the
//! op's own [Op::verify].

use crate::diagnostic::DiagnosticKind;
use crate::diagnostic::Diagnostics;
use crate::diagnostic::Failure;
use crate::diagnostic::LogicalResult;
use crate::ir::Block;
use crate::ir::Op;
use crate::shared::SharedExt;
use tracing::debug;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifyConfig {
    /// Stop collecting after this many diagnostics (0 means unlimited).
    pub max_diagnostics: usize,
}

impl VerifyConfig {
    pub fn new(max_diagnostics: usize) -> Self {
        Self { max_diagnostics }
    }
}

/// Verification of a tree of ops failed.
#[derive(Debug, thiserror::Error)]
#[error("verification failed with {} error(s):\n{rendered}", .diagnostics.len())]
pub struct VerificationError {
    diagnostics: Diagnostics,
    rendered: String,
}

impl VerificationError {
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }
}

/// Check the counts and required attributes of `op`.
pub fn verify_structure(op: &dyn Op, diagnostics: &mut Diagnostics) -> LogicalResult {
    let operation = op.operation().rd();
    let shape = op.shape();
    let mut messages = vec![];
    if let Some(msg) = shape.operands.check("operands", operation.operands().len()) {
        messages.push((DiagnosticKind::Structure, msg));
    }
    if let Some(msg) = shape.results.check("results", operation.results().len()) {
        messages.push((DiagnosticKind::Structure, msg));
    }
    if let Some(msg) = shape
        .successors
        .check("successors", operation.successors().len())
    {
        messages.push((DiagnosticKind::Structure, msg));
    }
    for name in op.required_attributes() {
        if !operation.attributes().contains(name) {
            let msg = format!("requires attribute '{name}'");
            messages.push((DiagnosticKind::MissingAttribute, msg));
        }
    }
    if messages.is_empty() {
        return Ok(());
    }
    for (kind, msg) in messages {
        let _ = diagnostics.emit_op_error(&operation, kind, &msg);
    }
    Err(Failure)
}

/// Terminators may only appear as the last op of a block.
fn verify_terminators(block: &Block, diagnostics: &mut Diagnostics) {
    let ops = block.ops();
    let n = ops.len();
    for op in ops.iter().take(n.saturating_sub(1)) {
        let op = op.rd();
        if op.is_terminator() {
            let operation = op.operation().rd();
            let msg = "must be the last operation in the parent block";
            let _ = diagnostics.emit_op_error(&operation, DiagnosticKind::Structure, msg);
        }
    }
}

fn verify_op(op: &dyn Op, diagnostics: &mut Diagnostics) {
    if diagnostics.is_full() {
        return;
    }
    debug!("Verifying {}", op.name());
    if verify_structure(op, diagnostics).is_ok() {
        let _ = op.verify(diagnostics);
    }
    if let Some(region) = op.region() {
        let region = region.rd();
        for block in region.blocks() {
            let block = block.rd();
            verify_terminators(&block, diagnostics);
            for child in block.ops() {
                verify_op(&*child.rd(), diagnostics);
            }
        }
    }
}

/// Verify `op` and all ops nested inside it.
///
/// Failures of one op do not stop the verification of other ops. The IR is
/// only read, so verifying twice gives the same diagnostics.
pub fn verify(op: &dyn Op, config: &VerifyConfig) -> Diagnostics {
    let mut diagnostics = Diagnostics::with_limit(config.max_diagnostics);
    verify_op(op, &mut diagnostics);
    debug!("Verification found {} error(s)", diagnostics.len());
    diagnostics
}

/// Like [verify], but return an error with rendered diagnostics on failure.
///
/// `src` is the source that `op` was parsed from and is used to show the
/// offending lines.
pub fn verify_or_error(
    op: &dyn Op,
    config: &VerifyConfig,
    src: &str,
) -> Result<(), VerificationError> {
    let diagnostics = verify(op, config);
    if diagnostics.is_empty() {
        return Ok(());
    }
    let rendered = diagnostics.render(src);
    Err(VerificationError {
        diagnostics,
        rendered,
    })
}
