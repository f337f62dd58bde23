//! Collection of verification failures.
//!
//! Verifiers do not print or panic. They report into a [Diagnostics] that is
//! passed in by the caller, and return a [LogicalResult] so that the caller
//! can stop early via `?`.

use crate::ir::Operation;
use crate::ir::OperationName;
use crate::parser::Location;
use crate::parser::Scanner;
use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An operand or result has a type that does not fit the op.
    TypeMismatch,
    /// Wrong number of operands, results or successors, or a misplaced
    /// terminator.
    Structure,
    MissingAttribute,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    location: Option<Location>,
    op: OperationName,
    kind: DiagnosticKind,
    message: String,
}

impl Diagnostic {
    pub fn new(
        location: Option<Location>,
        op: OperationName,
        kind: DiagnosticKind,
        message: &str,
    ) -> Self {
        Self {
            location,
            op,
            kind,
            message: message.to_string(),
        }
    }
    pub fn location(&self) -> Option<Location> {
        self.location
    }
    pub fn op(&self) -> &OperationName {
        &self.op
    }
    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    /// Display the diagnostic together with the source line it points at.
    pub fn render(&self, src: &str) -> String {
        let text = format!("error: '{}' op {}", self.op, self.message);
        match self.location {
            Some(location) => Scanner::error(src, &location, &text),
            None => text,
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(location) = self.location {
            write!(f, "{location}: ")?;
        }
        write!(f, "error: '{}' op {}", self.op, self.message)
    }
}

/// Returned by verifiers after a failure was reported.
///
/// The details are in the [Diagnostics]; this value only signals that
/// verification of the op failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("operation failed verification")]
pub struct Failure;

/// `Ok(())` when the op passed, `Err(Failure)` otherwise.
pub type LogicalResult = Result<(), Failure>;

#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
    /// Maximum number of diagnostics to keep (0 means unlimited).
    limit: usize,
    dropped: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }
    pub fn is_full(&self) -> bool {
        self.limit != 0 && self.diagnostics.len() >= self.limit
    }
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.is_full() {
            self.dropped += 1;
        } else {
            self.diagnostics.push(diagnostic);
        }
    }
    /// Report an error at `operation` and return the failure sentinel.
    pub fn emit_op_error(
        &mut self,
        operation: &Operation,
        kind: DiagnosticKind,
        message: &str,
    ) -> LogicalResult {
        let diagnostic = Diagnostic::new(operation.location(), operation.name(), kind, message);
        self.push(diagnostic);
        Err(Failure)
    }
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }
    pub fn first(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }
    /// Number of diagnostics that were not kept due to the limit.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
    /// Display all diagnostics with source snippets from `src`.
    pub fn render(&self, src: &str) -> String {
        let mut out = self
            .diagnostics
            .iter()
            .map(|d| d.render(src))
            .collect::<Vec<_>>()
            .join("\n");
        if self.dropped > 0 {
            out.push_str(&format!("\n({} more errors not shown)", self.dropped));
        }
        out
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{diagnostic}")?;
        }
        if self.dropped > 0 {
            writeln!(f, "({} more errors not shown)", self.dropped)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;
    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_operation() -> Operation {
        let mut operation = Operation::default();
        operation.set_name(OperationName::new("bril.load"));
        operation.set_location(Some(Location::new(1, 2)));
        operation
    }

    #[test]
    fn test_emit_op_error() {
        let mut diagnostics = Diagnostics::new();
        let operation = load_operation();
        let result =
            diagnostics.emit_op_error(&operation, DiagnosticKind::TypeMismatch, "bad type");
        assert_eq!(result, Err(Failure));
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.first().unwrap();
        assert_eq!(diagnostic.kind(), DiagnosticKind::TypeMismatch);
        assert_eq!(diagnostic.message(), "bad type");
        assert_eq!(
            diagnostic.to_string(),
            "loc(:2:3): error: 'bril.load' op bad type"
        );
    }

    #[test]
    fn test_render() {
        let src = "module {\n  %0 = \"bril.load\"(%p) : (i32) -> i32\n}";
        let mut diagnostics = Diagnostics::new();
        let _ = diagnostics.emit_op_error(&load_operation(), DiagnosticKind::TypeMismatch, "oops");
        let rendered = diagnostics.render(src);
        assert!(rendered.contains("2  |   %0 = \"bril.load\""));
        assert!(rendered.contains("^ error: 'bril.load' op oops"));
    }

    #[test]
    fn test_limit() {
        let mut diagnostics = Diagnostics::with_limit(2);
        let operation = load_operation();
        for _ in 0..5 {
            let _ = diagnostics.emit_op_error(&operation, DiagnosticKind::Structure, "x");
        }
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics.dropped(), 3);
        assert!(diagnostics.to_string().contains("(3 more errors not shown)"));

        let mut unlimited = Diagnostics::with_limit(0);
        for _ in 0..5 {
            let _ = unlimited.emit_op_error(&operation, DiagnosticKind::Structure, "x");
        }
        assert_eq!(unlimited.len(), 5);
    }
}
