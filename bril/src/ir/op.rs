use crate::diagnostic::Diagnostics;
use crate::diagnostic::LogicalResult;
use crate::ir::Operation;
use crate::ir::OperationName;
use crate::ir::Region;
use crate::ir::Value;
use crate::shared::Shared;
use crate::shared::SharedExt;
use std::fmt::Display;
use std::fmt::Formatter;

/// How many operands, results or successors an op expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtMost(usize),
    Variadic,
}

impl Arity {
    /// Return an error message if `found` does not satisfy the arity.
    ///
    /// `what` is the plural noun, such as `operands`.
    pub fn check(&self, what: &str, found: usize) -> Option<String> {
        match *self {
            Arity::Exact(n) if n != found => Some(format!("expected {n} {what}, but found {found}")),
            Arity::AtMost(n) if found > n => {
                Some(format!("expected at most {n} {what}, but found {found}"))
            }
            _ => None,
        }
    }
}

/// The structural shape of an op, checked before the op's own verifier runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shape {
    pub operands: Arity,
    pub results: Arity,
    pub successors: Arity,
}

impl Shape {
    pub fn new(operands: Arity, results: Arity) -> Self {
        Self {
            operands,
            results,
            successors: Arity::Exact(0),
        }
    }
    /// Exactly `operands` operands, `results` results and no successors.
    pub fn fixed(operands: usize, results: usize) -> Self {
        Self::new(Arity::Exact(operands), Arity::Exact(results))
    }
    pub fn any() -> Self {
        Self {
            operands: Arity::Variadic,
            results: Arity::Variadic,
            successors: Arity::Variadic,
        }
    }
    pub fn with_successors(mut self, successors: Arity) -> Self {
        self.successors = successors;
        self
    }
}

/// This is the trait that is implemented by all operations.
///
/// The parser parses the tokens into an [Operation] and wraps it into a
/// specific [Op] such as `LoadOp`. All data lives in the [Operation]; the
/// [Op] adds the semantics (shape, verification, printing).
pub trait Op: Send + Sync {
    fn operation_name() -> OperationName
    where
        Self: Sized;
    /// Wrap an [Operation].
    ///
    /// Do not call this method directly, but rather use
    /// [Self::from_operation] which also sets the operation name.
    fn new(operation: Shared<Operation>) -> Self
    where
        Self: Sized;
    fn from_operation(operation: Shared<Operation>) -> Self
    where
        Self: Sized,
    {
        operation.wr().set_name(Self::operation_name());
        Self::new(operation)
    }
    fn as_any(&self) -> &dyn std::any::Any;
    fn operation(&self) -> &Shared<Operation>;
    /// Returns the name of the operation.
    ///
    /// Unlike `operation_name()`, this method is available on a `dyn Op`.
    fn name(&self) -> OperationName {
        self.operation().rd().name()
    }
    fn shape(&self) -> Shape {
        Shape::any()
    }
    fn required_attributes(&self) -> &'static [&'static str] {
        &[]
    }
    fn is_terminator(&self) -> bool {
        false
    }
    /// Op-specific checks.
    ///
    /// Called by the verification pass only after the [Shape] and the
    /// required attributes were found to be valid. Failures are reported via
    /// `diagnostics`.
    fn verify(&self, _diagnostics: &mut Diagnostics) -> LogicalResult {
        Ok(())
    }
    fn region(&self) -> Option<Shared<Region>> {
        self.operation().rd().region()
    }
    /// Return the ops nested inside the region of this op.
    fn ops(&self) -> Vec<Shared<dyn Op>> {
        match self.region() {
            Some(region) => region.rd().ops(),
            None => vec![],
        }
    }
    fn result(&self, index: usize) -> Option<Shared<Value>> {
        self.operation().rd().result(index)
    }
    /// Display the op without leading indentation.
    ///
    /// `indent` is the indentation level of the line the op is printed on,
    /// which is needed for ops with regions.
    fn display(&self, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
        self.operation().rd().display(f, indent)
    }
}

impl Display for dyn Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(Arity::Exact(1).check("operands", 1), None);
        assert_eq!(
            Arity::Exact(1).check("operands", 2).unwrap(),
            "expected 1 operands, but found 2"
        );
        assert_eq!(Arity::AtMost(1).check("results", 0), None);
        assert_eq!(
            Arity::AtMost(1).check("results", 2).unwrap(),
            "expected at most 1 results, but found 2"
        );
        assert_eq!(Arity::Variadic.check("operands", 7), None);
    }
}
