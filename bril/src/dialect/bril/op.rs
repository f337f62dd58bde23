use crate::diagnostic::Diagnostics;
use crate::diagnostic::LogicalResult;
use crate::dialect::bril::verify::verify_load;
use crate::dialect::bril::verify::verify_store;
use crate::dialect::func::display_func;
use crate::dialect::func::Func;
use crate::ir::Arity;
use crate::ir::Op;
use crate::ir::OpOperand;
use crate::ir::Operation;
use crate::ir::OperationName;
use crate::ir::Shape;
use crate::ir::Type;
use crate::ir::Types;
use crate::parser::Parse;
use crate::parser::Parser;
use crate::parser::ParserDispatch;
use crate::shared::Shared;
use crate::shared::SharedExt;
use anyhow::Result;
use std::fmt::Formatter;

/// Define an op that is parsed and printed in the generic form and has no
/// verifier apart from its [Shape] and required attributes.
macro_rules! bril_op {
    (
        $(#[$meta:meta])*
        $op:ident, $name:literal, $shape:expr, [$($attribute:literal),*], $terminator:literal
    ) => {
        $(#[$meta])*
        pub struct $op {
            operation: Shared<Operation>,
        }

        impl Op for $op {
            fn operation_name() -> OperationName {
                OperationName::new($name)
            }
            fn new(operation: Shared<Operation>) -> Self {
                $op { operation }
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn operation(&self) -> &Shared<Operation> {
                &self.operation
            }
            fn shape(&self) -> Shape {
                $shape
            }
            fn required_attributes(&self) -> &'static [&'static str] {
                &[$($attribute),*]
            }
            fn is_terminator(&self) -> bool {
                $terminator
            }
        }

        impl Parse for $op {
            fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>> {
                parser.parse_generic_op::<$op>()
            }
        }
    };
}

bril_op!(
    /// `bril.const`, a constant given by the `value` attribute.
    ///
    /// ```mlir
    /// %0 = "bril.const"() {value = 42 : i64} : () -> i64
    /// ```
    ConstOp, "bril.const", Shape::fixed(0, 1), ["value"], false
);
bril_op!(AddOp, "bril.add", Shape::fixed(2, 1), [], false);
bril_op!(SubOp, "bril.sub", Shape::fixed(2, 1), [], false);
bril_op!(MulOp, "bril.mul", Shape::fixed(2, 1), [], false);
bril_op!(DivOp, "bril.div", Shape::fixed(2, 1), [], false);
bril_op!(EqOp, "bril.eq", Shape::fixed(2, 1), [], false);
bril_op!(LtOp, "bril.lt", Shape::fixed(2, 1), [], false);
bril_op!(GtOp, "bril.gt", Shape::fixed(2, 1), [], false);
bril_op!(LeOp, "bril.le", Shape::fixed(2, 1), [], false);
bril_op!(GeOp, "bril.ge", Shape::fixed(2, 1), [], false);
bril_op!(NotOp, "bril.not", Shape::fixed(1, 1), [], false);
bril_op!(AndOp, "bril.and", Shape::fixed(2, 1), [], false);
bril_op!(OrOp, "bril.or", Shape::fixed(2, 1), [], false);
bril_op!(IdOp, "bril.id", Shape::fixed(1, 1), [], false);
bril_op!(UndefOp, "bril.undef", Shape::fixed(0, 1), [], false);
bril_op!(NopOp, "bril.nop", Shape::fixed(0, 0), [], false);
bril_op!(
    /// `bril.print`, which takes any number of operands.
    PrintOp, "bril.print", Shape::new(Arity::Variadic, Arity::Exact(0)), [], false
);
bril_op!(
    /// `bril.alloc`, allocate the number of elements given by the operand.
    AllocOp, "bril.alloc", Shape::fixed(1, 1), [], false
);
bril_op!(FreeOp, "bril.free", Shape::fixed(1, 0), [], false);
bril_op!(
    /// `bril.ptr_add`, offset a pointer by an integer.
    PtrAddOp, "bril.ptr_add", Shape::fixed(2, 1), [], false
);
bril_op!(
    /// `bril.call`, call the function named by the `callee` attribute.
    ///
    /// ```mlir
    /// %0 = "bril.call"(%a) {callee = @inc} : (i64) -> i64
    /// ```
    CallOp, "bril.call", Shape::new(Arity::Variadic, Arity::AtMost(1)), ["callee"], false
);
bril_op!(
    /// `bril.jmp`, unconditional branch.
    ///
    /// ```mlir
    /// "bril.jmp"()[^exit] : () -> ()
    /// ```
    JmpOp, "bril.jmp", Shape::fixed(0, 0).with_successors(Arity::Exact(1)), [], true
);
bril_op!(
    /// `bril.br`, branch to the first successor if the condition holds and
    /// to the second otherwise.
    BrOp, "bril.br", Shape::fixed(1, 0).with_successors(Arity::Exact(2)), [], true
);
bril_op!(
    /// `bril.ret`, return from a `bril.func`.
    RetOp, "bril.ret", Shape::new(Arity::Variadic, Arity::Exact(0)), [], true
);

/// `bril.load`, read the value behind a pointer.
///
/// ```mlir
/// %0 = "bril.load"(%ptr) : (!bril.ptr<i64>) -> i64
/// ```
pub struct LoadOp {
    operation: Shared<Operation>,
}

impl LoadOp {
    pub fn pointer(&self) -> Option<OpOperand> {
        self.operation.rd().operand(0)
    }
    pub fn result_type(&self) -> Option<Type> {
        self.operation.rd().result_type(0)
    }
}

impl Op for LoadOp {
    fn operation_name() -> OperationName {
        OperationName::new("bril.load")
    }
    fn new(operation: Shared<Operation>) -> Self {
        LoadOp { operation }
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn operation(&self) -> &Shared<Operation> {
        &self.operation
    }
    fn shape(&self) -> Shape {
        Shape::fixed(1, 1)
    }
    fn verify(&self, diagnostics: &mut Diagnostics) -> LogicalResult {
        verify_load(self, diagnostics)
    }
}

impl Parse for LoadOp {
    fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>> {
        parser.parse_generic_op::<LoadOp>()
    }
}

/// `bril.store`, write a value behind a pointer.
///
/// ```mlir
/// "bril.store"(%ptr, %value) : (!bril.ptr<i64>, i64) -> ()
/// ```
pub struct StoreOp {
    operation: Shared<Operation>,
}

impl StoreOp {
    pub fn pointer(&self) -> Option<OpOperand> {
        self.operation.rd().operand(0)
    }
    pub fn value(&self) -> Option<OpOperand> {
        self.operation.rd().operand(1)
    }
}

impl Op for StoreOp {
    fn operation_name() -> OperationName {
        OperationName::new("bril.store")
    }
    fn new(operation: Shared<Operation>) -> Self {
        StoreOp { operation }
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn operation(&self) -> &Shared<Operation> {
        &self.operation
    }
    fn shape(&self) -> Shape {
        Shape::fixed(2, 0)
    }
    fn verify(&self, diagnostics: &mut Diagnostics) -> LogicalResult {
        verify_store(self, diagnostics)
    }
}

impl Parse for StoreOp {
    fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>> {
        parser.parse_generic_op::<StoreOp>()
    }
}

/// `bril.func`, a Bril function.
///
/// Uses the same syntax as `func.func`, but returns via `bril.ret`.
pub struct FuncOp {
    operation: Shared<Operation>,
    identifier: Option<String>,
    return_types: Types,
}

impl Func for FuncOp {
    fn identifier(&self) -> Option<String> {
        self.identifier.clone()
    }
    fn set_identifier(&mut self, identifier: String) {
        self.identifier = Some(identifier);
    }
    fn return_types(&self) -> Types {
        self.return_types.clone()
    }
    fn set_return_types(&mut self, return_types: Types) {
        self.return_types = return_types;
    }
}

impl Op for FuncOp {
    fn operation_name() -> OperationName {
        OperationName::new("bril.func")
    }
    fn new(operation: Shared<Operation>) -> Self {
        FuncOp {
            operation,
            identifier: None,
            return_types: Types::default(),
        }
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn operation(&self) -> &Shared<Operation> {
        &self.operation
    }
    fn shape(&self) -> Shape {
        Shape::fixed(0, 0)
    }
    fn verify(&self, diagnostics: &mut Diagnostics) -> LogicalResult {
        self.verify_return_types(&RetOp::operation_name(), diagnostics)
    }
    fn display(&self, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
        display_func(self, f, indent)
    }
}

impl Parse for FuncOp {
    fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>> {
        parser.parse_func::<FuncOp>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DefaultParserDispatch;
    use crate::verify::verify;
    use crate::verify::VerifyConfig;
    use indoc::indoc;

    #[test]
    fn test_control_flow() {
        let src = indoc! {r#"
        module {
          bril.func @main(%a : i64, %b : i64) -> i64 {
            %0 = "bril.lt"(%a, %b) : (i64, i64) -> i1
            "bril.br"(%0)[^then, ^else] : (i1) -> ()
          ^then:
            "bril.ret"(%a) : (i64) -> ()
          ^else:
            "bril.jmp"()[^then] : () -> ()
          }
        }"#};
        let module = Parser::<DefaultParserDispatch>::parse(src).unwrap();
        assert_eq!(module.rd().to_string(), src);
        let diagnostics = verify(&*module.rd(), &VerifyConfig::default());
        assert!(diagnostics.is_empty(), "{diagnostics}");
    }

    #[test]
    fn test_branch_shape() {
        let src = indoc! {r#"
        bril.func @main(%c : i1) {
          "bril.br"(%c)[^exit] : (i1) -> ()
        ^exit:
          "bril.ret"() : () -> ()
        }
        "#};
        let module = Parser::<DefaultParserDispatch>::parse(src).unwrap();
        let diagnostics = verify(&*module.rd(), &VerifyConfig::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.first().unwrap().message(),
            "expected 2 successors, but found 1"
        );
    }

    #[test]
    fn test_call() {
        let src = indoc! {r#"
        bril.func @main(%a : i64) {
          %0 = "bril.call"(%a) {callee = @inc} : (i64) -> i64
          "bril.call"(%0) : (i64) -> ()
          %1, %2 = "bril.call"() {callee = @pair} : () -> (i64, i64)
          "bril.ret"() : () -> ()
        }
        "#};
        let module = Parser::<DefaultParserDispatch>::parse(src).unwrap();
        let diagnostics = verify(&*module.rd(), &VerifyConfig::default());
        let messages = diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "requires attribute 'callee'",
                "expected at most 1 results, but found 2",
            ]
        );
    }

    #[test]
    fn test_accessors() {
        let src = indoc! {r#"
        bril.func @main(%p : !bril.ptr<i64>, %v : i64) {
          "bril.store"(%p, %v) : (!bril.ptr<i64>, i64) -> ()
          %0 = "bril.load"(%p) : (!bril.ptr<i64>) -> i64
          "bril.ret"() : () -> ()
        }
        "#};
        let module = Parser::<DefaultParserDispatch>::parse(src).unwrap();
        let func = module.rd().ops()[0].clone();
        let ops = func.rd().ops();

        let store = ops[0].rd();
        let store = store.as_any().downcast_ref::<StoreOp>().unwrap();
        assert_eq!(store.pointer().unwrap().name(), "%p");
        assert_eq!(store.value().unwrap().typ(), Type::integer(64));

        let load = ops[1].rd();
        let load = load.as_any().downcast_ref::<LoadOp>().unwrap();
        assert_eq!(load.pointer().unwrap().name(), "%p");
        assert_eq!(load.result_type().unwrap(), Type::integer(64));
    }
}
