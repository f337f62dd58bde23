use crate::diagnostic::DiagnosticKind;
use crate::diagnostic::Diagnostics;
use crate::diagnostic::LogicalResult;
use crate::ir::Arity;
use crate::ir::BlockArgument;
use crate::ir::Op;
use crate::ir::Operation;
use crate::ir::OperationName;
use crate::ir::Shape;
use crate::ir::Types;
use crate::ir::Value;
use crate::ir::Values;
use crate::parser::Parse;
use crate::parser::Parser;
use crate::parser::ParserDispatch;
use crate::parser::TokenKind;
use crate::shared::Shared;
use crate::shared::SharedExt;
use anyhow::Result;
use std::fmt::Formatter;
use std::sync::RwLock;

/// Ops that define a function, such as `func.func` and `bril.func`.
///
/// The textual form of all these ops is
///
/// ```mlir
/// func.func @name(%a : i64, %b : i64) -> i64 {
///   ...
/// }
/// ```
///
/// where the result types and the body are optional.
pub trait Func: Op {
    fn identifier(&self) -> Option<String>;
    fn set_identifier(&mut self, identifier: String);
    fn return_types(&self) -> Types;
    fn set_return_types(&mut self, return_types: Types);
    fn arguments(&self) -> Values {
        self.operation().rd().arguments()
    }
    /// Check that every op named `return_name` in the body returns values
    /// of the function's result types.
    fn verify_return_types(
        &self,
        return_name: &OperationName,
        diagnostics: &mut Diagnostics,
    ) -> LogicalResult {
        let identifier = self.identifier().unwrap_or_default();
        let expected = self.return_types();
        let mut result = Ok(());
        for op in self.ops() {
            let op = op.rd();
            if &op.name() != return_name {
                continue;
            }
            let operation = op.operation().rd();
            let actual = operation.operand_types();
            if actual.len() != expected.len() {
                let msg = format!(
                    "has {} operands, but enclosing function (@{identifier}) returns {}",
                    actual.len(),
                    expected.len()
                );
                result = diagnostics.emit_op_error(&operation, DiagnosticKind::Structure, &msg);
                continue;
            }
            let pairs = actual.vec().iter().zip(expected.vec().iter());
            for (i, (actual, expected)) in pairs.enumerate() {
                if actual != expected {
                    let msg = format!(
                        "type of return operand {i} ('{actual}') doesn't match function result type ('{expected}') in function @{identifier}"
                    );
                    result =
                        diagnostics.emit_op_error(&operation, DiagnosticKind::TypeMismatch, &msg);
                }
            }
        }
        result
    }
}

/// Print an op implementing [Func] in its custom syntax.
pub fn display_func(op: &dyn Func, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
    let identifier = op.identifier().unwrap_or_default();
    write!(f, "{} @{identifier}({})", op.name(), op.arguments())?;
    let return_types = op.return_types();
    if return_types.len() == 1 {
        write!(f, " -> {return_types}")?;
    } else if !return_types.is_empty() {
        write!(f, " -> ({return_types})")?;
    }
    let operation = op.operation().rd();
    let attributes = operation.attributes();
    if !attributes.is_empty() {
        write!(f, " attributes{attributes}")?;
    }
    if let Some(region) = operation.region() {
        region.rd().display(f, indent)?;
    }
    Ok(())
}

impl<T: ParserDispatch> Parser<T> {
    /// Parse `(%a : i64, %b : i64)` and make the arguments visible in the
    /// current scope.
    fn parse_function_arguments(&mut self) -> Result<Values> {
        let mut arguments = vec![];
        self.expect(TokenKind::LParen)?;
        while !self.check(TokenKind::RParen) {
            let name = self.expect(TokenKind::PercentIdentifier)?;
            self.expect(TokenKind::Colon)?;
            let typ = self.parse_type()?;
            let argument = Value::BlockArgument(BlockArgument::new(&name.lexeme, typ));
            let argument: Shared<Value> = Shared::new(RwLock::new(argument));
            self.define(&name, argument.clone())?;
            arguments.push(argument);
            if !self.check(TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Values::from_vec(arguments))
    }
    pub fn parse_func<F: Func + 'static>(&mut self) -> Result<Shared<dyn Op>> {
        let location = self.peek().location;
        self.parse_keyword(&F::operation_name().name())?;
        let identifier = self.expect(TokenKind::AtIdentifier)?;
        let identifier = identifier.lexeme.trim_start_matches('@').to_string();

        self.push_scope();
        let arguments = self.parse_function_arguments()?;
        let return_types = if self.check(TokenKind::Arrow) {
            self.advance();
            self.parse_result_types()?
        } else {
            Types::default()
        };
        let region = if self.check(TokenKind::LBrace) {
            Some(self.parse_region()?)
        } else {
            None
        };
        self.pop_scope();

        let mut operation = Operation::default();
        operation.set_arguments(arguments);
        operation.set_region(region);
        operation.set_location(Some(location));
        let mut op = F::from_operation(Shared::new(RwLock::new(operation)));
        op.set_identifier(identifier);
        op.set_return_types(return_types);
        Ok(Shared::new(RwLock::new(op)))
    }
    /// Parse `return %0, %1 : i64, i64` where the operands are optional.
    pub fn parse_return<R: Op + 'static>(&mut self) -> Result<Shared<dyn Op>> {
        let location = self.peek().location;
        let keyword = R::operation_name().name();
        self.parse_keyword(&keyword)?;
        let operands = self.parse_op_operands()?;
        let mut types = vec![];
        if !operands.is_empty() {
            self.expect(TokenKind::Colon)?;
            loop {
                types.push(self.parse_type()?);
                if self.check(TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        let operands = self.verify_operand_types(&operands, &Types::from_vec(types))?;
        let mut operation = Operation::default();
        operation.set_operands(operands);
        operation.set_location(Some(location));
        let op = R::from_operation(Shared::new(RwLock::new(operation)));
        Ok(Shared::new(RwLock::new(op)))
    }
}

/// `func.func`
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
        OperationName::new("func.func")
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
        self.verify_return_types(&ReturnOp::operation_name(), diagnostics)
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

/// `return`
///
/// ```mlir
/// return %0 : i64
/// ```
pub struct ReturnOp {
    operation: Shared<Operation>,
}

impl ReturnOp {
    /// Print an op in the `return %0 : i64` form.
    pub fn display_return(op: &dyn Op, f: &mut Formatter<'_>) -> std::fmt::Result {
        let operation = op.operation().rd();
        write!(f, "{}", operation.name())?;
        let operands = operation.operands();
        if !operands.is_empty() {
            write!(f, " {operands} : {}", operation.operand_types())?;
        }
        Ok(())
    }
}

impl Op for ReturnOp {
    fn operation_name() -> OperationName {
        OperationName::new("return")
    }
    fn new(operation: Shared<Operation>) -> Self {
        ReturnOp { operation }
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn operation(&self) -> &Shared<Operation> {
        &self.operation
    }
    fn shape(&self) -> Shape {
        Shape::new(Arity::Variadic, Arity::Exact(0))
    }
    fn is_terminator(&self) -> bool {
        true
    }
    fn display(&self, f: &mut Formatter<'_>, _indent: i32) -> std::fmt::Result {
        ReturnOp::display_return(self, f)
    }
}

impl Parse for ReturnOp {
    fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>> {
        parser.parse_return::<ReturnOp>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::DefaultParserDispatch;
    use crate::verify::verify;
    use crate::verify::VerifyConfig;
    use indoc::indoc;

    fn parse(src: &str) -> Shared<dyn Op> {
        Parser::<DefaultParserDispatch>::parse(src).unwrap()
    }

    #[test]
    fn test_func_display() {
        let src = indoc! {r#"
        module {
          func.func @add(%a : i64, %b : i64) -> i64 {
            %0 = "bril.add"(%a, %b) : (i64, i64) -> i64
            return %0 : i64
          }
        }"#};
        let module = parse(src);
        assert_eq!(module.rd().to_string(), src);
        let func = module.rd().ops()[0].clone();
        let func = func.rd();
        let func = func.as_any().downcast_ref::<FuncOp>().unwrap();
        assert_eq!(func.identifier().unwrap(), "add");
        assert_eq!(func.arguments().len(), 2);
        assert_eq!(func.return_types().to_string(), "i64");
    }

    #[test]
    fn test_declaration() {
        let src = "func.func @ext(%a : f32) -> (i64, i1)";
        let module = parse(src);
        let func = module.rd().ops()[0].clone();
        assert_eq!(func.rd().to_string(), src);
        assert!(func.rd().region().is_none());
    }

    #[test]
    fn test_return_types() {
        let src = indoc! {r#"
        func.func @f(%a : i32) -> i64 {
          return %a : i32
        }
        func.func @g() -> i64 {
          return
        }
        "#};
        let module = parse(src);
        let diagnostics = verify(&*module.rd(), &VerifyConfig::default());
        let messages = diagnostics
            .iter()
            .map(|d| d.message().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            messages,
            vec![
                "type of return operand 0 ('i32') doesn't match function result type ('i64') in function @f",
                "has 0 operands, but enclosing function (@g) returns 1",
            ]
        );
        assert_eq!(diagnostics.first().unwrap().op().name(), "return");
    }
}
