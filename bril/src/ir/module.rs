use crate::ir::Block;
use crate::ir::Op;
use crate::ir::Operation;
use crate::ir::OperationName;
use crate::ir::Region;
use crate::parser::Parse;
use crate::parser::Parser;
use crate::parser::ParserDispatch;
use crate::parser::TokenKind;
use crate::shared::Shared;
use crate::shared::SharedExt;
use anyhow::Result;
use std::fmt::Display;
use std::fmt::Formatter;
use std::sync::RwLock;

/// The top-level op holding all functions.
///
/// ```mlir
/// module {
///   func.func @main() { ... }
/// }
/// ```
pub struct ModuleOp {
    operation: Shared<Operation>,
}

impl Op for ModuleOp {
    fn operation_name() -> OperationName {
        OperationName::new("module")
    }
    fn new(operation: Shared<Operation>) -> Self {
        Self { operation }
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn operation(&self) -> &Shared<Operation> {
        &self.operation
    }
    fn display(&self, f: &mut Formatter<'_>, indent: i32) -> std::fmt::Result {
        write!(f, "{}", Self::operation_name())?;
        match self.region() {
            Some(region) => region.rd().display(f, indent),
            None => write!(f, " {{\n}}"),
        }
    }
}

impl Display for ModuleOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.display(f, 0)
    }
}

impl ModuleOp {
    /// Create a module whose single block holds `ops`.
    pub fn from_ops(ops: Vec<Shared<dyn Op>>) -> Self {
        let mut region = Region::default();
        region.add_block(Block::new(None, ops));
        let mut operation = Operation::default();
        operation.set_region(Some(Shared::new(RwLock::new(region))));
        ModuleOp::from_operation(Shared::new(RwLock::new(operation)))
    }
    pub fn first_op(&self) -> Result<Shared<dyn Op>> {
        match self.ops().into_iter().next() {
            Some(op) => Ok(op),
            None => Err(anyhow::anyhow!("Expected 1 op in module, got 0")),
        }
    }
}

impl Parse for ModuleOp {
    fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>> {
        let location = parser.peek().location;
        parser.parse_keyword("module")?;
        let region = parser.parse_region()?;
        let mut operation = Operation::default();
        operation.set_location(Some(location));
        operation.set_region(Some(region));
        let op = ModuleOp::from_operation(Shared::new(RwLock::new(operation)));
        Ok(Shared::new(RwLock::new(op)))
    }
}

impl<T: ParserDispatch> Parser<T> {
    /// Consume a bare keyword such as `module`.
    pub fn parse_keyword(&mut self, keyword: &str) -> Result<()> {
        let token = self.expect(TokenKind::BareIdentifier)?;
        if token.lexeme != keyword {
            let msg = format!("Expected \"{keyword}\", but got \"{}\"", token.lexeme);
            return Err(anyhow::anyhow!(self.error(&token, &msg)));
        }
        Ok(())
    }
}
