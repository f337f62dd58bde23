use crate::dialect::bril;
use crate::dialect::func;
use crate::ir::Block;
use crate::ir::ModuleOp;
use crate::ir::Op;
use crate::ir::OpOperand;
use crate::ir::OpOperands;
use crate::ir::OpResult;
use crate::ir::Operation;
use crate::ir::Region;
use crate::ir::Type;
use crate::ir::Types;
use crate::ir::Value;
use crate::ir::Values;
use crate::parser::scanner::Scanner;
use crate::parser::token::Token;
use crate::parser::token::TokenKind;
use crate::shared::Shared;
use crate::shared::SharedExt;
use anyhow::Result;
use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::RwLock;
use tracing::debug;

/// Interface to add custom operations and types to the parser.
///
/// Downstream crates can implement this trait to support custom parsing. The
/// default implementation only knows about operations defined in this crate.
/// This gives the Rust compiler more insight into the dispatches compared to
/// using a hashmap registry.
pub trait ParserDispatch {
    fn dispatch_parse(name: String, parser: &mut Parser<Self>) -> Result<Shared<dyn Op>>
    where
        Self: Sized;
    /// Parse the rest of a dialect type after `!name` (e.g., `<i64>` after
    /// `!bril.ptr`).
    fn parse_dialect_type(parser: &mut Parser<Self>, name: &Token) -> Result<Type>
    where
        Self: Sized;
    fn parse_op(parser: &mut Parser<Self>) -> Result<Shared<dyn Op>>
    where
        Self: Sized,
    {
        let name = parser.peek_op_name().lexeme.clone();
        let name = name.trim_matches('"').to_string();
        Self::dispatch_parse(name, parser)
    }
}

/// Default operation parser.
///
/// This parser knows about all operations defined in this crate. For
/// operations in external dialects, define another parser dispatcher and use
/// it.
pub struct DefaultParserDispatch;

impl ParserDispatch for DefaultParserDispatch {
    fn dispatch_parse(name: String, parser: &mut Parser<Self>) -> Result<Shared<dyn Op>> {
        match name.as_str() {
            "module" => <ModuleOp as Parse>::op(parser),
            "func.func" => <func::FuncOp as Parse>::op(parser),
            "return" => <func::ReturnOp as Parse>::op(parser),
            "bril.func" => <bril::FuncOp as Parse>::op(parser),
            "bril.const" => <bril::ConstOp as Parse>::op(parser),
            "bril.add" => <bril::AddOp as Parse>::op(parser),
            "bril.sub" => <bril::SubOp as Parse>::op(parser),
            "bril.mul" => <bril::MulOp as Parse>::op(parser),
            "bril.div" => <bril::DivOp as Parse>::op(parser),
            "bril.eq" => <bril::EqOp as Parse>::op(parser),
            "bril.lt" => <bril::LtOp as Parse>::op(parser),
            "bril.gt" => <bril::GtOp as Parse>::op(parser),
            "bril.le" => <bril::LeOp as Parse>::op(parser),
            "bril.ge" => <bril::GeOp as Parse>::op(parser),
            "bril.not" => <bril::NotOp as Parse>::op(parser),
            "bril.and" => <bril::AndOp as Parse>::op(parser),
            "bril.or" => <bril::OrOp as Parse>::op(parser),
            "bril.id" => <bril::IdOp as Parse>::op(parser),
            "bril.undef" => <bril::UndefOp as Parse>::op(parser),
            "bril.nop" => <bril::NopOp as Parse>::op(parser),
            "bril.print" => <bril::PrintOp as Parse>::op(parser),
            "bril.alloc" => <bril::AllocOp as Parse>::op(parser),
            "bril.free" => <bril::FreeOp as Parse>::op(parser),
            "bril.store" => <bril::StoreOp as Parse>::op(parser),
            "bril.load" => <bril::LoadOp as Parse>::op(parser),
            "bril.ptr_add" => <bril::PtrAddOp as Parse>::op(parser),
            "bril.call" => <bril::CallOp as Parse>::op(parser),
            "bril.jmp" => <bril::JmpOp as Parse>::op(parser),
            "bril.br" => <bril::BrOp as Parse>::op(parser),
            "bril.ret" => <bril::RetOp as Parse>::op(parser),
            _ => {
                let token = parser.peek_op_name().clone();
                let msg = format!("Unknown operation: {name}");
                Err(anyhow::anyhow!(parser.error(&token, &msg)))
            }
        }
    }
    fn parse_dialect_type(parser: &mut Parser<Self>, name: &Token) -> Result<Type> {
        match name.lexeme.as_str() {
            bril::PointerType::NAME => parser.parse_pointer_type(),
            _ => {
                let msg = format!("Unknown type: !{}", name.lexeme);
                Err(anyhow::anyhow!(parser.error(name, &msg)))
            }
        }
    }
}

/// Interface to define parsing of operations.
///
/// Downstream crates can implement this trait to support parsing of custom
/// operations.
pub trait Parse {
    fn op<T: ParserDispatch>(parser: &mut Parser<T>) -> Result<Shared<dyn Op>>
    where
        Self: Sized;
}

pub struct Parser<T: ParserDispatch> {
    src: String,
    tokens: Vec<Token>,
    current: usize,
    /// SSA values visible at the current position, innermost scope last.
    scopes: Vec<HashMap<String, Shared<Value>>>,
    parse_op: std::marker::PhantomData<T>,
}

impl<T: ParserDispatch> Parser<T> {
    fn new(src: &str) -> Result<Self> {
        Ok(Parser::<T> {
            src: src.to_string(),
            tokens: Scanner::scan(src)?,
            current: 0,
            scopes: vec![HashMap::new()],
            parse_op: std::marker::PhantomData,
        })
    }
    pub fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }
    pub fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }
    pub fn peek(&self) -> &Token {
        self.peek_n(0)
    }
    /// Look `n` tokens ahead; the end of the input is an `Eof` token.
    pub fn peek_n(&self, n: usize) -> &Token {
        let index = (self.current + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }
    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }
    pub fn check(&self, kind: TokenKind) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.peek().kind == kind
    }
    /// Return the token holding the name of the next operation.
    ///
    /// Skips result names and '=' (e.g., `%0, %1 = <op name>`).
    pub fn peek_op_name(&self) -> &Token {
        if self.peek().kind != TokenKind::PercentIdentifier {
            return self.peek();
        }
        let mut n = 0;
        while matches!(
            self.peek_n(n).kind,
            TokenKind::PercentIdentifier | TokenKind::Comma
        ) {
            n += 1;
        }
        if self.peek_n(n).kind == TokenKind::Equal {
            self.peek_n(n + 1)
        } else {
            self.peek_n(n)
        }
    }
    pub fn error(&self, token: &Token, msg: &str) -> String {
        let msg = Scanner::error(&self.src, &token.location, msg);
        format!("\n\n{msg}\n")
    }
    pub fn report_token_error(&self, token: &Token, expected: TokenKind) -> Result<Token> {
        let msg = format!(
            "Expected {:?}, but got \"{}\" of kind {:?}",
            expected, token.lexeme, token.kind
        );
        Err(anyhow::anyhow!(self.error(token, &msg)))
    }
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            self.advance();
            Ok(self.previous().clone())
        } else {
            self.report_token_error(self.peek(), kind)
        }
    }
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }
    /// Make `value` visible under its name in the innermost scope.
    pub fn define(&mut self, token: &Token, value: Shared<Value>) -> Result<()> {
        let name = value.rd().name();
        let scope = match self.scopes.last_mut() {
            Some(scope) => scope,
            None => return Err(anyhow::anyhow!("No scope to define {name} in")),
        };
        if scope.contains_key(&name) {
            let msg = format!("redefinition of SSA value {name}");
            return Err(anyhow::anyhow!(self.error(token, &msg)));
        }
        scope.insert(name, value);
        Ok(())
    }
    fn lookup(&self, name: &str) -> Option<Shared<Value>> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }
    /// Parse `%0` into a use of an earlier defined value.
    pub fn parse_op_operand(&mut self) -> Result<(Token, OpOperand)> {
        let identifier = self.expect(TokenKind::PercentIdentifier)?;
        match self.lookup(&identifier.lexeme) {
            Some(value) => Ok((identifier, OpOperand::new(value))),
            None => {
                let msg = format!("use of undeclared SSA value {}", identifier.lexeme);
                Err(anyhow::anyhow!(self.error(&identifier, &msg)))
            }
        }
    }
    /// Parse `%0, %1` (possibly empty).
    pub fn parse_op_operands(&mut self) -> Result<Vec<(Token, OpOperand)>> {
        let mut operands = vec![];
        if !self.check(TokenKind::PercentIdentifier) {
            return Ok(operands);
        }
        loop {
            operands.push(self.parse_op_operand()?);
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(operands)
    }
    /// Verify that the types written after the operands match the operands.
    pub fn verify_operand_types(
        &self,
        operands: &[(Token, OpOperand)],
        types: &Types,
    ) -> Result<OpOperands> {
        if operands.len() != types.len() {
            let token = self.previous();
            let msg = format!(
                "Expected {} operand types but got {}",
                operands.len(),
                types.len()
            );
            return Err(anyhow::anyhow!(self.error(token, &msg)));
        }
        for ((token, operand), typ) in operands.iter().zip(types.vec().iter()) {
            let prior = operand.typ();
            if prior != *typ {
                let msg = format!(
                    "use of value '{}' expects different type than prior uses: '{typ}' vs '{prior}'",
                    token.lexeme
                );
                return Err(anyhow::anyhow!(self.error(token, &msg)));
            }
        }
        let operands = operands.iter().map(|(_, o)| o.clone()).collect();
        Ok(OpOperands::from_vec(operands))
    }
    /// Parse `%0, %1 =` if present.
    fn parse_result_names(&mut self) -> Result<Vec<Token>> {
        let mut names = vec![];
        if !self.check(TokenKind::PercentIdentifier) {
            return Ok(names);
        }
        loop {
            names.push(self.expect(TokenKind::PercentIdentifier)?);
            if self.check(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(TokenKind::Equal)?;
        Ok(names)
    }
    /// Parse `[^bb1, ^bb2]`.
    fn parse_successors(&mut self) -> Result<Vec<String>> {
        let mut successors = vec![];
        self.expect(TokenKind::LBracket)?;
        while !self.check(TokenKind::RBracket) {
            let label = self.expect(TokenKind::CaretIdentifier)?;
            successors.push(label.lexeme);
            if !self.check(TokenKind::RBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(successors)
    }
    /// Parse an op in the generic form into `O`:
    ///
    /// ```mlir
    /// %0 = "bril.add"(%a, %b) : (i64, i64) -> i64
    /// "bril.br"(%cond)[^then, ^else] : (i1) -> ()
    /// %1 = "bril.const"() {value = 1 : i64} : () -> i64
    /// ```
    pub fn parse_generic_op<O: Op + 'static>(&mut self) -> Result<Shared<dyn Op>> {
        let location = self.peek().location;
        let result_names = self.parse_result_names()?;
        let name = self.expect(TokenKind::String)?;
        let expected = O::operation_name().to_string();
        if name.lexeme.trim_matches('"') != expected {
            let msg = format!("Expected operation {expected}");
            return Err(anyhow::anyhow!(self.error(&name, &msg)));
        }
        debug!("Parsing {expected}");

        self.expect(TokenKind::LParen)?;
        let operands = self.parse_op_operands()?;
        self.expect(TokenKind::RParen)?;
        let successors = if self.check(TokenKind::LBracket) {
            self.parse_successors()?
        } else {
            vec![]
        };
        let mut operation = Operation::default();
        if self.check(TokenKind::LBrace) {
            operation.set_attributes(self.parse_attribute_dict()?);
        }
        self.expect(TokenKind::Colon)?;
        let operand_types = self.parse_type_list()?;
        let operands = self.verify_operand_types(&operands, &operand_types)?;
        self.expect(TokenKind::Arrow)?;
        let result_types = self.parse_result_types()?;
        if result_names.len() != result_types.len() {
            let msg = format!(
                "operation defines {} results but was provided {} to bind",
                result_types.len(),
                result_names.len()
            );
            return Err(anyhow::anyhow!(self.error(&name, &msg)));
        }

        let mut results = vec![];
        for (token, typ) in result_names.iter().zip(result_types.vec().iter()) {
            let result = Value::OpResult(OpResult::new(&token.lexeme, typ.clone()));
            let result: Shared<Value> = Shared::new(RwLock::new(result));
            self.define(token, result.clone())?;
            results.push(result);
        }
        operation.set_operands(operands);
        operation.set_successors(successors);
        operation.set_results(Values::from_vec(results));
        operation.set_location(Some(location));
        let op = O::from_operation(Shared::new(RwLock::new(operation)));
        Ok(Shared::new(RwLock::new(op)))
    }
    /// Parse `{ ops ^bb1: ops }`.
    ///
    /// Successor labels used inside the region must name one of its blocks.
    pub fn parse_region(&mut self) -> Result<Shared<Region>> {
        self.expect(TokenKind::LBrace)?;
        self.push_scope();
        let mut region = Region::default();
        let mut labels = HashSet::new();
        while !self.check(TokenKind::RBrace) {
            if self.is_at_end() {
                let token = self.peek().clone();
                let msg = "Expected '}' to close the region, but got end of input";
                return Err(anyhow::anyhow!(self.error(&token, msg)));
            }
            let label = if self.check(TokenKind::CaretIdentifier) {
                let label = self.expect(TokenKind::CaretIdentifier)?;
                self.expect(TokenKind::Colon)?;
                if !labels.insert(label.lexeme.clone()) {
                    let msg = format!("redefinition of block {}", label.lexeme);
                    return Err(anyhow::anyhow!(self.error(&label, &msg)));
                }
                Some(label.lexeme)
            } else {
                None
            };
            let mut block = Block::new(label, vec![]);
            while !self.check(TokenKind::RBrace)
                && !self.check(TokenKind::CaretIdentifier)
                && !self.is_at_end()
            {
                block.push(T::parse_op(self)?);
            }
            region.add_block(block);
        }
        self.expect(TokenKind::RBrace)?;
        self.pop_scope();
        self.verify_successors(&region, &labels)?;
        Ok(Shared::new(RwLock::new(region)))
    }
    fn verify_successors(&self, region: &Region, labels: &HashSet<String>) -> Result<()> {
        for op in region.ops() {
            let op = op.rd();
            let operation = op.operation().rd();
            for successor in operation.successors() {
                if !labels.contains(successor) {
                    let msg = format!("reference to an undefined block {successor}");
                    let msg = match operation.location() {
                        Some(location) => Scanner::error(&self.src, &location, &msg),
                        None => msg,
                    };
                    return Err(anyhow::anyhow!(format!("\n\n{msg}\n")));
                }
            }
        }
        Ok(())
    }
    /// Parse `src` into a module.
    ///
    /// When `src` does not start with a `module`, the parsed ops are wrapped
    /// into one.
    pub fn parse(src: &str) -> Result<Shared<dyn Op>> {
        let mut parser = Parser::<T>::new(src)?;
        let mut ops = vec![];
        while !parser.is_at_end() {
            ops.push(T::parse_op(&mut parser)?);
        }
        if ops.len() == 1 && ops[0].rd().as_any().is::<ModuleOp>() {
            return Ok(ops.remove(0));
        }
        let module = ModuleOp::from_ops(ops);
        Ok(Shared::new(RwLock::new(module)))
    }
}
