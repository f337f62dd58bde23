use crate::ir::Type;
use crate::parser::Parser;
use crate::parser::ParserDispatch;
use crate::parser::TokenKind;
use anyhow::Result;
use std::fmt::Display;
use std::fmt::Formatter;

/// `!bril.ptr<T>`, a pointer to a value of type `T`.
///
/// Pointer types are equal iff their pointee types are equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PointerType {
    pointee: Type,
}

impl PointerType {
    pub const NAME: &'static str = "bril.ptr";

    pub fn new(pointee: Type) -> Self {
        Self { pointee }
    }
    pub fn pointee(&self) -> &Type {
        &self.pointee
    }
}

impl Display for PointerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "!{}<{}>", Self::NAME, self.pointee)
    }
}

impl<T: ParserDispatch> Parser<T> {
    /// Parse the `<T>` part of `!bril.ptr<T>`.
    pub fn parse_pointer_type(&mut self) -> Result<Type> {
        self.expect(TokenKind::Less)?;
        let pointee = self.parse_type()?;
        self.expect(TokenKind::Greater)?;
        Ok(Type::pointer(pointee))
    }
}
