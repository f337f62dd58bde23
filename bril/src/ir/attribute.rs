use crate::ir::Type;
use crate::parser::Parser;
use crate::parser::ParserDispatch;
use crate::parser::TokenKind;
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

/// Attributes are known-constant values of operations (a variable is not
/// allowed), such as the `value` of `bril.const` or the `callee` of
/// `bril.call`.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    /// `42 : i64`
    Integer { value: i64, typ: Type },
    /// `1.5 : f64`
    Float { value: f64, typ: Type },
    /// `true`
    Bool(bool),
    /// `"hello"`, stored without the quotes.
    String(String),
    /// `@main`, stored without the `@`.
    Symbol(String),
    /// A type used as a value, such as `!bril.ptr<i64>`.
    Type(Type),
}

impl Display for Attribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Integer { value, typ } => write!(f, "{value} : {typ}"),
            Attribute::Float { value, typ } => write!(f, "{value:?} : {typ}"),
            Attribute::Bool(value) => write!(f, "{value}"),
            Attribute::String(value) => write!(f, "\"{value}\""),
            Attribute::Symbol(name) => write!(f, "@{name}"),
            Attribute::Type(typ) => write!(f, "{typ}"),
        }
    }
}

/// The attribute dictionary of an operation.
///
/// Keys are kept sorted so that printing is deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    map: BTreeMap<String, Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, key: &str, value: Attribute) {
        self.map.insert(key.to_string(), value);
    }
    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.map.get(key)
    }
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Display for Attributes {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.map.is_empty() {
            return Ok(());
        }
        let joined = self
            .map
            .iter()
            .map(|(key, value)| format!("{key} = {value}"))
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, " {{{joined}}}")
    }
}

impl<T: ParserDispatch> Parser<T> {
    fn parse_number_attribute(&mut self) -> Result<Attribute> {
        let negative = self.check(TokenKind::Minus);
        if negative {
            self.advance();
        }
        let token = self.advance().clone();
        let sign = if negative { "-" } else { "" };
        let text = format!("{sign}{}", token.lexeme);
        let attribute = match token.kind {
            TokenKind::Integer => {
                let value = match text.parse::<i64>() {
                    Ok(value) => value,
                    Err(_) => {
                        let msg = format!("Integer {text} is out of range");
                        return Err(anyhow::anyhow!(self.error(&token, &msg)));
                    }
                };
                self.expect(TokenKind::Colon)?;
                let typ = self.parse_type()?;
                Attribute::Integer { value, typ }
            }
            TokenKind::FloatLiteral => {
                let value = text.parse::<f64>()?;
                self.expect(TokenKind::Colon)?;
                let typ = self.parse_type()?;
                Attribute::Float { value, typ }
            }
            _ => {
                let msg = format!("Expected number, but got \"{}\"", token.lexeme);
                return Err(anyhow::anyhow!(self.error(&token, &msg)));
            }
        };
        Ok(attribute)
    }
    /// Parse a single attribute value.
    pub fn parse_attribute(&mut self) -> Result<Attribute> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Minus | TokenKind::Integer | TokenKind::FloatLiteral => {
                self.parse_number_attribute()
            }
            TokenKind::KwTrue => {
                self.advance();
                Ok(Attribute::Bool(true))
            }
            TokenKind::KwFalse => {
                self.advance();
                Ok(Attribute::Bool(false))
            }
            TokenKind::String => {
                self.advance();
                let text = token.lexeme.trim_matches('"').to_string();
                Ok(Attribute::String(text))
            }
            TokenKind::AtIdentifier => {
                self.advance();
                let name = token.lexeme.trim_start_matches('@').to_string();
                Ok(Attribute::Symbol(name))
            }
            TokenKind::IntType | TokenKind::FloatType | TokenKind::Exclamation => {
                Ok(Attribute::Type(self.parse_type()?))
            }
            _ => {
                let msg = format!("Expected attribute, but got \"{}\"", token.lexeme);
                Err(anyhow::anyhow!(self.error(&token, &msg)))
            }
        }
    }
    /// Parse `{key = value, ...}`.
    pub fn parse_attribute_dict(&mut self) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        self.expect(TokenKind::LBrace)?;
        while !self.check(TokenKind::RBrace) {
            let key = self.expect(TokenKind::BareIdentifier)?;
            if attributes.contains(&key.lexeme) {
                let msg = format!("Duplicate attribute '{}'", key.lexeme);
                return Err(anyhow::anyhow!(self.error(&key, &msg)));
            }
            self.expect(TokenKind::Equal)?;
            let value = self.parse_attribute()?;
            attributes.insert(&key.lexeme, value);
            if !self.check(TokenKind::RBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RBrace)?;
        Ok(attributes)
    }
}
