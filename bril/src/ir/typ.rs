use crate::dialect::bril::PointerType;
use crate::parser::Parser;
use crate::parser::ParserDispatch;
use crate::parser::TokenKind;
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::OnceLock;

/// Represent an integer type such as i32 or i64.
///
/// Just like in LLVM, this does not include the sign bit since the sign does
/// not matter for 2s complement integer arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntegerType {
    width: u32,
}

impl IntegerType {
    pub fn new(width: u32) -> Self {
        Self { width }
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    /// Parse `i32` into an [IntegerType].
    pub fn from_str(s: &str) -> Result<Self> {
        let width = s
            .strip_prefix('i')
            .ok_or_else(|| anyhow::anyhow!("Expected integer type, got {s}"))?;
        let width = width.parse::<u32>()?;
        if width == 0 {
            return Err(anyhow::anyhow!("Integer type must have a width, got {s}"));
        }
        Ok(Self { width })
    }
}

impl Display for IntegerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "i{}", self.width)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FloatType {
    F16,
    F32,
    F64,
}

impl FloatType {
    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "f16" => Ok(FloatType::F16),
            "f32" => Ok(FloatType::F32),
            "f64" => Ok(FloatType::F64),
            _ => Err(anyhow::anyhow!("Expected float type, got {s}")),
        }
    }
}

impl Display for FloatType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FloatType::F16 => write!(f, "f16"),
            FloatType::F32 => write!(f, "f32"),
            FloatType::F64 => write!(f, "f64"),
        }
    }
}

/// The structure of a type.
///
/// Each concrete type is one variant. Checking whether a type is of some kind
/// is a `match` (see for example [Type::as_pointer]).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Integer(IntegerType),
    Float(FloatType),
    /// `!bril.ptr<T>`.
    Pointer(PointerType),
}

impl Display for TypeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeKind::Integer(typ) => write!(f, "{typ}"),
            TypeKind::Float(typ) => write!(f, "{typ}"),
            TypeKind::Pointer(typ) => write!(f, "{typ}"),
        }
    }
}

/// Handle to an interned, immutable type.
///
/// Equality is structural: two handles are equal when their [TypeKind]s are
/// equal, regardless of where each handle was created. Interning makes the
/// common case a pointer comparison.
#[derive(Clone)]
pub struct Type(Arc<TypeKind>);

impl Type {
    /// Intern `kind` in the global [TypeInterner].
    pub fn new(kind: TypeKind) -> Self {
        TypeInterner::global().intern(kind)
    }
    pub fn integer(width: u32) -> Self {
        Type::new(TypeKind::Integer(IntegerType::new(width)))
    }
    pub fn float(typ: FloatType) -> Self {
        Type::new(TypeKind::Float(typ))
    }
    /// `!bril.ptr<pointee>`.
    pub fn pointer(pointee: Type) -> Self {
        Type::new(TypeKind::Pointer(PointerType::new(pointee)))
    }
    pub fn kind(&self) -> &TypeKind {
        &self.0
    }
    /// Return the pointer payload if this is a pointer type.
    pub fn as_pointer(&self) -> Option<&PointerType> {
        match self.kind() {
            TypeKind::Pointer(ptr) => Some(ptr),
            _ => None,
        }
    }
    /// Whether both handles point to the same interned object.
    pub fn is_same_instance(&self, other: &Type) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_instance(other) || self.0 == other.0
    }
}

impl Eq for Type {}

impl Hash for Type {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Table owning every [TypeKind] that was created.
#[derive(Default)]
pub struct TypeInterner {
    types: RwLock<HashSet<Arc<TypeKind>>>,
}

impl TypeInterner {
    /// The process-wide table used by [Type::new].
    pub fn global() -> &'static TypeInterner {
        static INTERNER: OnceLock<TypeInterner> = OnceLock::new();
        INTERNER.get_or_init(TypeInterner::default)
    }
    pub fn intern(&self, kind: TypeKind) -> Type {
        if let Some(existing) = self.types.read().get(&kind) {
            return Type(existing.clone());
        }
        let mut types = self.types.write();
        // Another thread may have inserted it between the two locks.
        if let Some(existing) = types.get(&kind) {
            return Type(existing.clone());
        }
        let kind = Arc::new(kind);
        types.insert(kind.clone());
        Type(kind)
    }
    pub fn len(&self) -> usize {
        self.types.read().len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A list of types such as the operand types `(i64, !bril.ptr<i64>)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Types {
    types: Vec<Type>,
}

impl Types {
    pub fn from_vec(types: Vec<Type>) -> Self {
        Self { types }
    }
    pub fn vec(&self) -> &Vec<Type> {
        &self.types
    }
    pub fn len(&self) -> usize {
        self.types.len()
    }
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Display for Types {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .types
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{joined}")
    }
}

impl<T: ParserDispatch> Parser<T> {
    /// Parse a builtin type (`i64`, `f32`) or a dialect type (`!bril.ptr<i64>`).
    pub fn parse_type(&mut self) -> Result<Type> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::IntType => {
                self.advance();
                let typ = IntegerType::from_str(&token.lexeme)?;
                Ok(Type::new(TypeKind::Integer(typ)))
            }
            TokenKind::FloatType => {
                self.advance();
                Ok(Type::float(FloatType::from_str(&token.lexeme)?))
            }
            TokenKind::Exclamation => {
                self.advance();
                let name = self.expect(TokenKind::BareIdentifier)?;
                T::parse_dialect_type(self, &name)
            }
            _ => {
                let msg = format!("Expected type, but got \"{}\"", token.lexeme);
                Err(anyhow::anyhow!(self.error(&token, &msg)))
            }
        }
    }
    /// Parse `(i64, i1)` where the parentheses are required.
    pub fn parse_type_list(&mut self) -> Result<Types> {
        self.expect(TokenKind::LParen)?;
        let mut types = vec![];
        while !self.check(TokenKind::RParen) {
            types.push(self.parse_type()?);
            if !self.check(TokenKind::RParen) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(Types::from_vec(types))
    }
    /// Parse result types: either a single type or a parenthesized list.
    pub fn parse_result_types(&mut self) -> Result<Types> {
        if self.check(TokenKind::LParen) {
            self.parse_type_list()
        } else {
            Ok(Types::from_vec(vec![self.parse_type()?]))
        }
    }
}
