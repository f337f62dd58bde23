use std::fmt::Display;
use std::fmt::Formatter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Markers
    Eof,

    // Identifiers
    /// foo or bril.ptr
    BareIdentifier,
    /// @foo
    AtIdentifier,
    /// %foo
    PercentIdentifier,
    /// ^bb0
    CaretIdentifier,

    // Literals
    /// 1.0
    FloatLiteral,
    /// 42
    Integer,
    /// "foo"
    String,
    /// i1, i32, i64
    IntType,
    /// f16, f32, f64
    FloatType,

    // Punctuation
    /// ->
    Arrow,
    /// :
    Colon,
    /// ,
    Comma,
    /// =
    Equal,
    /// (
    LParen,
    /// )
    RParen,
    /// {
    LBrace,
    /// }
    RBrace,
    /// [
    LBracket,
    /// ]
    RBracket,
    /// -
    Minus,
    /// !
    Exclamation,
    /// >
    Greater,
    /// <
    Less,

    // Keywords
    KwTrue,
    KwFalse,
}

/// Position of a token (or of the operation starting at that token) in the
/// source text.
///
/// `line` and `column` are zero-based internally and printed one-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    line: usize,
    column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
    pub fn line(&self) -> usize {
        self.line
    }
    pub fn column(&self) -> usize {
        self.column
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "loc(:{}:{})", self.line + 1, self.column + 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// The kind of token, such as `@foo` (AtIdentifier) or `i64` (IntType).
    pub kind: TokenKind,
    /// The text of the token, such as `@foo` or `i64`.
    pub lexeme: String,
    pub location: Location,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: String, location: Location) -> Self {
        Self {
            kind,
            lexeme,
            location,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} \"{}\" {}", self.kind, self.lexeme, self.location)
    }
}
