use crate::parser::token::Location;
use crate::parser::token::Token;
use crate::parser::token::TokenKind;
use anyhow::Result;

pub struct Scanner {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
}

impl Scanner {
    fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 0,
            column: 0,
        }
    }
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }
    fn peek(&self) -> char {
        self.peek_n(0)
    }
    fn peek_next(&self) -> char {
        self.peek_n(1)
    }
    fn peek_n(&self, n: usize) -> char {
        match self.source.get(self.current + n) {
            Some(c) => *c,
            None => '\0',
        }
    }
    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }
    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = if kind == TokenKind::Eof {
            "".to_string()
        } else {
            self.lexeme()
        };
        let column = self.column - lexeme.chars().count();
        let location = Location::new(self.line, column);
        self.tokens.push(Token::new(kind, lexeme, location));
    }
    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
        let mut float = false;
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            float = true;
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        if self.is_exponent() {
            float = true;
            self.advance();
            if matches!(self.peek(), '+' | '-') {
                self.advance();
            }
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }
        if float {
            self.add_token(TokenKind::FloatLiteral);
        } else {
            self.add_token(TokenKind::Integer);
        }
    }
    /// Whether the number continues with an exponent such as `e20` or `e-7`.
    fn is_exponent(&self) -> bool {
        if !matches!(self.peek(), 'e' | 'E') {
            return false;
        }
        match self.peek_next() {
            '+' | '-' => self.peek_n(2).is_ascii_digit(),
            c => c.is_ascii_digit(),
        }
    }
    fn is_identifier_start(c: char) -> bool {
        c.is_alphabetic() || c == '_'
    }
    fn is_identifier(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '.' || c == '$'
    }
    /// Whether `word` looks like `i32` (and not like `if` or `i`).
    fn is_int_type(word: &str) -> bool {
        match word.strip_prefix('i') {
            Some(width) => !width.is_empty() && width.chars().all(|c| c.is_ascii_digit()),
            None => false,
        }
    }
    fn is_float_type(word: &str) -> bool {
        matches!(word, "f16" | "f32" | "f64")
    }
    // Scan identifiers, keywords and builtin types.
    fn identifier(&mut self) {
        while Scanner::is_identifier(self.peek()) {
            self.advance();
        }
        let lexeme = self.lexeme();
        let kind = match lexeme.as_str() {
            "true" => TokenKind::KwTrue,
            "false" => TokenKind::KwFalse,
            s if Scanner::is_int_type(s) => TokenKind::IntType,
            s if Scanner::is_float_type(s) => TokenKind::FloatType,
            _ => TokenKind::BareIdentifier,
        };
        self.add_token(kind);
    }
    // Scan `%0`, `@main` or `^bb1`.
    fn prefixed_identifier(&mut self, kind: TokenKind) -> Result<()> {
        if !Scanner::is_identifier(self.peek()) {
            return Err(self.error_here("Expected identifier after prefix"));
        }
        while Scanner::is_identifier(self.peek()) {
            self.advance();
        }
        self.add_token(kind);
        Ok(())
    }
    fn arrow_or_minus(&mut self) {
        if self.peek() == '>' {
            self.advance();
            self.add_token(TokenKind::Arrow);
        } else {
            self.add_token(TokenKind::Minus);
        }
    }
    fn string(&mut self) -> Result<()> {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                break;
            }
            if self.peek() == '\\' {
                self.advance();
            }
            self.advance();
        }
        if self.peek() != '"' {
            return Err(self.error_here("Unterminated string"));
        }
        self.advance();
        self.add_token(TokenKind::String);
        Ok(())
    }
    fn comment(&mut self) {
        while self.peek() != '\n' && !self.is_at_end() {
            self.advance();
        }
    }
    fn error_here(&self, msg: &str) -> anyhow::Error {
        let column = if self.column == 0 { 0 } else { self.column - 1 };
        let location = Location::new(self.line, column);
        let src: String = self.source.iter().collect();
        anyhow::anyhow!(Self::error(&src, &location, msg))
    }
    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LParen),
            ')' => self.add_token(TokenKind::RParen),
            '{' => self.add_token(TokenKind::LBrace),
            '}' => self.add_token(TokenKind::RBrace),
            '[' => self.add_token(TokenKind::LBracket),
            ']' => self.add_token(TokenKind::RBracket),
            ':' => self.add_token(TokenKind::Colon),
            ',' => self.add_token(TokenKind::Comma),
            '=' => self.add_token(TokenKind::Equal),
            '!' => self.add_token(TokenKind::Exclamation),
            '>' => self.add_token(TokenKind::Greater),
            '<' => self.add_token(TokenKind::Less),
            ' ' | '\r' | '\t' => (),
            '\n' => {
                self.line += 1;
                self.column = 0;
            }
            '/' if self.peek() == '/' => self.comment(),
            '-' => self.arrow_or_minus(),
            '"' => self.string()?,
            '%' => self.prefixed_identifier(TokenKind::PercentIdentifier)?,
            '@' => self.prefixed_identifier(TokenKind::AtIdentifier)?,
            '^' => self.prefixed_identifier(TokenKind::CaretIdentifier)?,
            s if s.is_ascii_digit() => self.number(),
            s if Scanner::is_identifier_start(s) => self.identifier(),
            _ => {
                return Err(self.error_here(&format!("Scanning failed starting at: {c}")));
            }
        }
        Ok(())
    }
    fn scan_tokens(&mut self) -> Result<()> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.start = self.current;
        self.add_token(TokenKind::Eof);
        Ok(())
    }
    pub fn scan(src: &str) -> Result<Vec<Token>> {
        let mut scanner = Scanner::new(src);
        scanner.scan_tokens()?;
        Ok(scanner.tokens)
    }
    /// Format `msg` below the source line of `loc`, with a caret at the column.
    pub fn error(src: &str, loc: &Location, msg: &str) -> String {
        let lines = src.split('\n').collect::<Vec<&str>>();
        let n = loc.line();
        let prev_line = if n > 0 {
            match lines.get(n - 1) {
                Some(prev) => format!("\n{}  | {prev}", n),
                None => "".to_string(),
            }
        } else {
            "".to_string()
        };
        let line = lines.get(n).copied().unwrap_or("");
        let line_num = (n + 1).to_string();
        let line_num_width = 4 + line_num.len();
        let err_indent = " ".repeat(loc.column() + line_num_width);
        format!("```{prev_line}\n{line_num}  | {line}\n{err_indent}^ {msg}\n```")
    }
}
