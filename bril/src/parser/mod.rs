//! Parsing of the textual IR.
//!
//! The [Scanner] turns the source into [Token]s and the [Parser] turns the
//! tokens into ops. Which op is created for a given name is decided by a
//! [ParserDispatch].

#[allow(clippy::module_inception)]
mod parser;
mod scanner;
mod token;

pub use parser::DefaultParserDispatch;
pub use parser::Parse;
pub use parser::Parser;
pub use parser::ParserDispatch;
pub use scanner::Scanner;
pub use token::Location;
pub use token::Token;
pub use token::TokenKind;
