//! An intermediate representation for the Bril language with verification.
//!
//! Bril (Big Red Intermediate Language) is a small IR for teaching compilers.
//! This crate provides an MLIR-like textual IR for it:
//!
//! - [parser] turns the text into a tree of ops (see [ir]),
//! - [dialect] defines the ops of the `func` and `bril` dialects,
//! - [verify] checks the ops and reports problems into [diagnostic::Diagnostics].
//!
//! The checks that are specific to Bril live in the dialect. For example,
//! [dialect::bril::verify_load] ensures that `bril.load` reads from a
//! `!bril.ptr<T>` and produces a `T`:
//!
//! ```
//! use bril::opt::parse_and_verify;
//! use bril::opt::VerifyOptions;
//!
//! let src = r#"
//! func.func @main(%p : !bril.ptr<i32>) {
//!   %0 = "bril.load"(%p) : (!bril.ptr<i32>) -> f32
//!   return
//! }
//! "#;
//! let err = parse_and_verify(src, &VerifyOptions::default()).unwrap_err();
//! assert!(err.to_string().contains("result type must match pointee type of pointer"));
//! ```

pub mod diagnostic;
pub mod dialect;
pub mod ir;
pub mod opt;
pub mod parser;
pub mod shared;
#[cfg(feature = "test-utils")]
pub mod tester;
pub mod verify;

pub use opt::init_subscriber;

/// Dialects can define new operations, attributes, and types.
/// Each dialect is given an unique namespace that is prefixed.
pub trait Dialect {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
}
