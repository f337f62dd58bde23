//! Dialect definitions.
//!
//! Dialects are collections of operations and types. This module contains
//! the `func` dialect and the Bril dialect.

pub mod bril;
pub mod func;
