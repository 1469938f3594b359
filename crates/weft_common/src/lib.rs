//! Shared foundational types used across the weft netlist translator.
//!
//! Provides interned identifiers for wire and model names and the
//! [`InternalError`] type used to report broken invariants.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{InternalError, WeftResult};
