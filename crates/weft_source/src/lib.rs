//! Netlist source text management and position tracking.
//!
//! The [`SourceDb`] owns loaded netlist text; [`Span`] records a byte range in
//! one of those files and [`Location`] is its line/column rendering, used to
//! position-tag syntax errors.

#![warn(missing_docs)]

pub mod location;
pub mod source_db;
pub mod span;

pub use location::Location;
pub use source_db::{SourceDb, SourceFile};
pub use span::{FileId, Span};
