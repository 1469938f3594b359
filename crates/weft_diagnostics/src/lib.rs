//! Structured diagnostics for the weft translator.
//!
//! Fatal netlist errors and non-fatal observations made while lowering a
//! netlist (ignored reset nets, unmerged vectors) are both reported as
//! [`Diagnostic`]s. Non-fatal ones accumulate in a [`DiagnosticSink`]; the
//! [`TerminalRenderer`] prints either kind in a rustc-like layout.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::{Diagnostic, Label, LabelStyle, Severity};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use sink::DiagnosticSink;
