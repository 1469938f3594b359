//! Text backends for the weft circuit IR.
//!
//! Two formats are produced from a validated [`Circuit`](weft_ir::Circuit):
//! structural Verilog ([`emit_verilog`]) and the Trivial Graph Format
//! ([`emit_tgf`]). Both render the complete text before touching the output
//! sink, so a failed emission writes nothing.

#![warn(missing_docs)]

pub mod error;
mod names;
pub mod tgf;
pub mod verilog;

pub use error::EmitError;
pub use tgf::{emit_tgf, GraphOptions};
pub use verilog::{emit_verilog, VerilogOptions};
