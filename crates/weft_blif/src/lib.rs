//! Reader for flattened BLIF netlists.
//!
//! [`parse_netlist`] turns BLIF text into a [`BlifModel`] syntax tree;
//! [`read_netlist`] additionally lowers the model into a validated
//! [`Circuit`](weft_ir::Circuit). Every failure is fatal and carries the
//! [`Span`](weft_source::Span) of the offending text. Non-fatal findings
//! (ignored reset nets, port vectors left unmerged) go to the
//! [`DiagnosticSink`].

#![warn(missing_docs)]

pub mod ast;
pub mod cover;
pub mod error;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod token;

pub use ast::{BlifModel, Command, CoverRow, DffCell, LatchDef, NamesDef, Net, SubcktDef};
pub use cover::{decode_cover, Gate};
pub use error::NetlistError;
pub use lower::{lower, BlifOptions, NetlistOutput};

use weft_diagnostics::DiagnosticSink;
use weft_source::{FileId, SourceDb};

/// Parses a BLIF file into its syntax tree without building a circuit.
pub fn parse_netlist(
    file: FileId,
    source_db: &SourceDb,
    sink: &DiagnosticSink,
) -> Result<BlifModel, NetlistError> {
    let source = &source_db.get_file(file).content;
    let tokens = lexer::lex(source, file);
    let mut parser = parser::Parser::new(tokens, source, sink);
    parser.parse_model()
}

/// Parses a BLIF file, lowers it into a circuit, and validates the result.
pub fn read_netlist(
    file: FileId,
    source_db: &SourceDb,
    options: &BlifOptions,
    sink: &DiagnosticSink,
) -> Result<NetlistOutput, NetlistError> {
    let model = parse_netlist(file, source_db, sink)?;
    lower(&model, options, sink)
}
