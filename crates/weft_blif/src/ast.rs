//! Syntax tree for a single BLIF model.

use serde::{Deserialize, Serialize};
use std::fmt;
use weft_source::Span;

/// A reference to a net by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    /// The net name as written.
    pub name: String,
    /// Where the name appears.
    pub span: Span,
}

/// A parsed `.model ... .end` block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlifModel {
    /// The model name.
    pub name: Net,
    /// Names listed after `.inputs`, in order.
    pub inputs: Vec<Net>,
    /// Names listed after `.outputs`, in order.
    pub outputs: Vec<Net>,
    /// Body commands in source order.
    pub commands: Vec<Command>,
    /// From `.model` through `.end`.
    pub span: Span,
}

/// One body command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// `.names`: a single-output cover.
    Names(NamesDef),
    /// `.subckt` instantiating a flip-flop cell.
    Subckt(SubcktDef),
    /// `.latch` with a rising-edge clock.
    Latch(LatchDef),
}

impl Command {
    /// Span of the whole command.
    pub fn span(&self) -> Span {
        match self {
            Command::Names(def) => def.span,
            Command::Subckt(def) => def.span,
            Command::Latch(def) => def.span,
        }
    }
}

/// `.names <in>* <out>` followed by cover rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamesDef {
    /// Input nets followed by the output net; never empty.
    pub signals: Vec<Net>,
    /// The cover rows.
    pub rows: Vec<CoverRow>,
    /// Whole command.
    pub span: Span,
}

impl NamesDef {
    /// The driven net (the last signal).
    pub fn output(&self) -> &Net {
        &self.signals[self.signals.len() - 1]
    }

    /// The operand nets (all but the last signal).
    pub fn inputs(&self) -> &[Net] {
        &self.signals[..self.signals.len() - 1]
    }
}

/// One cover row: an input pattern over `0`, `1`, `-` and an output value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverRow {
    /// The input pattern; empty for a cover without inputs.
    pub pattern: String,
    /// The output value.
    pub value: bool,
    /// The row's text.
    pub span: Span,
}

impl fmt::Display for CoverRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.value { '1' } else { '0' };
        if self.pattern.is_empty() {
            write!(f, "{value}")
        } else {
            write!(f, "{} {value}", self.pattern)
        }
    }
}

/// Flip-flop cells accepted by `.subckt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DffCell {
    /// `$_DFF_PN0_`: active-low reset to 0.
    Pn0,
    /// `$_DFF_PP0_`: active-high reset to 0.
    Pp0,
    /// `$_DFF_PN1_`: active-low reset to 1.
    Pn1,
    /// `$_DFF_PP1_`: active-high reset to 1.
    Pp1,
    /// `$_DFF_P_`: no reset.
    P,
}

impl DffCell {
    /// Looks up a cell by its library name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "$_DFF_PN0_" => Some(DffCell::Pn0),
            "$_DFF_PP0_" => Some(DffCell::Pp0),
            "$_DFF_PN1_" => Some(DffCell::Pn1),
            "$_DFF_PP1_" => Some(DffCell::Pp1),
            "$_DFF_P_" => Some(DffCell::P),
            _ => None,
        }
    }

    /// The library name.
    pub fn name(self) -> &'static str {
        match self {
            DffCell::Pn0 => "$_DFF_PN0_",
            DffCell::Pp0 => "$_DFF_PP0_",
            DffCell::Pn1 => "$_DFF_PN1_",
            DffCell::Pp1 => "$_DFF_PP1_",
            DffCell::P => "$_DFF_P_",
        }
    }

    /// Formal pin names the cell requires, in canonical order.
    pub fn formals(self) -> &'static [&'static str] {
        match self {
            DffCell::P => &["C", "D", "Q"],
            _ => &["C", "R", "D", "Q"],
        }
    }
}

/// `.subckt <cell> C=.. [R=..] D=.. Q=..`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcktDef {
    /// The flip-flop cell.
    pub cell: DffCell,
    /// Clock net.
    pub clock: Net,
    /// Reset net, for cells that have one.
    pub reset: Option<Net>,
    /// Data input.
    pub d: Net,
    /// Data output.
    pub q: Net,
    /// Whole command.
    pub span: Span,
}

/// `.latch <d> <q> re <clock> [<init>]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatchDef {
    /// Data input.
    pub d: Net,
    /// Data output.
    pub q: Net,
    /// Rising-edge clock net.
    pub clock: Net,
    /// Initial value code `0..=3`, if given.
    pub init: Option<u8>,
    /// Whole command.
    pub span: Span,
}
