//! Recognition of the fixed gate covers emitted by simple technology mapping.

use crate::ast::CoverRow;
use std::collections::BTreeSet;

/// A recognized `.names` cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Constant output.
    Const(bool),
    /// Output follows the single input.
    Buf,
    /// Output is the inverted input.
    Not,
    /// Two-input and.
    And,
    /// Two-input or.
    Or,
    /// Two-input exclusive or.
    Xor,
    /// Inputs `false_case true_case select`.
    Mux,
}

impl Gate {
    /// Number of input nets the gate reads.
    pub fn arity(self) -> usize {
        match self {
            Gate::Const(_) => 0,
            Gate::Buf | Gate::Not => 1,
            Gate::And | Gate::Or | Gate::Xor => 2,
            Gate::Mux => 3,
        }
    }
}

const TABLE: &[(Gate, &[&str])] = &[
    (Gate::Const(false), &[]),
    (Gate::Const(true), &[" 1"]),
    (Gate::Buf, &["1 1"]),
    (Gate::Not, &["0 1"]),
    (Gate::And, &["11 1"]),
    (Gate::Or, &["1- 1", "-1 1"]),
    (Gate::Xor, &["10 1", "01 1"]),
    (Gate::Mux, &["1-0 1", "-11 1"]),
];

/// Matches the rows of a cover with `inputs` input nets against the known
/// gates. Rows are compared as a set, so their order and repetition do not
/// matter. Returns `None` for anything else.
pub fn decode_cover(inputs: usize, rows: &[CoverRow]) -> Option<Gate> {
    let rows: BTreeSet<String> = rows
        .iter()
        .map(|r| format!("{} {}", r.pattern, if r.value { '1' } else { '0' }))
        .collect();
    TABLE
        .iter()
        .find(|(gate, expected)| {
            gate.arity() == inputs
                && expected.len() == rows.len()
                && expected.iter().all(|row| rows.contains(*row))
        })
        .map(|(gate, _)| *gate)
}
