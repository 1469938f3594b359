//! Wires: the signals a circuit is built from.

use crate::ids::WireId;
use serde::{Deserialize, Serialize};
use std::fmt;
use weft_common::Ident;

/// What role a wire plays in the circuit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum WireKind {
    /// Primary input, never driven by a node.
    Input,
    /// Primary output, driven by exactly one node.
    Output,
    /// State element, driven only by a `Register` node.
    Register,
    /// Constant with the given value, never driven by a node.
    Const(u64),
    /// Plain internal net.
    Internal,
}

impl WireKind {
    /// Returns `true` for kinds a node may not drive.
    pub fn is_source(self) -> bool {
        matches!(self, WireKind::Input | WireKind::Const(_))
    }

    /// Short name used in messages.
    pub fn describe(self) -> &'static str {
        match self {
            WireKind::Input => "input",
            WireKind::Output => "output",
            WireKind::Register => "register",
            WireKind::Const(_) => "constant",
            WireKind::Internal => "wire",
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A named or anonymous signal of fixed width.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wire {
    /// This wire's id.
    pub id: WireId,
    /// User-visible name, `None` for anonymous wires.
    pub name: Option<Ident>,
    /// Bit width, always at least 1.
    pub width: u32,
    /// Role of the wire.
    pub kind: WireKind,
    /// Created by a forward reference and not yet explicitly declared.
    pub implicit: bool,
}

impl Wire {
    /// Returns `true` if the wire has no user-visible name.
    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }
}
