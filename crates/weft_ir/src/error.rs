//! Errors raised while building or validating a circuit.

/// A violated circuit invariant. Wire names are resolved for display;
/// anonymous wires show as `%<id>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// A name was declared twice.
    #[error("duplicate wire name `{name}`")]
    DuplicateName {
        /// The clashing name.
        name: String,
    },

    /// Operand count or widths do not fit the operator.
    #[error("width mismatch in `{op}`: {detail}")]
    WidthMismatch {
        /// The operator (or `declare` for declarations).
        op: String,
        /// What did not fit.
        detail: String,
    },

    /// A wire is read (or is an output) but nothing drives it, or an id is unknown.
    #[error("wire `{wire}` is used but never driven")]
    DanglingReference {
        /// The undriven wire.
        wire: String,
    },

    /// The combinational part of the circuit contains a loop.
    #[error("combinational cycle through `{wire}`")]
    CombinationalCycle {
        /// A wire on the cycle.
        wire: String,
    },

    /// A wire has more than one driver.
    #[error("wire `{wire}` has multiple drivers")]
    MultipleDrivers {
        /// The over-driven wire.
        wire: String,
    },

    /// A node drives a wire whose kind does not allow it.
    #[error("{kind} `{wire}` cannot be driven by `{op}`")]
    IllegalDriver {
        /// The driven wire.
        wire: String,
        /// Its kind.
        kind: String,
        /// The offending operator.
        op: String,
    },
}
