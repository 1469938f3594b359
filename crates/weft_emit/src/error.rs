//! Emission errors.

use weft_common::InternalError;

/// Why an emitter could not produce output.
#[derive(Debug, thiserror::Error)]
pub enum EmitError {
    /// The circuit uses an operation the backend cannot express.
    #[error("`{op}` cannot be emitted by the {backend} backend")]
    UnsupportedOperation {
        /// The operation label.
        op: String,
        /// The backend name.
        backend: &'static str,
    },

    /// A generated port name collides with a wire of the circuit.
    #[error("port `{name}` clashes with a wire of the same name")]
    PortNameClash {
        /// The clashing name.
        name: String,
    },

    /// The circuit broke an invariant the emitter relies on.
    #[error(transparent)]
    Internal(#[from] InternalError),

    /// Writing the output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}
