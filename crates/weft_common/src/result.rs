//! Internal error type for broken invariants.

/// Result alias for operations that can only fail because of a bug.
pub type WeftResult<T> = Result<T, InternalError>;

/// An internal error: an invariant the toolchain itself should have upheld
/// was violated. User mistakes in a netlist are never reported this way.
#[derive(Debug, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the violated invariant.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
