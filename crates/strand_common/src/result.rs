//! Internal-consistency error shared by the transform crates.

/// An internal error: an IR invariant was violated.
///
/// These never come from bad user input. If one is raised, a transform met a
/// netlist shape that its own preconditions should have ruled out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("internal error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
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
