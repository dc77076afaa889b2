//! Error types for braid combinators.

use strand_ir::IrError;

/// Errors raised while combining circuits.
///
/// Every combinator validates its whole plan first, so an error means no
/// wire was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BraidError {
    /// No circuits were supplied.
    #[error("cannot braid an empty list of circuits")]
    Empty,

    /// A circuit's interface differs from the first circuit's.
    #[error("circuit {index} does not match the first circuit's interface: {reason}")]
    InterfaceShapeMismatch {
        /// Position of the offending circuit in the list.
        index: usize,
        /// What differs.
        reason: String,
    },

    /// A port name was placed in more than one bucket.
    #[error("port `{name}` is classified both as {first} and as {second}")]
    AmbiguousClassification {
        /// The port name.
        name: String,
        /// The first bucket it was found in.
        first: &'static str,
        /// The conflicting bucket.
        second: &'static str,
    },

    /// A named port does not exist on the circuits.
    #[error("no port named `{name}`")]
    UnknownPort {
        /// The missing name.
        name: String,
    },

    /// A port that must be an array is not one.
    #[error("port `{name}` is not an array")]
    NotAnArray {
        /// The port name.
        name: String,
    },

    /// A wiring or interface error from the IR.
    #[error(transparent)]
    Ir(#[from] IrError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_display_names_both_buckets() {
        let e = BraidError::AmbiguousClassification {
            name: "I".into(),
            first: "fork",
            second: "fold",
        };
        assert_eq!(e.to_string(), "port `I` is classified both as fork and as fold");
    }

    #[test]
    fn ir_errors_are_transparent() {
        let e: BraidError = IrError::EmptyArray.into();
        assert_eq!(e.to_string(), IrError::EmptyArray.to_string());
    }
}
