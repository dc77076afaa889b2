//! Error types for hierarchy transforms.

use strand_common::InternalError;
use strand_ir::IrError;

/// Errors that can occur while flattening or walking a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlattenError {
    /// The circuit to transform is a primitive.
    #[error("cannot flatten primitive `{name}`")]
    NotADefinition {
        /// The circuit name.
        name: String,
    },

    /// A definition instantiates itself, directly or through other definitions.
    #[error("definition `{circuit}` instantiates itself")]
    RecursiveHierarchy {
        /// A definition on the cycle.
        circuit: String,
    },

    /// A traced value ended somewhere a well-formed hierarchy cannot reach.
    #[error("malformed hierarchy: {0}")]
    MalformedHierarchy(#[from] InternalError),

    /// An IR operation on the transformed netlist failed.
    #[error(transparent)]
    Ir(#[from] IrError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_recursive() {
        let err = FlattenError::RecursiveHierarchy {
            circuit: "loop".into(),
        };
        assert_eq!(err.to_string(), "definition `loop` instantiates itself");
    }

    #[test]
    fn display_malformed_wraps_internal() {
        let err: FlattenError = InternalError::new("bit `x` has no terminal").into();
        assert_eq!(
            err.to_string(),
            "malformed hierarchy: internal error: bit `x` has no terminal"
        );
    }
}
