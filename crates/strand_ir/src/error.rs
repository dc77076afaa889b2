//! Errors raised while declaring interfaces, building circuits and wiring.
//!
//! Every variant is a construction-time authoring mistake: the offending call
//! fails and leaves the netlist untouched. Port and circuit names are resolved
//! to strings so the message locates the mistake without the interner.

/// Errors produced by the netlist IR.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IrError {
    /// A declaration entry's type carries no direction.
    #[error("port `{name}` (declaration entry {position}) must have a direction")]
    MissingDirection {
        /// The port name.
        name: String,
        /// Zero-based position in the declaration list.
        position: usize,
    },

    /// Two declaration entries share a name.
    #[error("duplicate port `{name}` in interface")]
    DuplicatePort {
        /// The repeated name.
        name: String,
    },

    /// A port name was looked up that the interface does not declare.
    #[error("`{owner}` has no port named `{name}`")]
    UnknownPort {
        /// The circuit or instance that was searched.
        owner: String,
        /// The missing name.
        name: String,
    },

    /// The source cannot produce a value or the destination cannot consume one.
    #[error("cannot wire `{from}` to `{to}`: {reason}")]
    DirectionError {
        /// The source port.
        from: String,
        /// The destination port.
        to: String,
        /// Which side is wrong and why.
        reason: String,
    },

    /// The destination already has a driving value.
    #[error("`{to}` is already driven by `{existing}`")]
    MultipleDrivers {
        /// The destination port.
        to: String,
        /// The port currently driving it.
        existing: String,
    },

    /// Source and destination have different shapes.
    #[error("type mismatch wiring `{from}` ({from_type}) to `{to}` ({to_type})")]
    TypeMismatch {
        /// The source port.
        from: String,
        /// The source type.
        from_type: String,
        /// The destination port.
        to: String,
        /// The destination type.
        to_type: String,
    },

    /// The definition was ended and is now immutable.
    #[error("circuit `{name}` has been ended and can no longer be modified")]
    DefinitionSealed {
        /// The circuit name.
        name: String,
    },

    /// Source and destination live in different definition bodies.
    #[error("cannot wire `{from}` in `{from_circuit}` to `{to}` in `{to_circuit}`")]
    ScopeViolation {
        /// The source port.
        from: String,
        /// The definition whose body holds the source.
        from_circuit: String,
        /// The destination port.
        to: String,
        /// The definition whose body holds the destination.
        to_circuit: String,
    },

    /// An instance name is already used inside the same definition.
    #[error("`{parent}` already contains an instance named `{name}`")]
    DuplicateInstance {
        /// The parent definition.
        parent: String,
        /// The repeated instance name.
        name: String,
    },

    /// A definition was required but a primitive was given.
    #[error("circuit `{name}` is a primitive, not a definition")]
    NotADefinition {
        /// The circuit name.
        name: String,
    },

    /// An element index is past the end of a composite port.
    #[error("element {index} out of range for `{port}` ({len} elements)")]
    IndexOutOfRange {
        /// The composite port.
        port: String,
        /// The requested index.
        index: u32,
        /// The element count.
        len: u32,
    },

    /// An array was assembled from an empty list of ports.
    #[error("cannot assemble an array from no ports")]
    EmptyArray,

    /// The wrong number of arguments was applied to a circuit.
    #[error("`{circuit}` takes {expected} inputs but {found} were given")]
    ArityMismatch {
        /// The applied circuit.
        circuit: String,
        /// Number of functional inputs.
        expected: usize,
        /// Number of arguments given.
        found: usize,
    },

    /// Some consumers of a definition have no resolved driving value.
    #[error("circuit `{circuit}` has unwired ports: {}", ports.join(", "))]
    Unwired {
        /// The definition that was checked.
        circuit: String,
        /// Every unwired port.
        ports: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_direction_display() {
        let e = IrError::MissingDirection {
            name: "I".into(),
            position: 0,
        };
        assert_eq!(
            e.to_string(),
            "port `I` (declaration entry 0) must have a direction"
        );
    }

    #[test]
    fn multiple_drivers_display() {
        let e = IrError::MultipleDrivers {
            to: "and0.I0".into(),
            existing: "I".into(),
        };
        assert_eq!(e.to_string(), "`and0.I0` is already driven by `I`");
    }

    #[test]
    fn unwired_lists_ports() {
        let e = IrError::Unwired {
            circuit: "main".into(),
            ports: vec!["O".into(), "and0.I1".into()],
        };
        assert_eq!(e.to_string(), "circuit `main` has unwired ports: O, and0.I1");
    }
}
