//! Circuit types and their placements.
//!
//! A [`Circuit`] is either an opaque primitive (a leaf whose behavior lives
//! outside this crate) or a definition with a [`Body`]: placed instances
//! wired to each other and to the body's own boundary ports. An
//! [`Instance`] places a circuit inside a definition.

use serde::{Deserialize, Serialize};
use strand_common::Ident;

use crate::const_value::ConstValue;
use crate::ids::{CircuitId, InstanceId, TypeId};
use crate::interface::Interface;

/// The body of a definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// The boundary as seen from inside: every direction is the flip of the
    /// declared one, so declared inputs are sources here.
    pub interface: Interface,
    /// Placed instances in placement order.
    pub instances: Vec<InstanceId>,
    /// Set by [`Design::end_circuit`](crate::Design::end_circuit); a sealed
    /// body accepts no new instances or wires.
    pub sealed: bool,
}

/// What kind of circuit this is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CircuitKind {
    /// An opaque leaf.
    Primitive {
        /// Attributes consumed by backends (behavior handle, Verilog name, ...).
        attrs: Vec<(Ident, ConstValue)>,
    },
    /// A definition with internal structure.
    Definition(Body),
}

/// A circuit type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Circuit {
    /// The handle of this circuit.
    pub id: CircuitId,
    /// The circuit name.
    pub name: Ident,
    /// The declared interface: names and types with their outside directions.
    pub decl: Vec<(Ident, TypeId)>,
    /// Primitive or definition.
    pub kind: CircuitKind,
}

impl Circuit {
    /// Returns `true` for opaque leaves.
    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, CircuitKind::Primitive { .. })
    }

    /// Returns the body of a definition.
    pub fn body(&self) -> Option<&Body> {
        match &self.kind {
            CircuitKind::Definition(body) => Some(body),
            CircuitKind::Primitive { .. } => None,
        }
    }

    pub(crate) fn body_mut(&mut self) -> Option<&mut Body> {
        match &mut self.kind {
            CircuitKind::Definition(body) => Some(body),
            CircuitKind::Primitive { .. } => None,
        }
    }
}

/// A placement of a circuit inside a definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// The handle of this instance.
    pub id: InstanceId,
    /// The instance name, unique within its parent.
    pub name: Ident,
    /// The circuit being placed.
    pub circuit: CircuitId,
    /// The definition this instance is placed in.
    pub parent: CircuitId,
    /// The circuit's declared interface, with declared directions.
    pub interface: Interface,
    /// Configuration carried by this placement.
    pub params: Vec<(Ident, ConstValue)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit(kind: CircuitKind) -> Circuit {
        Circuit {
            id: CircuitId::from_raw(0),
            name: Ident::from_raw(1),
            decl: Vec::new(),
            kind,
        }
    }

    #[test]
    fn primitive_has_no_body() {
        let c = circuit(CircuitKind::Primitive { attrs: vec![] });
        assert!(c.is_primitive());
        assert!(c.body().is_none());
    }

    #[test]
    fn definition_exposes_body() {
        let mut c = circuit(CircuitKind::Definition(Body {
            interface: Interface::new(),
            instances: vec![InstanceId::from_raw(3)],
            sealed: false,
        }));
        assert!(!c.is_primitive());
        assert_eq!(c.body().unwrap().instances.len(), 1);
        c.body_mut().unwrap().sealed = true;
        assert!(c.body().unwrap().sealed);
    }
}
