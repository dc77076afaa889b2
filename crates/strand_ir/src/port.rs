//! Bit-level values and the references that identify them.
//!
//! A [`Port`] is one node of the wiring graph. Its [`PortRef`] says who owns
//! it (nobody, an instance, a definition body, or a parent composite), and
//! its optional [`Driver`] is the edge from this consumer to the producer of
//! its value.

use crate::debug::DebugInfo;
use crate::ids::{CircuitId, InstanceId, PortId, TypeId};
use serde::{Deserialize, Serialize};
use strand_common::{Ident, Logic};

/// Identity of a port.
///
/// Equality is structural, so a reference can be used as a lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortRef {
    /// A free-standing value not owned by any circuit.
    Anonymous {
        /// Display name.
        name: Ident,
    },
    /// The named port of a placed instance.
    Instance {
        /// The owning instance.
        instance: InstanceId,
        /// The port name.
        name: Ident,
    },
    /// A boundary port seen from inside a definition body.
    Definition {
        /// The owning definition.
        circuit: CircuitId,
        /// The port name.
        name: Ident,
    },
    /// One element of a composite value.
    Element {
        /// The composite port.
        parent: PortId,
        /// Element position.
        index: u32,
    },
}

/// The driving-value link of a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// The port producing the value.
    pub source: PortId,
    /// Where the wire was made, if known.
    #[serde(skip)]
    pub debug: Option<DebugInfo>,
}

/// A typed node in the wiring graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// The handle of this port.
    pub id: PortId,
    /// The port type.
    pub ty: TypeId,
    /// Who this port belongs to.
    pub reference: PortRef,
    /// The producer of this port's value, once wired.
    ///
    /// Set at most once. On a composite port it is only present when the
    /// whole value was wired from another whole value.
    pub driver: Option<Driver>,
    /// The literal value of a constant bit; constants are never driven.
    pub literal: Option<Logic>,
    /// Element ports of a composite value, empty for single bits.
    pub elements: Vec<PortId>,
    /// `true` if `elements` are pre-existing ports gathered into an anonymous
    /// array rather than children this port owns.
    pub assembled: bool,
}

impl Port {
    /// Returns `true` if the port carries a literal value.
    pub fn is_constant(&self) -> bool {
        self.literal.is_some()
    }

    /// Returns `true` for arrays, bit vectors and tuples.
    pub fn is_composite(&self) -> bool {
        !self.elements.is_empty()
    }

    /// Returns `true` if this composite owns its elements, so it can be
    /// linked as a whole.
    pub fn is_whole(&self) -> bool {
        self.is_composite() && !self.assembled
    }

    /// Returns the direct driving port, if wired.
    pub fn source(&self) -> Option<PortId> {
        self.driver.map(|d| d.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn leaf(reference: PortRef) -> Port {
        Port {
            id: PortId::from_raw(0),
            ty: TypeId::from_raw(0),
            reference,
            driver: None,
            literal: None,
            elements: Vec::new(),
            assembled: false,
        }
    }

    #[test]
    fn references_are_structural_keys() {
        let a = PortRef::Instance {
            instance: InstanceId::from_raw(1),
            name: Ident::from_raw(2),
        };
        let b = PortRef::Instance {
            instance: InstanceId::from_raw(1),
            name: Ident::from_raw(2),
        };
        let c = PortRef::Definition {
            circuit: CircuitId::from_raw(1),
            name: Ident::from_raw(2),
        };
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn single_bit_is_not_composite() {
        let p = leaf(PortRef::Anonymous {
            name: Ident::from_raw(0),
        });
        assert!(!p.is_composite());
        assert!(!p.is_whole());
        assert_eq!(p.source(), None);
    }

    #[test]
    fn assembled_array_is_not_whole() {
        let mut p = leaf(PortRef::Anonymous {
            name: Ident::from_raw(0),
        });
        p.elements = vec![PortId::from_raw(4), PortId::from_raw(5)];
        p.assembled = true;
        assert!(p.is_composite());
        assert!(!p.is_whole());
    }

    #[test]
    fn port_serde_roundtrip_drops_debug_info() {
        let mut p = leaf(PortRef::Element {
            parent: PortId::from_raw(3),
            index: 1,
        });
        p.driver = Some(Driver {
            source: PortId::from_raw(9),
            debug: Some(DebugInfo::caller()),
        });
        let json = serde_json::to_string(&p).unwrap();
        let restored: Port = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.source(), Some(PortId::from_raw(9)));
        assert_eq!(restored.driver.unwrap().debug, None);
        assert_eq!(restored.reference, p.reference);
    }
}
