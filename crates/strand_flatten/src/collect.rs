//! Walks a hierarchy collecting leaves and boundary crossings.
//!
//! Every port of a non-leaf instance meets the matching boundary port of the
//! definition it places. Each meeting is one entry in the boundary map, keyed
//! by the consumer side's producer so a backward walk can hop across it:
//!
//! * instance input: `inner boundary @ inner scope -> outer port @ outer scope`
//! * instance output: `outer port @ outer scope -> inner boundary @ inner scope`
//!
//! Composite ports add an entry for the whole value and for every element.

use std::collections::HashMap;

use strand_ir::{
    CircuitId, Design, Direction, QualifiedBit, QualifiedInstance, ScopeId, ScopeTable,
};

use crate::error::FlattenError;

/// Leaves and boundary crossings of a hierarchy.
#[derive(Debug, Default)]
pub struct Collected {
    /// Every primitive instance, in depth-first placement order.
    pub leaves: Vec<QualifiedInstance>,
    /// Boundary crossings, keyed by the qualified producer to hop from.
    pub boundary: HashMap<QualifiedBit, QualifiedBit>,
}

/// Collects the leaves and boundary map of `circuit` seen from `scope`.
pub fn collect(
    design: &Design,
    scopes: &mut ScopeTable,
    circuit: CircuitId,
    scope: ScopeId,
    out: &mut Collected,
) -> Result<(), FlattenError> {
    for &inst in &design.body(circuit)?.instances {
        let instance = design.instance(inst);
        if design.is_primitive(instance.circuit) {
            out.leaves.push(QualifiedInstance {
                instance: inst,
                scope,
            });
            continue;
        }

        let inner_scope = scopes.child(scope, inst);
        let inner_body = design.body(instance.circuit)?;
        for (name, entry) in instance.interface.iter() {
            let Some(inner) = inner_body.interface.port(name) else {
                continue;
            };
            let outer = QualifiedBit::new(entry.port, scope);
            let inner = QualifiedBit::new(inner, inner_scope);
            map_crossing(design, outer, inner, entry.direction, &mut out.boundary);
        }
        collect(design, scopes, instance.circuit, inner_scope, out)?;
    }
    Ok(())
}

fn map_crossing(
    design: &Design,
    outer: QualifiedBit,
    inner: QualifiedBit,
    direction: Direction,
    map: &mut HashMap<QualifiedBit, QualifiedBit>,
) {
    if direction == Direction::Input {
        map.insert(inner, outer);
    } else {
        map.insert(outer, inner);
    }
    let outer_elements = &design.port(outer.port).elements;
    let inner_elements = &design.port(inner.port).elements;
    for (&o, &i) in outer_elements.iter().zip(inner_elements) {
        let o = QualifiedBit::new(o, outer.scope);
        let i = QualifiedBit::new(i, inner.scope);
        map_crossing(design, o, i, design.direction(o.port), map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossings_point_backward() {
        let mut d = Design::new();
        let i = d.types.bit(Direction::Input);
        let o = d.types.bit(Direction::Output);
        let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)]).unwrap();
        let sub = d.define_circuit("sub", &[("A", i), ("Y", o)]).unwrap();
        d.instantiate(sub, inv, &[]).unwrap();
        let top = d.define_circuit("top", &[]).unwrap();
        let s = d.instantiate(top, sub, &[]).unwrap();

        let mut scopes = ScopeTable::new();
        let mut out = Collected::default();
        collect(&d, &mut scopes, top, ScopeId::ROOT, &mut out).unwrap();

        let inner_scope = scopes.child(ScopeId::ROOT, s);
        assert_eq!(out.leaves.len(), 1);
        assert_eq!(out.leaves[0].scope, inner_scope);

        let a_outer = QualifiedBit::new(d.port_of(s, "A").unwrap(), ScopeId::ROOT);
        let a_inner = QualifiedBit::new(d.boundary(sub, "A").unwrap(), inner_scope);
        assert_eq!(out.boundary.get(&a_inner), Some(&a_outer));

        let y_outer = QualifiedBit::new(d.port_of(s, "Y").unwrap(), ScopeId::ROOT);
        let y_inner = QualifiedBit::new(d.boundary(sub, "Y").unwrap(), inner_scope);
        assert_eq!(out.boundary.get(&y_outer), Some(&y_inner));
    }

    #[test]
    fn array_crossings_are_mapped_per_element() {
        let mut d = Design::new();
        let arr = d.types.array(d.types.bit(Direction::Input), 2);
        let sub = d.define_circuit("sub", &[("A", arr)]).unwrap();
        let top = d.define_circuit("top", &[]).unwrap();
        let s = d.instantiate(top, sub, &[]).unwrap();

        let mut scopes = ScopeTable::new();
        let mut out = Collected::default();
        collect(&d, &mut scopes, top, ScopeId::ROOT, &mut out).unwrap();
        assert_eq!(out.boundary.len(), 3);

        let inner_scope = scopes.child(ScopeId::ROOT, s);
        let e1 = d.element(d.boundary(sub, "A").unwrap(), 1).unwrap();
        let o1 = d.element(d.port_of(s, "A").unwrap(), 1).unwrap();
        assert_eq!(
            out.boundary.get(&QualifiedBit::new(e1, inner_scope)),
            Some(&QualifiedBit::new(o1, ScopeId::ROOT))
        );
    }
}
