//! Structural fingerprints of definitions.

use strand_common::{ContentHash, ContentHasher};

use crate::design::Design;
use crate::error::IrError;
use crate::ids::{CircuitId, PortId};

impl Design {
    /// Hashes the structure of a definition: its declared interface, its
    /// instances (names, circuits and parameters) and the resolved value of
    /// every consumer bit. The definition's own name is not included, so two
    /// structurally identical definitions hash equally.
    pub fn structural_hash(&self, circuit: CircuitId) -> Result<ContentHash, IrError> {
        let mut h = ContentHasher::new();
        let c = &self.circuits[circuit];
        h.u64(c.decl.len() as u64);
        for (name, ty) in &c.decl {
            h.str(self.name(*name)).str(&self.types.display(*ty, &self.interner));
        }

        let body = self.body(circuit)?;
        h.u64(body.instances.len() as u64);
        for &inst in &body.instances {
            let inst = &self.instances[inst];
            h.str(self.name(inst.name)).str(self.circuit_name(inst.circuit));
            h.u64(inst.params.len() as u64);
            for (name, value) in &inst.params {
                h.str(self.name(*name)).str(&value.to_string());
            }
        }

        for port in self.consumers(circuit)? {
            self.hash_value(port, &mut h);
        }
        Ok(h.finish())
    }

    fn hash_value(&self, port: PortId, h: &mut ContentHasher) {
        let p = &self.ports[port];
        if p.is_composite() {
            for &e in &p.elements {
                self.hash_value(e, h);
            }
            return;
        }
        h.str(&self.port_name(port));
        match self.value(port) {
            Some(v) => h.str(&self.port_name(v)),
            None => h.str(""),
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::types::Direction;
    use crate::{CircuitId, Design};

    fn buffer(d: &mut Design, name: &str, inv: CircuitId) -> CircuitId {
        let i = d.types.bit(Direction::Input);
        let o = d.types.bit(Direction::Output);
        let top = d.define_circuit(name, &[("I", i), ("O", o)]).unwrap();
        let u = d.place(top, inv, d.ident("u0"), vec![]).unwrap();
        d.wire(d.boundary(top, "I").unwrap(), d.port_of(u, "I").unwrap())
            .unwrap();
        d.wire(d.port_of(u, "O").unwrap(), d.boundary(top, "O").unwrap())
            .unwrap();
        top
    }

    #[test]
    fn identical_structure_hashes_equal() {
        let mut d = Design::new();
        let i = d.types.bit(Direction::Input);
        let o = d.types.bit(Direction::Output);
        let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)]).unwrap();
        let a = buffer(&mut d, "a", inv);
        let b = buffer(&mut d, "b", inv);
        assert_eq!(d.structural_hash(a).unwrap(), d.structural_hash(b).unwrap());
    }

    #[test]
    fn wiring_changes_the_hash() {
        let mut d = Design::new();
        let i = d.types.bit(Direction::Input);
        let o = d.types.bit(Direction::Output);
        let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)]).unwrap();
        let a = buffer(&mut d, "a", inv);
        let b = d.define_circuit("b", &[("I", i), ("O", o)]).unwrap();
        let u = d.place(b, inv, d.ident("u0"), vec![]).unwrap();
        d.wire(d.boundary(b, "I").unwrap(), d.port_of(u, "I").unwrap())
            .unwrap();
        assert_ne!(d.structural_hash(a).unwrap(), d.structural_hash(b).unwrap());
    }
}
