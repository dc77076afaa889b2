//! Wiring: linking consumers to the producers of their values.
//!
//! A wire is validated completely before any link is written. Composite
//! values are linked element by element down to single bits; when both sides
//! own their elements the composite itself is linked too, so a whole array
//! can later be resolved in one step.

use std::collections::HashMap;

use crate::debug::DebugInfo;
use crate::design::Design;
use crate::error::IrError;
use crate::ids::PortId;
use crate::port::{Driver, PortRef};

/// Stands in for the source name when checking a destination alone.
const FRESH_NET: &str = "<fresh net>";

impl Design {
    /// Wires `source` into `destination`, recording the caller's location.
    #[track_caller]
    pub fn wire(&mut self, source: PortId, destination: PortId) -> Result<(), IrError> {
        let debug = DebugInfo::caller();
        self.wire_with(source, destination, Some(debug))
    }

    /// Wires `source` into `destination` with explicit debug information.
    pub fn wire_with(
        &mut self,
        source: PortId,
        destination: PortId,
        debug: Option<DebugInfo>,
    ) -> Result<(), IrError> {
        let links = self.plan_wire(source, destination)?;
        tracing::trace!(
            from = %self.port_name(source),
            to = %self.port_name(destination),
            links = links.len(),
            "wire"
        );
        for (from, to) in links {
            self.ports[to].driver = Some(Driver {
                source: from,
                debug,
            });
        }
        Ok(())
    }

    /// Validates a wire without making it.
    pub fn check_wire(&self, source: PortId, destination: PortId) -> Result<(), IrError> {
        self.plan_wire(source, destination).map(|_| ())
    }

    /// Validates that `destination` could take a fresh anonymous driver.
    pub fn check_drivable(&self, destination: PortId) -> Result<(), IrError> {
        if let Some(owner) = self.owner(destination) {
            if self.body(owner)?.sealed {
                return Err(IrError::DefinitionSealed {
                    name: self.circuit_name(owner).to_string(),
                });
            }
        }
        let p = &self.ports[destination];
        if p.is_composite() {
            for &e in &p.elements {
                self.check_drivable(e)?;
            }
            return Ok(());
        }
        self.check_sink(FRESH_NET, destination)
    }

    /// Returns the direct driving port of `port`.
    pub fn driver(&self, port: PortId) -> Option<PortId> {
        self.ports[port].source()
    }

    /// Returns the value seen at `port`.
    ///
    /// Follows driving links through anonymous nets until reaching a port
    /// that is not a net or a net nobody drives. A composite wired element by
    /// element from consecutive elements of one owned value resolves to that
    /// value.
    pub fn value(&self, port: PortId) -> Option<PortId> {
        let mut cur = match self.driver(port) {
            Some(src) => src,
            None => return self.gathered_value(port),
        };
        while self.is_net(cur) {
            match self.driver(cur) {
                Some(next) => cur = next,
                None => break,
            }
        }
        Some(cur)
    }

    /// Returns `true` if `port`, or every one of its elements, has a driver.
    pub fn is_driven(&self, port: PortId) -> bool {
        let p = &self.ports[port];
        p.driver.is_some()
            || (p.is_composite() && p.elements.iter().all(|e| self.is_driven(*e)))
    }

    fn gathered_value(&self, port: PortId) -> Option<PortId> {
        let elements = &self.ports[port].elements;
        let values: Vec<PortId> = elements
            .iter()
            .map(|e| self.value(*e))
            .collect::<Option<_>>()?;
        let first = *values.first()?;
        let PortRef::Element { parent, index: 0 } = self.ports[first].reference else {
            return None;
        };
        let whole = &self.ports[parent];
        if whole.assembled || whole.elements != values {
            return None;
        }
        Some(parent)
    }

    /// Validates a wire and returns every `(source, destination)` link it
    /// would write.
    fn plan_wire(&self, source: PortId, destination: PortId) -> Result<Vec<(PortId, PortId)>, IrError> {
        let (src_ty, dst_ty) = (self.ports[source].ty, self.ports[destination].ty);
        if !self.types.same_shape(src_ty, dst_ty) {
            return Err(IrError::TypeMismatch {
                from: self.port_name(source),
                from_type: self.types.display(src_ty, &self.interner),
                to: self.port_name(destination),
                to_type: self.types.display(dst_ty, &self.interner),
            });
        }
        for end in [source, destination] {
            if let Some(owner) = self.owner(end) {
                if self.body(owner)?.sealed {
                    return Err(IrError::DefinitionSealed {
                        name: self.circuit_name(owner).to_string(),
                    });
                }
            }
        }
        self.check_scope(source, destination)?;
        if source == destination {
            let from = self.port_name(source);
            return Err(self.direction_error(&from, destination, "cannot wire a port to itself"));
        }

        let mut links = Vec::new();
        self.plan_links(source, destination, &mut links)?;

        let mut seen: HashMap<PortId, PortId> = HashMap::new();
        for &(from, to) in &links {
            if self.ports[to].is_composite() {
                continue;
            }
            if let Some(existing) = seen.insert(to, from) {
                return Err(IrError::MultipleDrivers {
                    to: self.port_name(to),
                    existing: self.port_name(existing),
                });
            }
        }
        Ok(links)
    }

    fn plan_links(
        &self,
        source: PortId,
        destination: PortId,
        links: &mut Vec<(PortId, PortId)>,
    ) -> Result<(), IrError> {
        let (src, dst) = (&self.ports[source], &self.ports[destination]);
        if !dst.is_composite() {
            self.check_leaf(source, destination)?;
            links.push((source, destination));
            return Ok(());
        }
        if src.is_whole() && dst.is_whole() {
            links.push((source, destination));
        }
        for (&s, &d) in src.elements.iter().zip(&dst.elements) {
            self.plan_links(s, d, links)?;
        }
        Ok(())
    }

    fn check_leaf(&self, source: PortId, destination: PortId) -> Result<(), IrError> {
        let from = self.port_name(source);
        if source == destination {
            return Err(self.direction_error(&from, destination, "cannot wire a port to itself"));
        }
        self.check_scope(source, destination)?;
        let src_ok = self.ports[source].is_constant()
            || self.is_net(source)
            || self.direction(source).is_producer();
        if !src_ok {
            let reason = format!("source is {:?}", self.direction(source));
            return Err(self.direction_error(&from, destination, &reason));
        }
        if self.is_net(destination) && self.net_chain_reaches(source, destination) {
            return Err(self.direction_error(&from, destination, "would close a loop of nets"));
        }
        self.check_sink(&from, destination)
    }

    /// Both ends must belong to the same definition body. Constants and nets
    /// belong to none and may meet any port.
    fn check_scope(&self, source: PortId, destination: PortId) -> Result<(), IrError> {
        match (self.owner(source), self.owner(destination)) {
            (Some(a), Some(b)) if a != b => Err(IrError::ScopeViolation {
                from: self.port_name(source),
                from_circuit: self.circuit_name(a).to_string(),
                to: self.port_name(destination),
                to_circuit: self.circuit_name(b).to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Returns `true` if following driving links back from `start` through
    /// nets reaches `target`.
    fn net_chain_reaches(&self, start: PortId, target: PortId) -> bool {
        let mut cur = start;
        while self.is_net(cur) {
            if cur == target {
                return true;
            }
            match self.driver(cur) {
                Some(next) => cur = next,
                None => break,
            }
        }
        false
    }

    fn check_sink(&self, from: &str, destination: PortId) -> Result<(), IrError> {
        let dst = &self.ports[destination];
        if dst.is_constant() {
            return Err(self.direction_error(from, destination, "a constant cannot be driven"));
        }
        if !self.is_net(destination) && !self.direction(destination).is_consumer() {
            let reason = format!("destination is {:?}", self.direction(destination));
            return Err(self.direction_error(from, destination, &reason));
        }
        if let Some(existing) = dst.source() {
            return Err(IrError::MultipleDrivers {
                to: self.port_name(destination),
                existing: self.port_name(existing),
            });
        }
        Ok(())
    }

    fn direction_error(&self, from: &str, destination: PortId, reason: &str) -> IrError {
        IrError::DirectionError {
            from: from.to_string(),
            to: self.port_name(destination),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use strand_common::Logic;

    use crate::ids::{CircuitId, InstanceId};
    use crate::types::Direction;
    use crate::{Design, IrError};

    struct Fixture {
        d: Design,
        top: CircuitId,
        a: InstanceId,
        b: InstanceId,
    }

    fn fixture() -> Fixture {
        let mut d = Design::new();
        let i = d.types.bit(Direction::Input);
        let o = d.types.bit(Direction::Output);
        let and = d
            .declare_primitive("And2", &[("I0", i), ("I1", i), ("O", o)])
            .unwrap();
        let top = d.define_circuit("top", &[("I", i), ("O", o)]).unwrap();
        let a = d.instantiate(top, and, &[]).unwrap();
        let b = d.instantiate(top, and, &[]).unwrap();
        Fixture { d, top, a, b }
    }

    #[test]
    fn wire_sets_driver_and_location() {
        let mut f = fixture();
        let src = f.d.boundary(f.top, "I").unwrap();
        let dst = f.d.port_of(f.a, "I0").unwrap();
        f.d.wire(src, dst).unwrap();
        assert_eq!(f.d.driver(dst), Some(src));
        let debug = f.d.port(dst).driver.unwrap().debug.unwrap();
        assert!(debug.file.ends_with("wire.rs"));
    }

    #[test]
    fn second_driver_is_rejected() {
        let mut f = fixture();
        let src = f.d.boundary(f.top, "I").unwrap();
        let other = f.d.port_of(f.b, "O").unwrap();
        let dst = f.d.port_of(f.a, "I0").unwrap();
        f.d.wire(src, dst).unwrap();
        let err = f.d.wire(other, dst).unwrap_err();
        assert_eq!(
            err,
            IrError::MultipleDrivers {
                to: "And2_inst0.I0".into(),
                existing: "I".into()
            }
        );
        assert_eq!(f.d.driver(dst), Some(src));
    }

    #[test]
    fn output_cannot_be_destination() {
        let mut f = fixture();
        let src = f.d.boundary(f.top, "I").unwrap();
        let dst = f.d.port_of(f.a, "O").unwrap();
        assert!(matches!(
            f.d.wire(src, dst),
            Err(IrError::DirectionError { .. })
        ));
    }

    #[test]
    fn input_cannot_be_source() {
        let mut f = fixture();
        let src = f.d.port_of(f.a, "I0").unwrap();
        let dst = f.d.port_of(f.b, "I0").unwrap();
        assert!(matches!(
            f.d.wire(src, dst),
            Err(IrError::DirectionError { .. })
        ));
    }

    #[test]
    fn constant_drives_but_is_never_driven() {
        let mut f = fixture();
        let one = f.d.constant(Logic::One);
        let dst = f.d.port_of(f.a, "I1").unwrap();
        f.d.wire(one, dst).unwrap();
        assert_eq!(f.d.value(dst), Some(one));
        let src = f.d.port_of(f.b, "O").unwrap();
        assert!(matches!(
            f.d.wire(src, one),
            Err(IrError::DirectionError { .. })
        ));
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let mut f = fixture();
        let four = f.d.constant_bits(4, 3);
        let dst = f.d.port_of(f.a, "I0").unwrap();
        let err = f.d.wire(four, dst).unwrap_err();
        assert!(matches!(err, IrError::TypeMismatch { .. }));
    }

    #[test]
    fn sealed_definition_rejects_wires() {
        let mut f = fixture();
        let src = f.d.boundary(f.top, "I").unwrap();
        let dst = f.d.port_of(f.a, "I0").unwrap();
        f.d.end_circuit(f.top).unwrap();
        assert_eq!(
            f.d.wire(src, dst),
            Err(IrError::DefinitionSealed { name: "top".into() })
        );
    }

    #[test]
    fn nets_pass_values_through() {
        let mut f = fixture();
        let net = f.d.anonymous("n", f.d.types.bit(Direction::Input));
        let src = f.d.port_of(f.a, "O").unwrap();
        let dst = f.d.port_of(f.b, "I0").unwrap();
        f.d.wire(net, dst).unwrap();
        f.d.wire(src, net).unwrap();
        assert_eq!(f.d.driver(dst), Some(net));
        assert_eq!(f.d.value(dst), Some(src));
    }

    #[test]
    fn loop_of_nets_is_rejected() {
        let mut f = fixture();
        let ty = f.d.types.bit(Direction::Input);
        let a = f.d.anonymous("a", ty);
        let b = f.d.anonymous("b", ty);
        f.d.wire(a, b).unwrap();
        assert!(matches!(
            f.d.wire(b, a),
            Err(IrError::DirectionError { .. })
        ));
        assert_eq!(f.d.driver(a), None);
    }

    #[test]
    fn wires_stay_inside_one_definition() {
        let mut f = fixture();
        let i = f.d.types.bit(Direction::Input);
        let o = f.d.types.bit(Direction::Output);
        let other = f.d.define_circuit("other", &[("I", i), ("O", o)]).unwrap();
        let src = f.d.boundary(other, "I").unwrap();
        let dst = f.d.port_of(f.a, "I0").unwrap();
        assert_eq!(
            f.d.wire(src, dst),
            Err(IrError::ScopeViolation {
                from: "I".into(),
                from_circuit: "other".into(),
                to: "And2_inst0.I0".into(),
                to_circuit: "top".into(),
            })
        );
        assert_eq!(f.d.driver(dst), None);

        // Constants and nets belong to no body.
        let one = f.d.constant(Logic::One);
        f.d.wire(one, dst).unwrap();
        let net = f.d.anonymous("n", i);
        f.d.wire(src, net).unwrap();
        f.d.wire(net, f.d.port_of(f.b, "I0").unwrap()).unwrap();
    }

    #[test]
    fn nested_instance_ports_are_out_of_reach() {
        let mut d = Design::new();
        let i = d.types.bit(Direction::Input);
        let o = d.types.bit(Direction::Output);
        let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)]).unwrap();
        let sub = d.define_circuit("sub", &[("I", i), ("O", o)]).unwrap();
        let u = d.instantiate(sub, inv, &[]).unwrap();
        let top = d.define_circuit("top", &[("I", i), ("O", o)]).unwrap();
        d.instantiate(top, sub, &[]).unwrap();

        let src = d.boundary(top, "I").unwrap();
        let dst = d.port_of(u, "I").unwrap();
        assert!(matches!(
            d.check_wire(src, dst),
            Err(IrError::ScopeViolation { .. })
        ));
        assert!(matches!(
            d.wire(src, dst),
            Err(IrError::ScopeViolation { .. })
        ));
        assert!(!d.is_driven(dst));
    }

    #[test]
    fn assembled_arrays_are_checked_per_element() {
        let mut f = fixture();
        let i = f.d.types.bit(Direction::Input);
        let other = f.d.define_circuit("other", &[("I", i)]).unwrap();
        let outside = f.d.boundary(other, "I").unwrap();
        let inside = f.d.boundary(f.top, "I").unwrap();
        let mixed = f.d.array(&[inside, outside]).unwrap();
        let arr = f.d.types.array(i, 2);
        let net = f.d.anonymous("n", arr);
        let (i0, i1) = (f.d.port_of(f.a, "I0").unwrap(), f.d.port_of(f.a, "I1").unwrap());
        let dst = f.d.array(&[i0, i1]).unwrap();
        f.d.wire(mixed, net).unwrap();
        let err = f.d.wire(mixed, dst).unwrap_err();
        assert!(matches!(err, IrError::ScopeViolation { .. }));
        assert_eq!(f.d.driver(i0), None);
    }

    #[test]
    fn inout_ports_drive_and_are_driven() {
        let mut f = fixture();
        let io = f.d.types.bit(Direction::InOut);
        let pad = f.d.declare_primitive("Pad", &[("IO", io)]).unwrap();
        let p = f.d.instantiate(f.top, pad, &[]).unwrap();
        let pad_io = f.d.port_of(p, "IO").unwrap();

        let i0 = f.d.port_of(f.a, "I0").unwrap();
        f.d.wire(pad_io, i0).unwrap();
        assert_eq!(f.d.driver(i0), Some(pad_io));

        let a_out = f.d.port_of(f.a, "O").unwrap();
        f.d.wire(a_out, pad_io).unwrap();
        assert_eq!(f.d.driver(pad_io), Some(a_out));

        let b_out = f.d.port_of(f.b, "O").unwrap();
        assert_eq!(
            f.d.wire(b_out, pad_io),
            Err(IrError::MultipleDrivers {
                to: "Pad_inst2.IO".into(),
                existing: "And2_inst0.O".into(),
            })
        );
    }

    #[test]
    fn failed_array_wire_leaves_no_partial_links() {
        let mut d = Design::new();
        let arr_in = d.types.array(d.types.bit(Direction::Input), 2);
        let arr_out = d.types.array(d.types.bit(Direction::Output), 2);
        let reg = d.declare_primitive("Reg2", &[("I", arr_in), ("O", arr_out)]).unwrap();
        let top = d.define_circuit("top", &[]).unwrap();
        let r = d.instantiate(top, reg, &[]).unwrap();
        let i = d.port_of(r, "I").unwrap();
        let one = d.constant(Logic::One);
        d.wire(one, d.element(i, 1).unwrap()).unwrap();

        let c = d.constant_bits(2, 0);
        let err = d.wire(c, i).unwrap_err();
        assert!(matches!(err, IrError::MultipleDrivers { .. }));
        assert_eq!(d.driver(d.element(i, 0).unwrap()), None);
        assert_eq!(d.driver(i), None);
    }

    #[test]
    fn whole_arrays_are_linked_whole_and_per_element() {
        let mut d = Design::new();
        let arr_in = d.types.array(d.types.bit(Direction::Input), 2);
        let arr_out = d.types.array(d.types.bit(Direction::Output), 2);
        let reg = d.declare_primitive("Reg2", &[("I", arr_in), ("O", arr_out)]).unwrap();
        let top = d.define_circuit("top", &[]).unwrap();
        let r0 = d.instantiate(top, reg, &[]).unwrap();
        let r1 = d.instantiate(top, reg, &[]).unwrap();
        let o = d.port_of(r0, "O").unwrap();
        let i = d.port_of(r1, "I").unwrap();
        d.wire(o, i).unwrap();
        assert_eq!(d.driver(i), Some(o));
        assert_eq!(d.driver(d.element(i, 1).unwrap()), Some(d.element(o, 1).unwrap()));
        assert!(d.is_driven(i));
    }

    #[test]
    fn element_wise_drive_resolves_to_whole() {
        let mut d = Design::new();
        let arr_in = d.types.array(d.types.bit(Direction::Input), 2);
        let arr_out = d.types.array(d.types.bit(Direction::Output), 2);
        let reg = d.declare_primitive("Reg2", &[("I", arr_in), ("O", arr_out)]).unwrap();
        let top = d.define_circuit("top", &[]).unwrap();
        let r0 = d.instantiate(top, reg, &[]).unwrap();
        let r1 = d.instantiate(top, reg, &[]).unwrap();
        let o = d.port_of(r0, "O").unwrap();
        let i = d.port_of(r1, "I").unwrap();
        for k in 0..2 {
            d.wire(d.element(o, k).unwrap(), d.element(i, k).unwrap()).unwrap();
        }
        assert_eq!(d.driver(i), None);
        assert_eq!(d.value(i), Some(o));
    }

    #[test]
    fn drivable_checks_every_leaf() {
        let mut f = fixture();
        let i0 = f.d.port_of(f.a, "I0").unwrap();
        let o = f.d.port_of(f.a, "O").unwrap();
        f.d.check_drivable(i0).unwrap();
        assert!(matches!(
            f.d.check_drivable(o),
            Err(IrError::DirectionError { .. })
        ));
        let src = f.d.boundary(f.top, "I").unwrap();
        f.d.wire(src, i0).unwrap();
        assert!(matches!(
            f.d.check_drivable(i0),
            Err(IrError::MultipleDrivers { .. })
        ));
    }

    #[test]
    fn repeated_leaf_in_assembled_destination_is_rejected() {
        let mut f = fixture();
        let i0 = f.d.port_of(f.a, "I0").unwrap();
        let twice = f.d.array(&[i0, i0]).unwrap();
        let src = f.d.constant_bits(2, 1);
        let err = f.d.check_wire(src, twice).unwrap_err();
        assert!(matches!(err, IrError::MultipleDrivers { .. }));
        assert_eq!(f.d.driver(i0), None);
    }
}
