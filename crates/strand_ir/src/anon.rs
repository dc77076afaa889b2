//! Anonymous circuits: interfaces with no owner.
//!
//! An [`AnonymousCircuit`] is an ordered bundle of existing ports. It carries
//! the result of a braid combinator, or exposes an instance so combinators can
//! treat instances and composites uniformly.

use serde::{Deserialize, Serialize};
use strand_common::Ident;

use crate::design::Design;
use crate::error::IrError;
use crate::ids::{InstanceId, PortId};
use crate::interface::Interface;

/// An ordered name-to-port bundle with no owning definition or instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymousCircuit {
    /// Display name: the instance name for views, `None` for composites.
    pub name: Option<Ident>,
    /// The exposed ports.
    pub interface: Interface,
}

impl AnonymousCircuit {
    /// Returns the port named `name`.
    pub fn port(&self, name: Ident) -> Option<PortId> {
        self.interface.port(name)
    }

    /// Functional inputs in declaration order.
    pub fn inputs(&self) -> Vec<PortId> {
        self.interface.inputs()
    }

    /// Functional outputs in declaration order.
    pub fn outputs(&self) -> Vec<PortId> {
        self.interface.outputs()
    }
}

impl Design {
    /// Bundles existing ports under the given names.
    ///
    /// Each entry's direction is read off its port's type.
    pub fn anonymous_circuit(&self, args: &[(&str, PortId)]) -> Result<AnonymousCircuit, IrError> {
        let args = args.iter().map(|(n, p)| (self.ident(n), *p)).collect();
        self.anonymous_circuit_from(args)
    }

    /// Bundles existing ports under already-interned names.
    pub fn anonymous_circuit_from(
        &self,
        args: Vec<(Ident, PortId)>,
    ) -> Result<AnonymousCircuit, IrError> {
        let mut interface = Interface::new();
        for (name, port) in args {
            let ty = self.ports[port].ty;
            interface.insert(&self.interner, name, port, ty, self.types.direction(ty))?;
        }
        Ok(AnonymousCircuit {
            name: None,
            interface,
        })
    }

    /// Exposes an instance's interface as an anonymous circuit.
    pub fn view(&self, instance: InstanceId) -> AnonymousCircuit {
        let inst = &self.instances[instance];
        AnonymousCircuit {
            name: Some(inst.name),
            interface: inst.interface.clone(),
        }
    }

    /// Display name of an anonymous circuit.
    pub fn anon_name(&self, circuit: &AnonymousCircuit) -> String {
        match circuit.name {
            Some(n) => self.name(n).to_string(),
            None => "<anonymous>".to_string(),
        }
    }

    /// Returns the port of `circuit` named `name`.
    pub fn anon_port(&self, circuit: &AnonymousCircuit, name: &str) -> Result<PortId, IrError> {
        self.interner
            .get(name)
            .and_then(|n| circuit.port(n))
            .ok_or_else(|| IrError::UnknownPort {
                owner: self.anon_name(circuit),
                name: name.to_string(),
            })
    }

    /// Wires `args` positionally into the functional inputs of `circuit` and
    /// returns its functional outputs.
    ///
    /// Every wire is checked before any is made.
    pub fn apply(
        &mut self,
        circuit: &AnonymousCircuit,
        args: &[PortId],
    ) -> Result<Vec<PortId>, IrError> {
        let inputs = circuit.inputs();
        if inputs.len() != args.len() {
            return Err(IrError::ArityMismatch {
                circuit: self.anon_name(circuit),
                expected: inputs.len(),
                found: args.len(),
            });
        }
        for (&arg, &input) in args.iter().zip(&inputs) {
            self.check_wire(arg, input)?;
        }
        for (&arg, &input) in args.iter().zip(&inputs) {
            self.wire(arg, input)?;
        }
        Ok(circuit.outputs())
    }
}
