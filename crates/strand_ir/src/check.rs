//! Whole-definition wiring checks and listings.

use crate::design::Design;
use crate::error::IrError;
use crate::ids::{CircuitId, PortId};
use crate::types::Direction;

impl Design {
    /// Every port a definition's wiring must drive: instance inputs in
    /// placement order, then the body's boundary outputs.
    pub fn consumers(&self, circuit: CircuitId) -> Result<Vec<PortId>, IrError> {
        let body = self.body(circuit)?;
        let mut ports = Vec::new();
        for &inst in &body.instances {
            for (_, p) in self.instances[inst].interface.iter() {
                if p.direction == Direction::Input {
                    ports.push(p.port);
                }
            }
        }
        for (_, p) in body.interface.iter() {
            if p.direction == Direction::Input {
                ports.push(p.port);
            }
        }
        Ok(ports)
    }

    /// Fails with [`IrError::Unwired`] unless every non-constant consumer
    /// bit of `circuit` resolves to a value.
    pub fn check_wired(&self, circuit: CircuitId) -> Result<(), IrError> {
        let mut unwired = Vec::new();
        for port in self.consumers(circuit)? {
            self.collect_unwired(port, &mut unwired);
        }
        if unwired.is_empty() {
            Ok(())
        } else {
            Err(IrError::Unwired {
                circuit: self.circuit_name(circuit).to_string(),
                ports: unwired,
            })
        }
    }

    fn collect_unwired(&self, port: PortId, out: &mut Vec<String>) {
        let p = &self.ports[port];
        if p.is_composite() {
            for &e in &p.elements {
                self.collect_unwired(e, out);
            }
            return;
        }
        let resolved = match self.value(port) {
            Some(v) => !self.is_net(v),
            None => false,
        };
        if !resolved {
            out.push(self.port_name(port));
        }
    }

    /// Renders the wiring of a definition, one `wire(source, destination)`
    /// line per link. Whole links are listed once instead of per element.
    pub fn wiring_listing(&self, circuit: CircuitId) -> Result<String, IrError> {
        let mut out = String::new();
        for port in self.consumers(circuit)? {
            self.list_links(port, &mut out);
        }
        Ok(out)
    }

    fn list_links(&self, port: PortId, out: &mut String) {
        match self.driver(port) {
            Some(src) => {
                out.push_str(&format!("wire({}, {})\n", self.port_name(src), self.port_name(port)));
            }
            None => {
                for &e in &self.ports[port].elements {
                    self.list_links(e, out);
                }
            }
        }
    }
}
