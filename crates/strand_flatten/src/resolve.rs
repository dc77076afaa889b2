//! Tracing consumers back to their producers across instance boundaries.

use std::collections::{HashMap, HashSet};

use strand_common::InternalError;
use strand_ir::{
    CircuitId, Design, InstanceId, PortId, PortRef, QualifiedBit, QualifiedInstance, ScopeId,
};

use crate::error::FlattenError;

/// The value a consumer sees, expressed in the flattened netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolved {
    /// A port of the flattened netlist, or a shared constant.
    Port(PortId),
    /// A composite resolved element by element.
    Elements(Vec<Resolved>),
    /// Nothing drives the value.
    Undriven,
}

/// Memoized backward walk over the original hierarchy.
pub(crate) struct Resolver<'a> {
    design: &'a Design,
    top: CircuitId,
    flat: CircuitId,
    boundary: &'a HashMap<QualifiedBit, QualifiedBit>,
    leaves: &'a HashMap<QualifiedInstance, InstanceId>,
    memo: HashMap<QualifiedBit, Resolved>,
    seen: HashMap<QualifiedBit, Resolved>,
    active: HashSet<QualifiedBit>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        design: &'a Design,
        top: CircuitId,
        flat: CircuitId,
        boundary: &'a HashMap<QualifiedBit, QualifiedBit>,
        leaves: &'a HashMap<QualifiedInstance, InstanceId>,
    ) -> Self {
        Self {
            design,
            top,
            flat,
            boundary,
            leaves,
            memo: HashMap::new(),
            seen: HashMap::new(),
            active: HashSet::new(),
        }
    }

    /// The value seen by consumer `port` in `scope`.
    pub(crate) fn value(&mut self, port: PortId, scope: ScopeId) -> Result<Resolved, FlattenError> {
        let resolved = match self.design.driver(port) {
            Some(src) => self.source(src, scope)?,
            None => {
                let elements = self.design.port(port).elements.clone();
                if elements.is_empty() {
                    Resolved::Undriven
                } else {
                    let resolved = elements
                        .into_iter()
                        .map(|e| self.value(e, scope))
                        .collect::<Result<Vec<_>, _>>()?;
                    Resolved::Elements(resolved)
                }
            }
        };
        self.seen.insert(QualifiedBit::new(port, scope), resolved.clone());
        Ok(resolved)
    }

    /// Every qualified port visited so far with the value it resolved to.
    pub(crate) fn into_visited(self) -> HashMap<QualifiedBit, Resolved> {
        let mut visited = self.memo;
        visited.extend(self.seen);
        visited
    }

    /// The value produced at `src` in `scope`.
    fn source(&mut self, src: PortId, scope: ScopeId) -> Result<Resolved, FlattenError> {
        let key = QualifiedBit::new(src, scope);
        if let Some(r) = self.memo.get(&key) {
            return Ok(r.clone());
        }
        if !self.active.insert(key) {
            return Err(self.malformed(src, "is part of a driving cycle"));
        }
        let resolved = self.trace(src, scope);
        self.active.remove(&key);
        let resolved = resolved?;
        self.memo.insert(key, resolved.clone());
        Ok(resolved)
    }

    fn trace(&mut self, src: PortId, scope: ScopeId) -> Result<Resolved, FlattenError> {
        let design = self.design;
        if let Some(&hop) = self.boundary.get(&QualifiedBit::new(src, scope)) {
            return self.value(hop.port, hop.scope);
        }
        if design.is_constant(src) {
            return Ok(Resolved::Port(src));
        }
        if design.is_net(src) {
            return self.value(src, scope);
        }
        let port = design.port(src);
        if port.assembled {
            let elements = port.elements.clone();
            let resolved = elements
                .into_iter()
                .map(|e| self.source(e, scope))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Resolved::Elements(resolved));
        }
        match port.reference {
            PortRef::Instance { instance, name } => {
                let key = QualifiedInstance { instance, scope };
                match self.leaves.get(&key) {
                    Some(&copy) => {
                        let port = design.port_of(copy, design.name(name))?;
                        Ok(Resolved::Port(port))
                    }
                    None => Err(self.malformed(src, "belongs to no collected leaf")),
                }
            }
            PortRef::Definition { circuit, name } if circuit == self.top && scope == ScopeId::ROOT => {
                let port = design.boundary(self.flat, design.name(name))?;
                Ok(Resolved::Port(port))
            }
            PortRef::Element { parent, index } => {
                let parent = self.source(parent, scope)?;
                self.index(parent, index)
            }
            _ => Err(self.malformed(src, "has no producer in the hierarchy")),
        }
    }

    fn index(&self, resolved: Resolved, index: u32) -> Result<Resolved, FlattenError> {
        match resolved {
            Resolved::Port(p) => Ok(Resolved::Port(self.design.element(p, index)?)),
            Resolved::Elements(mut items) => {
                let i = index as usize;
                if i < items.len() {
                    Ok(items.swap_remove(i))
                } else {
                    Err(InternalError::new(format!("element {index} of a resolved composite")).into())
                }
            }
            Resolved::Undriven => Ok(Resolved::Undriven),
        }
    }

    fn malformed(&self, port: PortId, what: &str) -> FlattenError {
        InternalError::new(format!("`{}` {what}", self.design.port_name(port))).into()
    }
}

/// Wires a resolved value into `destination` of the flattened netlist.
///
/// Undriven values are skipped; they surface later as unwired ports.
pub(crate) fn wire_resolved(
    design: &mut Design,
    resolved: &Resolved,
    destination: PortId,
) -> Result<(), FlattenError> {
    match resolved {
        Resolved::Port(p) => design.wire_with(*p, destination, None)?,
        Resolved::Elements(items) => {
            for (i, item) in items.iter().enumerate() {
                let element = design.element(destination, i as u32)?;
                wire_resolved(design, item, element)?;
            }
        }
        Resolved::Undriven => {
            tracing::debug!(port = %design.port_name(destination), "undriven after flattening");
        }
    }
    Ok(())
}
