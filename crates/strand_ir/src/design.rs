//! The construction session.
//!
//! A [`Design`] owns everything a netlist is made of: the interner, the type
//! database, and arenas of ports, circuits and instances. Construction code
//! declares circuits, places instances and wires ports through it; transforms
//! add new circuits next to the existing ones instead of rewriting them.
//!
//! Mutation requires `&mut Design`, so a design under construction has a
//! single author. A finished design is `Sync` and may be shared for reading.

use std::collections::HashMap;

use strand_common::{Ident, Interner, Logic};

use crate::arena::Arena;
use crate::circuit::{Body, Circuit, CircuitKind, Instance};
use crate::const_value::ConstValue;
use crate::error::IrError;
use crate::ids::{CircuitId, InstanceId, PortId, TypeId};
use crate::interface::Interface;
use crate::library::FamilyKey;
use crate::port::{Port, PortRef};
use crate::types::{Direction, TypeDb};

/// Who a freshly built interface belongs to.
#[derive(Clone, Copy)]
enum Owner {
    Instance(InstanceId),
    Definition(CircuitId),
}

/// A netlist under construction.
#[derive(Debug, Default)]
pub struct Design {
    /// Names of ports, circuits and instances.
    pub interner: Interner,
    /// Interned port types.
    pub types: TypeDb,
    /// Every port, element and anonymous net.
    pub ports: Arena<PortId, Port>,
    /// Every declared circuit type.
    pub circuits: Arena<CircuitId, Circuit>,
    /// Every placed instance.
    pub instances: Arena<InstanceId, Instance>,
    /// Width-parameterized primitives declared so far.
    pub(crate) families: HashMap<FamilyKey, CircuitId>,
}

impl Design {
    /// Creates an empty design.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a name.
    pub fn ident(&self, s: &str) -> Ident {
        self.interner.get_or_intern(s)
    }

    /// Resolves an interned name.
    pub fn name(&self, ident: Ident) -> &str {
        self.interner.resolve(ident)
    }

    /// Returns a circuit.
    pub fn circuit(&self, id: CircuitId) -> &Circuit {
        &self.circuits[id]
    }

    /// Returns an instance.
    pub fn instance(&self, id: InstanceId) -> &Instance {
        &self.instances[id]
    }

    /// Returns a port.
    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id]
    }

    /// Returns a circuit's name.
    pub fn circuit_name(&self, id: CircuitId) -> &str {
        self.name(self.circuits[id].name)
    }

    /// Finds the most recently declared circuit with the given name.
    pub fn circuit_named(&self, name: &str) -> Option<CircuitId> {
        let ident = self.interner.get(name)?;
        self.circuits
            .iter()
            .filter(|(_, c)| c.name == ident)
            .map(|(id, _)| id)
            .last()
    }

    /// Returns `true` if the circuit is an opaque leaf.
    pub fn is_primitive(&self, id: CircuitId) -> bool {
        self.circuits[id].is_primitive()
    }

    /// Returns the body of a definition.
    pub fn body(&self, id: CircuitId) -> Result<&Body, IrError> {
        self.circuits[id]
            .body()
            .ok_or_else(|| IrError::NotADefinition {
                name: self.circuit_name(id).to_string(),
            })
    }

    /// Declares an opaque primitive.
    pub fn declare_primitive(
        &mut self,
        name: &str,
        decl: &[(&str, TypeId)],
    ) -> Result<CircuitId, IrError> {
        self.declare_primitive_with(name, decl, &[])
    }

    /// Declares an opaque primitive carrying backend attributes.
    pub fn declare_primitive_with(
        &mut self,
        name: &str,
        decl: &[(&str, TypeId)],
        attrs: &[(&str, ConstValue)],
    ) -> Result<CircuitId, IrError> {
        let decl = self.intern_decl(decl);
        self.check_decl(&decl)?;
        let attrs = attrs
            .iter()
            .map(|(n, v)| (self.ident(n), v.clone()))
            .collect();
        let name = self.ident(name);
        let id = self.circuits.next_id();
        Ok(self.circuits.alloc(Circuit {
            id,
            name,
            decl,
            kind: CircuitKind::Primitive { attrs },
        }))
    }

    /// Begins a new definition.
    ///
    /// The body's interface is the flip of `decl`, with every port referenced
    /// as a definition boundary port.
    pub fn define_circuit(
        &mut self,
        name: &str,
        decl: &[(&str, TypeId)],
    ) -> Result<CircuitId, IrError> {
        let decl = self.intern_decl(decl);
        self.define_circuit_from(name, decl)
    }

    /// Begins a new definition from an already-interned declaration list.
    pub fn define_circuit_from(
        &mut self,
        name: &str,
        decl: Vec<(Ident, TypeId)>,
    ) -> Result<CircuitId, IrError> {
        self.check_decl(&decl)?;
        let name = self.ident(name);
        let id = self.circuits.next_id();
        let interface = self.build_interface(&decl, Owner::Definition(id))?;
        tracing::debug!(circuit = self.name(name), ports = decl.len(), "define circuit");
        Ok(self.circuits.alloc(Circuit {
            id,
            name,
            decl,
            kind: CircuitKind::Definition(Body {
                interface,
                instances: Vec::new(),
                sealed: false,
            }),
        }))
    }

    /// Ends a definition. Afterwards it accepts no new instances or wires.
    pub fn end_circuit(&mut self, id: CircuitId) -> Result<(), IrError> {
        let name = self.circuit_name(id).to_string();
        match self.circuits[id].body_mut() {
            Some(body) => {
                body.sealed = true;
                Ok(())
            }
            None => Err(IrError::NotADefinition { name }),
        }
    }

    /// Places `circuit` inside `parent` under an automatically chosen name.
    pub fn instantiate(
        &mut self,
        parent: CircuitId,
        circuit: CircuitId,
        params: &[(&str, ConstValue)],
    ) -> Result<InstanceId, IrError> {
        let count = self.body(parent)?.instances.len();
        let name = format!("{}_inst{count}", self.circuit_name(circuit));
        let params = params
            .iter()
            .map(|(n, v)| (self.ident(n), v.clone()))
            .collect();
        let name = self.ident(&name);
        self.place(parent, circuit, name, params)
    }

    /// Places `circuit` inside `parent` under `name`.
    ///
    /// The instance's interface keeps the circuit's declared directions.
    pub fn place(
        &mut self,
        parent: CircuitId,
        circuit: CircuitId,
        name: Ident,
        params: Vec<(Ident, ConstValue)>,
    ) -> Result<InstanceId, IrError> {
        let body = self.body(parent)?;
        if body.sealed {
            return Err(IrError::DefinitionSealed {
                name: self.circuit_name(parent).to_string(),
            });
        }
        if body
            .instances
            .iter()
            .any(|&i| self.instances[i].name == name)
        {
            return Err(IrError::DuplicateInstance {
                parent: self.circuit_name(parent).to_string(),
                name: self.name(name).to_string(),
            });
        }

        let decl = self.circuits[circuit].decl.clone();
        let id = self.instances.next_id();
        let interface = self.build_interface(&decl, Owner::Instance(id))?;
        self.instances.alloc(Instance {
            id,
            name,
            circuit,
            parent,
            interface,
            params,
        });
        if let Some(body) = self.circuits[parent].body_mut() {
            body.instances.push(id);
        }
        Ok(id)
    }

    /// Returns the named port of an instance.
    pub fn port_of(&self, instance: InstanceId, name: &str) -> Result<PortId, IrError> {
        let inst = &self.instances[instance];
        self.interner
            .get(name)
            .and_then(|n| inst.interface.port(n))
            .ok_or_else(|| IrError::UnknownPort {
                owner: self.name(inst.name).to_string(),
                name: name.to_string(),
            })
    }

    /// Returns the named boundary port of a definition, as seen from inside.
    pub fn boundary(&self, circuit: CircuitId, name: &str) -> Result<PortId, IrError> {
        let body = self.body(circuit)?;
        self.interner
            .get(name)
            .and_then(|n| body.interface.port(n))
            .ok_or_else(|| IrError::UnknownPort {
                owner: self.circuit_name(circuit).to_string(),
                name: name.to_string(),
            })
    }

    /// Returns element `index` of a composite port.
    pub fn element(&self, port: PortId, index: u32) -> Result<PortId, IrError> {
        let p = &self.ports[port];
        p.elements
            .get(index as usize)
            .copied()
            .ok_or_else(|| IrError::IndexOutOfRange {
                port: self.port_name(port),
                index,
                len: p.elements.len() as u32,
            })
    }

    /// Returns the direction of a port.
    pub fn direction(&self, port: PortId) -> Direction {
        self.types.direction(self.ports[port].ty)
    }

    /// Walks element references up to the outermost port.
    pub fn root(&self, port: PortId) -> PortId {
        let mut cur = port;
        while let PortRef::Element { parent, .. } = self.ports[cur].reference {
            cur = parent;
        }
        cur
    }

    /// Returns the definition whose body a port belongs to.
    ///
    /// Instance ports belong to the instance's parent; anonymous values
    /// belong to no definition.
    pub fn owner(&self, port: PortId) -> Option<CircuitId> {
        match self.ports[self.root(port)].reference {
            PortRef::Instance { instance, .. } => Some(self.instances[instance].parent),
            PortRef::Definition { circuit, .. } => Some(circuit),
            PortRef::Anonymous { .. } | PortRef::Element { .. } => None,
        }
    }

    /// Returns `true` for non-constant anonymous values.
    ///
    /// Such values are plain nets: they may be driven once and read any
    /// number of times regardless of their declared direction. Assembled
    /// arrays are not nets; their elements keep their own identity.
    pub fn is_net(&self, port: PortId) -> bool {
        !self.is_constant(port)
            && !self.ports[port].assembled
            && matches!(
                self.ports[self.root(port)].reference,
                PortRef::Anonymous { .. }
            )
    }

    /// Returns `true` for a literal bit or a vector made only of literal bits.
    pub fn is_constant(&self, port: PortId) -> bool {
        let p = &self.ports[port];
        p.is_constant()
            || (p.is_whole() && p.elements.iter().all(|e| self.is_constant(*e)))
    }

    /// Renders a port for diagnostics: `inst.I[0]`, `O`, `1'b1`, `[a, b]`.
    pub fn port_name(&self, port: PortId) -> String {
        let p = &self.ports[port];
        if let Some(v) = p.literal {
            return format!("1'b{v}");
        }
        if p.assembled {
            let inner: Vec<String> = p.elements.iter().map(|e| self.port_name(*e)).collect();
            return format!("[{}]", inner.join(", "));
        }
        match p.reference {
            PortRef::Anonymous { name } => self.name(name).to_string(),
            PortRef::Instance { instance, name } => {
                format!("{}.{}", self.name(self.instances[instance].name), self.name(name))
            }
            PortRef::Definition { name, .. } => self.name(name).to_string(),
            PortRef::Element { parent, index } => {
                match self.types.field_name(self.ports[parent].ty, index) {
                    Some(field) => format!("{}.{}", self.port_name(parent), self.name(field)),
                    None => format!("{}[{index}]", self.port_name(parent)),
                }
            }
        }
    }

    /// Creates a fresh anonymous net of type `ty`.
    pub fn anonymous(&mut self, name: &str, ty: TypeId) -> PortId {
        let name = self.ident(name);
        self.alloc_port(ty, PortRef::Anonymous { name })
    }

    /// Creates a constant bit.
    pub fn constant(&mut self, value: Logic) -> PortId {
        let ty = self.types.bit(Direction::Output);
        let id = self.anonymous(&format!("1'b{value}"), ty);
        self.ports[id].literal = Some(value);
        id
    }

    /// Creates a constant bit vector holding the low `width` bits of `value`.
    pub fn constant_bits(&mut self, width: u32, value: u64) -> PortId {
        let ty = self.types.bits(width, false, Direction::Output);
        let id = self.anonymous(&format!("{width}'d{value}"), ty);
        let elements = self.ports[id].elements.clone();
        for (i, e) in elements.into_iter().enumerate() {
            self.ports[e].literal = Some(Logic::bit_of(value, i as u32));
        }
        id
    }

    /// Gathers existing ports into an anonymous array.
    ///
    /// The elements keep their identity, direction and driving state; the
    /// array itself is never linked as a whole.
    pub fn array(&mut self, ports: &[PortId]) -> Result<PortId, IrError> {
        let (&first, rest) = ports.split_first().ok_or(IrError::EmptyArray)?;
        let elem_ty = self.ports[first].ty;
        for &p in rest {
            let ty = self.ports[p].ty;
            if !self.types.same_shape(elem_ty, ty) {
                return Err(IrError::TypeMismatch {
                    from: self.port_name(p),
                    from_type: self.types.display(ty, &self.interner),
                    to: self.port_name(first),
                    to_type: self.types.display(elem_ty, &self.interner),
                });
            }
        }
        let ty = self.types.array(elem_ty, ports.len() as u32);
        let name = self.ident("array");
        let id = self.ports.next_id();
        Ok(self.ports.alloc(Port {
            id,
            ty,
            reference: PortRef::Anonymous { name },
            driver: None,
            literal: None,
            elements: ports.to_vec(),
            assembled: true,
        }))
    }

    /// Allocates a port and, for composite types, its owned elements.
    pub(crate) fn alloc_port(&mut self, ty: TypeId, reference: PortRef) -> PortId {
        let id = self.ports.next_id();
        self.ports.alloc(Port {
            id,
            ty,
            reference,
            driver: None,
            literal: None,
            elements: Vec::new(),
            assembled: false,
        });
        let elements: Vec<PortId> = self
            .types
            .elements(ty)
            .into_iter()
            .enumerate()
            .map(|(index, elem_ty)| {
                self.alloc_port(
                    elem_ty,
                    PortRef::Element {
                        parent: id,
                        index: index as u32,
                    },
                )
            })
            .collect();
        self.ports[id].elements = elements;
        id
    }

    fn intern_decl(&self, decl: &[(&str, TypeId)]) -> Vec<(Ident, TypeId)> {
        decl.iter().map(|(n, t)| (self.ident(n), *t)).collect()
    }

    fn check_decl(&self, decl: &[(Ident, TypeId)]) -> Result<(), IrError> {
        for (position, (name, ty)) in decl.iter().enumerate() {
            if !self.types.direction(*ty).is_resolved() {
                return Err(IrError::MissingDirection {
                    name: self.name(*name).to_string(),
                    position,
                });
            }
            if decl[..position].iter().any(|(n, _)| n == name) {
                return Err(IrError::DuplicatePort {
                    name: self.name(*name).to_string(),
                });
            }
        }
        Ok(())
    }

    fn build_interface(
        &mut self,
        decl: &[(Ident, TypeId)],
        owner: Owner,
    ) -> Result<Interface, IrError> {
        let mut interface = Interface::new();
        for &(name, declared) in decl {
            let (ty, reference) = match owner {
                Owner::Instance(instance) => (declared, PortRef::Instance { instance, name }),
                Owner::Definition(circuit) => {
                    (self.types.flip(declared), PortRef::Definition { circuit, name })
                }
            };
            let port = self.alloc_port(ty, reference);
            let direction = self.types.direction(ty);
            interface.insert(&self.interner, name, port, ty, direction)?;
        }
        Ok(interface)
    }
}
