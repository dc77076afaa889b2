//! Hierarchy transforms for strand netlists.
//!
//! [`flatten`] rebuilds a definition as a new, single-level definition whose
//! body holds a copy of every primitive instance reachable from it, wired
//! exactly as the hierarchy wired them. [`setup_clocks`] fills in the usual
//! clock, reset, set and enable connections before flattening.
//!
//! # Usage
//!
//! ```
//! use strand_flatten::{flatten, FlattenOptions};
//! use strand_ir::{Design, Direction};
//!
//! let mut d = Design::new();
//! let i = d.types.bit(Direction::Input);
//! let o = d.types.bit(Direction::Output);
//! let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)])?;
//! let sub = d.define_circuit("sub", &[("I", i), ("O", o)])?;
//! let u = d.instantiate(sub, inv, &[])?;
//! d.wire(d.boundary(sub, "I")?, d.port_of(u, "I")?)?;
//! d.wire(d.port_of(u, "O")?, d.boundary(sub, "O")?)?;
//! d.end_circuit(sub)?;
//!
//! let top = d.define_circuit("top", &[("I", i), ("O", o)])?;
//! let s = d.instantiate(top, sub, &[])?;
//! d.wire(d.boundary(top, "I")?, d.port_of(s, "I")?)?;
//! d.wire(d.port_of(s, "O")?, d.boundary(top, "O")?)?;
//! d.end_circuit(top)?;
//!
//! let flat = flatten(&mut d, top, &FlattenOptions::default())?;
//! assert_eq!(d.circuit_name(flat.circuit), "top_flattened");
//! assert_eq!(flat.leaves.len(), 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod clocks;
pub mod collect;
pub mod error;
pub mod hierarchy;
mod resolve;

use std::collections::HashMap;

use strand_config::FlattenConfig;
use strand_ir::{
    CircuitId, Design, Direction, InstanceId, PortId, QualifiedBit, QualifiedInstance, ScopeId,
    ScopeTable,
};

pub use clocks::{setup_clocks, DEFAULT_CLOCKS};
pub use collect::{collect, Collected};
pub use error::FlattenError;
pub use hierarchy::{definition_order, instantiation_graph};

use resolve::{wire_resolved, Resolved, Resolver};

/// Options controlling [`flatten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Appended to the top definition's name, joined with `_`.
    pub suffix: String,
    /// Joins scope path names and the instance name of each copied leaf.
    pub separator: String,
    /// Fail with [`strand_ir::IrError::Unwired`] if the result has open inputs.
    pub check_wired: bool,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self::from_config(&FlattenConfig::default())
    }
}

impl FlattenOptions {
    /// Options taken from the `[flatten]` section of `strand.toml`.
    pub fn from_config(config: &FlattenConfig) -> Self {
        Self {
            suffix: config.suffix.clone(),
            separator: config.separator.clone(),
            check_wired: config.check_wired,
        }
    }
}

/// The outcome of [`flatten`].
#[derive(Debug)]
pub struct Flattened {
    /// The new single-level definition, sealed.
    pub circuit: CircuitId,
    /// Each original leaf paired with its copy, in depth-first order.
    pub leaves: Vec<(QualifiedInstance, InstanceId)>,
    /// The scopes referenced by `leaves` and `bits`.
    pub scopes: ScopeTable,
    /// Where each scope-qualified original port ended up.
    ///
    /// Leaf ports map to the same-named port of their copy and the top
    /// definition's boundary maps to the new boundary. Every other port the
    /// walk crossed, such as an inner boundary port or a net, maps to the
    /// producer now driving its value. Composites are also mapped element
    /// by element.
    pub bits: HashMap<QualifiedBit, PortId>,
}

impl Flattened {
    /// The flattened counterpart of `port` seen from `scope`.
    pub fn new_bit(&self, port: PortId, scope: ScopeId) -> Option<PortId> {
        self.bits.get(&QualifiedBit::new(port, scope)).copied()
    }
}

/// Flattens the hierarchy below `top` into a new definition.
///
/// The original definitions are left untouched. Each leaf copy is named by
/// its scope path and instance name joined with the separator, and keeps its
/// parameters. Every consumer bit of the result is driven by the terminal
/// producer its original counterpart saw: a leaf output, a top-level input
/// or a constant.
pub fn flatten(
    design: &mut Design,
    top: CircuitId,
    options: &FlattenOptions,
) -> Result<Flattened, FlattenError> {
    definition_order(design, top)?;

    let mut scopes = ScopeTable::new();
    let mut collected = Collected::default();
    collect(design, &mut scopes, top, ScopeId::ROOT, &mut collected)?;

    let name = format!("{}_{}", design.circuit_name(top), options.suffix);
    let decl = design.circuit(top).decl.clone();
    let circuit = design.define_circuit_from(&name, decl)?;

    let mut leaves = Vec::with_capacity(collected.leaves.len());
    let mut copies = HashMap::with_capacity(collected.leaves.len());
    for &leaf in &collected.leaves {
        let copy = place_leaf(design, &scopes, circuit, leaf, &options.separator)?;
        leaves.push((leaf, copy));
        copies.insert(leaf, copy);
    }

    let mut plan = Vec::new();
    let mut bits = HashMap::new();
    {
        let mut resolver = Resolver::new(design, top, circuit, &collected.boundary, &copies);
        for &(leaf, copy) in &leaves {
            for (name, entry) in design.instance(leaf.instance).interface.iter() {
                if entry.direction != Direction::Input {
                    continue;
                }
                let resolved = resolver.value(entry.port, leaf.scope)?;
                let dst = design.port_of(copy, design.name(name))?;
                plan.push((resolved, dst));
            }
        }
        for (name, entry) in design.body(top)?.interface.iter() {
            if entry.direction != Direction::Input {
                continue;
            }
            let resolved = resolver.value(entry.port, ScopeId::ROOT)?;
            let dst = design.boundary(circuit, design.name(name))?;
            plan.push((resolved, dst));
        }

        for (key, resolved) in resolver.into_visited() {
            record_resolved(design, &mut bits, key, &resolved);
        }
        for &(leaf, copy) in &leaves {
            for (name, entry) in design.instance(leaf.instance).interface.iter() {
                let new = design.port_of(copy, design.name(name))?;
                record_port(design, &mut bits, QualifiedBit::new(entry.port, leaf.scope), new);
            }
        }
        for (name, entry) in design.body(top)?.interface.iter() {
            let new = design.boundary(circuit, design.name(name))?;
            record_port(design, &mut bits, QualifiedBit::new(entry.port, ScopeId::ROOT), new);
        }
    }
    for (resolved, dst) in &plan {
        wire_resolved(design, resolved, *dst)?;
    }
    design.end_circuit(circuit)?;

    tracing::debug!(
        circuit = %name,
        leaves = leaves.len(),
        scopes = scopes.len(),
        "flatten"
    );

    if options.check_wired {
        design.check_wired(circuit)?;
    }
    Ok(Flattened {
        circuit,
        leaves,
        scopes,
        bits,
    })
}

fn record_port(
    design: &Design,
    bits: &mut HashMap<QualifiedBit, PortId>,
    old: QualifiedBit,
    new: PortId,
) {
    bits.insert(old, new);
    let (olds, news) = (&design.port(old.port).elements, &design.port(new).elements);
    for (&o, &n) in olds.iter().zip(news) {
        record_port(design, bits, QualifiedBit::new(o, old.scope), n);
    }
}

fn record_resolved(
    design: &Design,
    bits: &mut HashMap<QualifiedBit, PortId>,
    old: QualifiedBit,
    resolved: &Resolved,
) {
    match resolved {
        Resolved::Port(new) => record_port(design, bits, old, *new),
        Resolved::Elements(items) => {
            for (&o, item) in design.port(old.port).elements.iter().zip(items) {
                record_resolved(design, bits, QualifiedBit::new(o, old.scope), item);
            }
        }
        Resolved::Undriven => {}
    }
}

fn place_leaf(
    design: &mut Design,
    scopes: &ScopeTable,
    circuit: CircuitId,
    leaf: QualifiedInstance,
    separator: &str,
) -> Result<InstanceId, FlattenError> {
    let original = design.instance(leaf.instance);
    let path = scopes.path_name(design, leaf.scope, separator);
    let base = design.name(original.name);
    let name = if path.is_empty() {
        base.to_string()
    } else {
        format!("{path}{separator}{base}")
    };
    let (prim, params) = (original.circuit, original.params.clone());
    let name = design.ident(&name);
    Ok(design.place(circuit, prim, name, params)?)
}
