//! Ordered, name-unique collections of ports.
//!
//! An [`Interface`] is what a circuit type, an instance, a definition body or
//! an anonymous circuit exposes. Entries keep declaration order, which
//! decides chaining order in folds and concatenation order in joins.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strand_common::{Ident, Interner};

use crate::error::IrError;
use crate::ids::{PortId, TypeId};
use crate::types::{Direction, TypeDb};

/// Names of the clock-category ports. They are excluded from the functional
/// input/output views and forked by default when braiding.
pub const CLOCK_NAMES: [&str; 6] = ["RESET", "SET", "CE", "CLK", "CIN", "COUT"];

/// Whether a port carries data or belongs to the clock category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortClass {
    /// An ordinary data port.
    Data,
    /// One of [`CLOCK_NAMES`].
    Clock,
}

impl PortClass {
    /// Classifies a port by name.
    pub fn of(name: &str) -> Self {
        if CLOCK_NAMES.contains(&name) {
            PortClass::Clock
        } else {
            PortClass::Data
        }
    }
}

/// One entry of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfacePort {
    /// The port handle.
    pub port: PortId,
    /// The port type.
    pub ty: TypeId,
    /// Direction read off the type.
    pub direction: Direction,
    /// Data or clock category.
    pub class: PortClass,
}

/// An ordered mapping from port name to port.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    ports: IndexMap<Ident, InterfacePort>,
}

impl Interface {
    /// Creates an empty interface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// Fails with [`IrError::DuplicatePort`] if the name is taken and with
    /// [`IrError::MissingDirection`] if `direction` is unresolved.
    pub fn insert(
        &mut self,
        interner: &Interner,
        name: Ident,
        port: PortId,
        ty: TypeId,
        direction: Direction,
    ) -> Result<(), IrError> {
        let text = interner.resolve(name);
        if !direction.is_resolved() {
            return Err(IrError::MissingDirection {
                name: text.to_string(),
                position: self.ports.len(),
            });
        }
        if self.ports.contains_key(&name) {
            return Err(IrError::DuplicatePort {
                name: text.to_string(),
            });
        }
        self.ports.insert(
            name,
            InterfacePort {
                port,
                ty,
                direction,
                class: PortClass::of(text),
            },
        );
        Ok(())
    }

    /// Returns the entry named `name`.
    pub fn get(&self, name: Ident) -> Option<&InterfacePort> {
        self.ports.get(&name)
    }

    /// Returns the port named `name`.
    pub fn port(&self, name: Ident) -> Option<PortId> {
        self.ports.get(&name).map(|p| p.port)
    }

    /// Returns the declaration position of `name`.
    pub fn position(&self, name: Ident) -> Option<usize> {
        self.ports.get_index_of(&name)
    }

    /// Returns `true` if `name` is declared.
    pub fn contains(&self, name: Ident) -> bool {
        self.ports.contains_key(&name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// Returns `true` if the interface has no entries.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Iterates over `(name, entry)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Ident, &InterfacePort)> {
        self.ports.iter().map(|(n, p)| (*n, p))
    }

    /// Port names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = Ident> + '_ {
        self.ports.keys().copied()
    }

    /// All ports in declaration order.
    pub fn ports(&self) -> Vec<PortId> {
        self.ports.values().map(|p| p.port).collect()
    }

    /// All `(name, port)` pairs in declaration order.
    pub fn args(&self) -> Vec<(Ident, PortId)> {
        self.iter().map(|(n, p)| (n, p.port)).collect()
    }

    /// Functional `(name, port)` inputs: input-directed data ports.
    pub fn input_args(&self) -> Vec<(Ident, PortId)> {
        self.filtered(|p| p.direction == Direction::Input && p.class == PortClass::Data)
    }

    /// Functional `(name, port)` outputs: output-directed data ports.
    pub fn output_args(&self) -> Vec<(Ident, PortId)> {
        self.filtered(|p| p.direction == Direction::Output && p.class == PortClass::Data)
    }

    /// Clock-category `(name, port)` pairs.
    pub fn clock_args(&self) -> Vec<(Ident, PortId)> {
        self.filtered(|p| p.class == PortClass::Clock)
    }

    /// Functional input ports.
    pub fn inputs(&self) -> Vec<PortId> {
        self.input_args().into_iter().map(|(_, p)| p).collect()
    }

    /// Functional output ports.
    pub fn outputs(&self) -> Vec<PortId> {
        self.output_args().into_iter().map(|(_, p)| p).collect()
    }

    /// Clock-category ports.
    pub fn clock_ports(&self) -> Vec<PortId> {
        self.clock_args().into_iter().map(|(_, p)| p).collect()
    }

    /// Returns `true` if any clock-category port is declared.
    pub fn is_clocked(&self) -> bool {
        self.ports.values().any(|p| p.class == PortClass::Clock)
    }

    /// Rebuilds a declaration list with every direction flipped.
    ///
    /// Applied to a definition body's interface this yields the circuit's
    /// declared interface again.
    pub fn decl(&self, types: &mut TypeDb) -> Vec<(Ident, TypeId)> {
        self.ports
            .iter()
            .map(|(name, p)| (*name, types.flip(p.ty)))
            .collect()
    }

    fn filtered(&self, keep: impl Fn(&InterfacePort) -> bool) -> Vec<(Ident, PortId)> {
        self.ports
            .iter()
            .filter(|(_, p)| keep(p))
            .map(|(n, p)| (*n, p.port))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(interner: &Interner, db: &TypeDb, entries: &[(&str, Direction)]) -> Interface {
        let mut iface = Interface::new();
        for (i, (name, dir)) in entries.iter().enumerate() {
            let ident = interner.get_or_intern(name);
            iface
                .insert(interner, ident, PortId::from_raw(i as u32), db.bit(*dir), *dir)
                .unwrap();
        }
        iface
    }

    #[test]
    fn functional_views_skip_clock_names() {
        let interner = Interner::new();
        let db = TypeDb::new();
        let iface = build(
            &interner,
            &db,
            &[
                ("CLK", Direction::Input),
                ("I", Direction::Input),
                ("CIN", Direction::Input),
                ("O", Direction::Output),
                ("COUT", Direction::Output),
            ],
        );
        assert_eq!(iface.inputs(), vec![PortId::from_raw(1)]);
        assert_eq!(iface.outputs(), vec![PortId::from_raw(3)]);
        assert_eq!(iface.clock_ports().len(), 3);
        assert!(iface.is_clocked());
    }

    #[test]
    fn declaration_order_is_kept() {
        let interner = Interner::new();
        let db = TypeDb::new();
        let iface = build(
            &interner,
            &db,
            &[
                ("B", Direction::Input),
                ("A", Direction::Input),
                ("O", Direction::Output),
            ],
        );
        let names: Vec<&str> = iface.names().map(|n| interner.resolve(n)).collect();
        assert_eq!(names, vec!["B", "A", "O"]);
        assert_eq!(iface.position(interner.get_or_intern("A")), Some(1));
        assert!(!iface.is_clocked());
    }

    #[test]
    fn duplicate_name_rejected() {
        let interner = Interner::new();
        let db = TypeDb::new();
        let mut iface = build(&interner, &db, &[("I", Direction::Input)]);
        let i = interner.get_or_intern("I");
        let err = iface
            .insert(&interner, i, PortId::from_raw(9), db.bit(Direction::Input), Direction::Input)
            .unwrap_err();
        assert_eq!(err, IrError::DuplicatePort { name: "I".into() });
    }

    #[test]
    fn undirected_entry_rejected_with_position() {
        let interner = Interner::new();
        let db = TypeDb::new();
        let mut iface = build(&interner, &db, &[("I", Direction::Input)]);
        let x = interner.get_or_intern("X");
        let err = iface
            .insert(
                &interner,
                x,
                PortId::from_raw(1),
                db.bit(Direction::Undirected),
                Direction::Undirected,
            )
            .unwrap_err();
        assert_eq!(
            err,
            IrError::MissingDirection {
                name: "X".into(),
                position: 1
            }
        );
    }

    #[test]
    fn decl_flips_directions() {
        let interner = Interner::new();
        let mut db = TypeDb::new();
        let iface = build(
            &interner,
            &db,
            &[("I", Direction::Output), ("O", Direction::Input)],
        );
        let decl = iface.decl(&mut db);
        assert_eq!(db.direction(decl[0].1), Direction::Input);
        assert_eq!(db.direction(decl[1].1), Direction::Output);
    }
}
