//! Scope-qualified keys for the flattener.
//!
//! The same bit of a circuit definition is reused by every instance of that
//! definition, so a bit alone does not say *where* in the hierarchy a value
//! lives. A scope is the root-first chain of instances leading to the
//! definition body; pairing a bit with its scope makes it unique.

use std::collections::HashMap;

use crate::design::Design;
use crate::ids::{InstanceId, PortId, ScopeId};

/// A bit in a particular hierarchical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedBit {
    /// The port.
    pub port: PortId,
    /// The chain of instances the port is seen through.
    pub scope: ScopeId,
}

impl QualifiedBit {
    /// Pairs a port with a scope.
    pub fn new(port: PortId, scope: ScopeId) -> Self {
        Self { port, scope }
    }
}

/// An instance in a particular hierarchical context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedInstance {
    /// The instance.
    pub instance: InstanceId,
    /// The scope of the definition the instance is placed in.
    pub scope: ScopeId,
}

/// Interned instance chains.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    chains: Vec<Vec<InstanceId>>,
    parents: Vec<Option<ScopeId>>,
    index: HashMap<Vec<InstanceId>, ScopeId>,
}

impl Default for ScopeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTable {
    /// Creates a table holding only [`ScopeId::ROOT`].
    pub fn new() -> Self {
        let mut index = HashMap::new();
        index.insert(Vec::new(), ScopeId::ROOT);
        Self {
            chains: vec![Vec::new()],
            parents: vec![None],
            index,
        }
    }

    /// Returns the scope reached by entering `instance` from `parent`.
    pub fn child(&mut self, parent: ScopeId, instance: InstanceId) -> ScopeId {
        let mut chain = self.path(parent).to_vec();
        chain.push(instance);
        if let Some(&id) = self.index.get(&chain) {
            return id;
        }
        let id = ScopeId::from_raw(self.chains.len() as u32);
        self.chains.push(chain.clone());
        self.parents.push(Some(parent));
        self.index.insert(chain, id);
        id
    }

    /// Returns the scope for an existing instance chain.
    pub fn find(&self, path: &[InstanceId]) -> Option<ScopeId> {
        self.index.get(path).copied()
    }

    /// The enclosing scope, `None` for the root.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.parents[scope.as_raw() as usize]
    }

    /// The instance chain of `scope`, root first.
    pub fn path(&self, scope: ScopeId) -> &[InstanceId] {
        &self.chains[scope.as_raw() as usize]
    }

    /// Number of interned scopes, root included.
    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// Always `false`: the root scope always exists.
    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Joins the instance names of a chain with `separator`.
    pub fn path_name(&self, design: &Design, scope: ScopeId, separator: &str) -> String {
        self.path(scope)
            .iter()
            .map(|i| design.name(design.instance(*i).name))
            .collect::<Vec<_>>()
            .join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_empty_chain() {
        let table = ScopeTable::new();
        assert!(table.path(ScopeId::ROOT).is_empty());
        assert_eq!(table.parent(ScopeId::ROOT), None);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn child_scopes_are_interned() {
        let mut table = ScopeTable::new();
        let a = InstanceId::from_raw(3);
        let b = InstanceId::from_raw(7);
        let sa = table.child(ScopeId::ROOT, a);
        let sab = table.child(sa, b);
        assert_eq!(table.child(ScopeId::ROOT, a), sa);
        assert_eq!(table.path(sab), &[a, b]);
        assert_eq!(table.parent(sab), Some(sa));
        assert_ne!(table.child(ScopeId::ROOT, b), sab);
    }

    #[test]
    fn find_only_returns_known_chains() {
        let mut table = ScopeTable::new();
        let a = InstanceId::from_raw(2);
        let b = InstanceId::from_raw(4);
        let sab = {
            let sa = table.child(ScopeId::ROOT, a);
            table.child(sa, b)
        };
        assert_eq!(table.find(&[]), Some(ScopeId::ROOT));
        assert_eq!(table.find(&[a, b]), Some(sab));
        assert_eq!(table.find(&[b]), None);
    }

    #[test]
    fn same_bit_in_two_scopes_is_two_keys() {
        let mut table = ScopeTable::new();
        let s0 = table.child(ScopeId::ROOT, InstanceId::from_raw(0));
        let s1 = table.child(ScopeId::ROOT, InstanceId::from_raw(1));
        let p = PortId::from_raw(5);
        assert_ne!(QualifiedBit::new(p, s0), QualifiedBit::new(p, s1));
    }
}
