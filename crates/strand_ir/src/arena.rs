//! Append-only arena backing ports, circuits and instances.
//!
//! Everything in a [`Design`](crate::Design) that other nodes point at lives in
//! an [`Arena`] and is addressed by a small copyable handle. Handles are lookup
//! keys, never owners, so an instance, its ports and the ports' back-references
//! to the instance cannot form ownership cycles.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Trait for opaque ID types used as arena keys.
pub trait ArenaId: Copy {
    /// Creates an ID from a raw `u32` index.
    fn from_raw(index: u32) -> Self;

    /// Returns the raw `u32` index.
    fn as_raw(self) -> u32;
}

/// A dense, ID-indexed container.
///
/// Items are only ever appended, so IDs stay valid for the lifetime of the
/// arena. Transforms build new nodes next to the old ones instead of
/// rewriting them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arena<I: ArenaId, T> {
    items: Vec<T>,
    #[serde(skip)]
    _marker: PhantomData<I>,
}

impl<I: ArenaId, T> Default for Arena<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: ArenaId, T> Arena<I, T> {
    /// Creates a new, empty arena.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Returns the ID the next [`alloc`](Self::alloc) will hand out.
    pub fn next_id(&self) -> I {
        I::from_raw(self.items.len() as u32)
    }

    /// Allocates a new item in the arena and returns its ID.
    pub fn alloc(&mut self, item: T) -> I {
        let id = self.next_id();
        self.items.push(item);
        id
    }

    /// Returns a reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: I) -> &T {
        &self.items[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the item with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get_mut(&mut self, id: I) -> &mut T {
        &mut self.items[id.as_raw() as usize]
    }

    /// Returns the number of items in the arena.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the arena contains no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over `(ID, &T)` pairs in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &T)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (I::from_raw(i as u32), item))
    }
}

impl<I: ArenaId, T> Index<I> for Arena<I, T> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        self.get(id)
    }
}

impl<I: ArenaId, T> IndexMut<I> for Arena<I, T> {
    fn index_mut(&mut self, id: I) -> &mut T {
        self.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PortId;

    #[test]
    fn alloc_and_get() {
        let mut arena: Arena<PortId, &str> = Arena::new();
        let id = arena.alloc("I0");
        assert_eq!(arena[id], "I0");
    }

    #[test]
    fn next_id_predicts_alloc() {
        let mut arena: Arena<PortId, u32> = Arena::new();
        arena.alloc(1);
        let predicted = arena.next_id();
        let actual = arena.alloc(2);
        assert_eq!(predicted, actual);
    }

    #[test]
    fn get_mut_modifies() {
        let mut arena: Arena<PortId, Option<u32>> = Arena::new();
        let id = arena.alloc(None);
        *arena.get_mut(id) = Some(7);
        assert_eq!(arena[id], Some(7));
    }

    #[test]
    fn iter_ids_are_sequential() {
        let mut arena: Arena<PortId, u32> = Arena::new();
        arena.alloc(100);
        arena.alloc(200);
        let ids: Vec<u32> = arena.iter().map(|(id, _)| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(arena.len(), 2);
        assert!(!arena.is_empty());
    }
}
