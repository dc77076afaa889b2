//! Port types and directions, interned in a central [`TypeDb`].
//!
//! A type describes the shape of a value (single bit, bit vector, array,
//! tuple) together with its direction. Every distinct descriptor is stored
//! once, so `bits(8, false, Input)` always returns the same [`TypeId`] within
//! a session. This is the width-keyed cache that generic primitive families
//! are declared against.

use std::collections::HashMap;

use crate::ids::TypeId;
use serde::{Deserialize, Serialize};
use strand_common::{Ident, Interner};

/// The direction of a value, as seen from whoever holds the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Consumes a value; must be driven exactly once.
    Input,
    /// Produces a value; may be read any number of times.
    Output,
    /// Both produces and consumes.
    InOut,
    /// No direction has been assigned.
    Undirected,
}

impl Direction {
    const ALL: [Direction; 4] = [
        Direction::Input,
        Direction::Output,
        Direction::InOut,
        Direction::Undirected,
    ];

    /// Swaps `Input` and `Output`; `InOut` and `Undirected` are unchanged.
    pub fn flip(self) -> Self {
        match self {
            Direction::Input => Direction::Output,
            Direction::Output => Direction::Input,
            other => other,
        }
    }

    /// Returns `true` if a port with this direction may be a wiring destination.
    pub fn is_consumer(self) -> bool {
        matches!(self, Direction::Input | Direction::InOut)
    }

    /// Returns `true` if a port with this direction may be a wiring source.
    pub fn is_producer(self) -> bool {
        matches!(self, Direction::Output | Direction::InOut)
    }

    /// Returns `true` unless the direction is `Undirected`.
    pub fn is_resolved(self) -> bool {
        self != Direction::Undirected
    }

    fn index(self) -> usize {
        match self {
            Direction::Input => 0,
            Direction::Output => 1,
            Direction::InOut => 2,
            Direction::Undirected => 3,
        }
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// A single bit.
    Bit {
        /// Direction of the bit.
        direction: Direction,
    },
    /// A bit vector; its elements are `Bit`s of the same direction.
    Bits {
        /// Number of bits.
        width: u32,
        /// Whether the vector is interpreted as two's complement.
        signed: bool,
        /// Direction of every bit.
        direction: Direction,
    },
    /// A fixed-length sequence; its direction is the element's.
    Array {
        /// Element type.
        element: TypeId,
        /// Number of elements.
        len: u32,
    },
    /// Named fields; its direction is the common direction of the fields.
    Tuple {
        /// Field names and types in declaration order.
        fields: Vec<(Ident, TypeId)>,
    },
}

/// Central type database.
///
/// Owned by the construction session; created with the session and dropped
/// with it.
#[derive(Debug, Clone)]
pub struct TypeDb {
    types: Vec<Type>,
    index: HashMap<Type, TypeId>,
    bit_ids: [TypeId; 4],
}

impl Default for TypeDb {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeDb {
    /// Creates a type database with the four `Bit` types pre-interned.
    pub fn new() -> Self {
        let mut db = Self {
            types: Vec::new(),
            index: HashMap::new(),
            bit_ids: [TypeId::from_raw(0); 4],
        };
        for direction in Direction::ALL {
            let id = db.intern(Type::Bit { direction });
            db.bit_ids[direction.index()] = id;
        }
        db
    }

    /// Interns a type, returning the existing ID for an identical descriptor.
    pub fn intern(&mut self, ty: Type) -> TypeId {
        if let Some(&id) = self.index.get(&ty) {
            return id;
        }
        let id = TypeId::from_raw(self.types.len() as u32);
        self.types.push(ty.clone());
        self.index.insert(ty, id);
        id
    }

    /// Returns the type with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.as_raw() as usize]
    }

    /// Returns the number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always `false`: the bit types are interned on construction.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// A single bit with the given direction.
    pub fn bit(&self, direction: Direction) -> TypeId {
        self.bit_ids[direction.index()]
    }

    /// A bit vector of `width` bits.
    pub fn bits(&mut self, width: u32, signed: bool, direction: Direction) -> TypeId {
        self.intern(Type::Bits {
            width,
            signed,
            direction,
        })
    }

    /// An array of `len` elements of type `element`.
    pub fn array(&mut self, element: TypeId, len: u32) -> TypeId {
        self.intern(Type::Array { element, len })
    }

    /// A tuple of named fields.
    pub fn tuple(&mut self, fields: Vec<(Ident, TypeId)>) -> TypeId {
        self.intern(Type::Tuple { fields })
    }

    /// Returns the direction of a type.
    ///
    /// Arrays take their element's direction; tuples whose fields disagree
    /// are `Undirected`.
    pub fn direction(&self, id: TypeId) -> Direction {
        match self.get(id) {
            Type::Bit { direction } | Type::Bits { direction, .. } => *direction,
            Type::Array { element, .. } => self.direction(*element),
            Type::Tuple { fields } => {
                let mut dirs = fields.iter().map(|(_, t)| self.direction(*t));
                match dirs.next() {
                    Some(first) if dirs.all(|d| d == first) => first,
                    _ => Direction::Undirected,
                }
            }
        }
    }

    /// Returns the element types of a composite type, or an empty list for `Bit`.
    pub fn elements(&self, id: TypeId) -> Vec<TypeId> {
        match self.get(id) {
            Type::Bit { .. } => Vec::new(),
            Type::Bits {
                width, direction, ..
            } => vec![self.bit(*direction); *width as usize],
            Type::Array { element, len } => vec![*element; *len as usize],
            Type::Tuple { fields } => fields.iter().map(|(_, t)| *t).collect(),
        }
    }

    /// Returns the element count of a composite type, `None` for `Bit`.
    pub fn len_of(&self, id: TypeId) -> Option<u32> {
        match self.get(id) {
            Type::Bit { .. } => None,
            Type::Bits { width, .. } => Some(*width),
            Type::Array { len, .. } => Some(*len),
            Type::Tuple { fields } => Some(fields.len() as u32),
        }
    }

    /// Returns `true` for array-like types (`Bits` and `Array`).
    pub fn is_array(&self, id: TypeId) -> bool {
        matches!(self.get(id), Type::Bits { .. } | Type::Array { .. })
    }

    /// Returns the field name at `index` if the type is a tuple.
    pub fn field_name(&self, id: TypeId, index: u32) -> Option<Ident> {
        match self.get(id) {
            Type::Tuple { fields } => fields.get(index as usize).map(|(n, _)| *n),
            _ => None,
        }
    }

    /// Returns the type with every direction replaced by `direction`.
    pub fn qualify(&mut self, id: TypeId, direction: Direction) -> TypeId {
        self.map_directions(id, &|_| direction)
    }

    /// Returns the type with `Input` and `Output` swapped throughout.
    pub fn flip(&mut self, id: TypeId) -> TypeId {
        self.map_directions(id, &Direction::flip)
    }

    fn map_directions(&mut self, id: TypeId, f: &dyn Fn(Direction) -> Direction) -> TypeId {
        match self.get(id).clone() {
            Type::Bit { direction } => self.bit(f(direction)),
            Type::Bits {
                width,
                signed,
                direction,
            } => self.bits(width, signed, f(direction)),
            Type::Array { element, len } => {
                let element = self.map_directions(element, f);
                self.array(element, len)
            }
            Type::Tuple { fields } => {
                let fields = fields
                    .into_iter()
                    .map(|(name, t)| (name, self.map_directions(t, f)))
                    .collect();
                self.tuple(fields)
            }
        }
    }

    /// Returns `true` if two types have the same shape.
    ///
    /// Directions and signedness are ignored; `Bits(n)` and an array of `n`
    /// bits are interchangeable.
    pub fn same_shape(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        match (self.get(a), self.get(b)) {
            (Type::Bit { .. }, Type::Bit { .. }) => true,
            (Type::Tuple { fields: fa }, Type::Tuple { fields: fb }) => {
                fa.len() == fb.len()
                    && fa
                        .iter()
                        .zip(fb)
                        .all(|((na, ta), (nb, tb))| na == nb && self.same_shape(*ta, *tb))
            }
            (Type::Tuple { .. }, _) | (_, Type::Tuple { .. }) => false,
            (Type::Bit { .. }, _) | (_, Type::Bit { .. }) => false,
            _ => {
                self.len_of(a) == self.len_of(b)
                    && match (self.elements(a).first(), self.elements(b).first()) {
                        (Some(ea), Some(eb)) => self.same_shape(*ea, *eb),
                        _ => true,
                    }
            }
        }
    }

    /// Returns the total number of bits in a type.
    pub fn bit_width(&self, id: TypeId) -> u32 {
        match self.get(id) {
            Type::Bit { .. } => 1,
            Type::Bits { width, .. } => *width,
            Type::Array { element, len } => self.bit_width(*element) * len,
            Type::Tuple { fields } => fields.iter().map(|(_, t)| self.bit_width(*t)).sum(),
        }
    }

    /// Renders a type for diagnostics, e.g. `In(Array[2, Bit])`.
    pub fn display(&self, id: TypeId, interner: &Interner) -> String {
        let shape = self.display_shape(id, interner);
        match self.direction(id) {
            Direction::Input => format!("In({shape})"),
            Direction::Output => format!("Out({shape})"),
            Direction::InOut => format!("InOut({shape})"),
            Direction::Undirected => shape,
        }
    }

    fn display_shape(&self, id: TypeId, interner: &Interner) -> String {
        match self.get(id) {
            Type::Bit { .. } => "Bit".to_string(),
            Type::Bits {
                width,
                signed: true,
                ..
            } => format!("SInt({width})"),
            Type::Bits { width, .. } => format!("Bits({width})"),
            Type::Array { element, len } => {
                format!("Array[{len}, {}]", self.display_shape(*element, interner))
            }
            Type::Tuple { fields } => {
                let inner: Vec<String> = fields
                    .iter()
                    .map(|(n, t)| format!("{}: {}", interner.resolve(*n), self.display(*t, interner)))
                    .collect();
                format!("Tuple({})", inner.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flip_is_an_involution() {
        for d in Direction::ALL {
            assert_eq!(d.flip().flip(), d);
        }
        assert_eq!(Direction::Input.flip(), Direction::Output);
        assert_eq!(Direction::InOut.flip(), Direction::InOut);
        assert_eq!(Direction::Undirected.flip(), Direction::Undirected);
    }

    #[test]
    fn intern_deduplicates_widths() {
        let mut db = TypeDb::new();
        let a = db.bits(8, false, Direction::Input);
        let b = db.bits(8, false, Direction::Input);
        let c = db.bits(8, true, Direction::Input);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn array_direction_follows_element() {
        let mut db = TypeDb::new();
        let arr = db.array(db.bit(Direction::Input), 4);
        assert_eq!(db.direction(arr), Direction::Input);
        assert_eq!(db.elements(arr).len(), 4);
        assert_eq!(db.len_of(arr), Some(4));
    }

    #[test]
    fn flip_recurses_into_arrays() {
        let mut db = TypeDb::new();
        let inner = db.array(db.bit(Direction::Input), 2);
        let outer = db.array(inner, 3);
        let flipped = db.flip(outer);
        assert_eq!(db.direction(flipped), Direction::Output);
        assert_eq!(db.flip(flipped), outer);
    }

    #[test]
    fn qualify_overrides_direction() {
        let mut db = TypeDb::new();
        let plain = db.bits(4, false, Direction::Undirected);
        let input = db.qualify(plain, Direction::Input);
        assert_eq!(db.direction(input), Direction::Input);
        assert_eq!(db.elements(input)[0], db.bit(Direction::Input));
    }

    #[test]
    fn mixed_tuple_is_undirected() {
        let mut db = TypeDb::new();
        let fields = vec![
            (Ident::from_raw(0), db.bit(Direction::Input)),
            (Ident::from_raw(1), db.bit(Direction::Output)),
        ];
        let t = db.tuple(fields);
        assert_eq!(db.direction(t), Direction::Undirected);
        let q = db.qualify(t, Direction::Output);
        assert_eq!(db.direction(q), Direction::Output);
    }

    #[test]
    fn same_shape_ignores_direction_and_sign() {
        let mut db = TypeDb::new();
        let a = db.bits(4, false, Direction::Input);
        let b = db.bits(4, true, Direction::Output);
        let arr = db.array(db.bit(Direction::Output), 4);
        let c = db.bits(5, false, Direction::Output);
        assert!(db.same_shape(a, b));
        assert!(db.same_shape(a, arr));
        assert!(!db.same_shape(a, c));
        assert!(!db.same_shape(a, db.bit(Direction::Input)));
    }

    #[test]
    fn bit_width_of_nested_array() {
        let mut db = TypeDb::new();
        let byte = db.bits(8, false, Direction::Input);
        let arr = db.array(byte, 4);
        assert_eq!(db.bit_width(arr), 32);
    }

    #[test]
    fn display_types() {
        let interner = Interner::new();
        let mut db = TypeDb::new();
        let arr = db.array(db.bit(Direction::Input), 2);
        assert_eq!(db.display(arr, &interner), "In(Array[2, Bit])");
        let s = db.bits(3, true, Direction::Output);
        assert_eq!(db.display(s, &interner), "Out(SInt(3))");
    }

    #[test]
    fn type_serde_roundtrip() {
        let ty = Type::Bits {
            width: 16,
            signed: false,
            direction: Direction::Output,
        };
        let json = serde_json::to_string(&ty).unwrap();
        let restored: Type = serde_json::from_str(&json).unwrap();
        assert_eq!(ty, restored);
    }
}
