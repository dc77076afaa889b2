//! Width-parameterized primitive families.

use crate::design::Design;
use crate::error::IrError;
use crate::ids::CircuitId;

/// Cache key of a primitive family member.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct FamilyKey {
    name: String,
    width: u32,
    signed: bool,
}

impl Design {
    /// Returns the `(name, width, signed)` member of a primitive family,
    /// declaring it with `build` the first time it is requested.
    ///
    /// ```
    /// use strand_ir::{Design, Direction};
    ///
    /// let mut d = Design::new();
    /// let mut declare = |d: &mut Design| {
    ///     let i = d.types.bits(8, false, Direction::Input);
    ///     let o = d.types.bits(8, false, Direction::Output);
    ///     d.declare_primitive("Add8", &[("I0", i), ("I1", i), ("O", o)])
    /// };
    /// let a = d.primitive_family("Add", 8, false, &mut declare).unwrap();
    /// let b = d.primitive_family("Add", 8, false, &mut declare).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn primitive_family<F>(
        &mut self,
        name: &str,
        width: u32,
        signed: bool,
        build: F,
    ) -> Result<CircuitId, IrError>
    where
        F: FnOnce(&mut Design) -> Result<CircuitId, IrError>,
    {
        let key = FamilyKey {
            name: name.to_string(),
            width,
            signed,
        };
        if let Some(&id) = self.families.get(&key) {
            return Ok(id);
        }
        let id = build(self)?;
        tracing::debug!(family = name, width, signed, circuit = %self.circuit_name(id), "declare family member");
        self.families.insert(key, id);
        Ok(id)
    }
}
