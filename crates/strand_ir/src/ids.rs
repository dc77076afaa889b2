//! Opaque ID newtypes for IR entities.
//!
//! Each ID is a thin `u32` wrapper that is `Copy`, `Hash`, and `Serialize`/`Deserialize`.

use crate::arena::ArenaId;
use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an ID from a raw `u32` index.
            pub fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ArenaId for $name {
            fn from_raw(index: u32) -> Self {
                Self(index)
            }

            fn as_raw(self) -> u32 {
                self.0
            }
        }
    };
}

define_id!(
    /// Handle to a bit-level value (port, element or anonymous net).
    PortId
);

define_id!(
    /// Handle to a circuit type: a primitive or a definition.
    CircuitId
);

define_id!(
    /// Handle to a placement of a circuit inside a definition.
    InstanceId
);

define_id!(
    /// Handle to an interned [`Type`](crate::types::Type).
    TypeId
);

define_id!(
    /// Handle to an interned chain of instance placements.
    ScopeId
);

impl ScopeId {
    /// The empty scope: the top-level definition itself.
    pub const ROOT: ScopeId = ScopeId(0);
}
