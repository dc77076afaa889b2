//! Four-state logic literals carried by constant ports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single 4-state logic value following IEEE 1164.
///
/// Constant ports carry one of these per bit instead of a driving link.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Logic low (0).
    Zero = 0,
    /// Logic high (1).
    One = 1,
    /// Unknown or uninitialized.
    X = 2,
    /// High-impedance (tri-state).
    Z = 3,
}

impl Logic {
    /// Converts a boolean to `One`/`Zero`.
    pub fn from_bool(b: bool) -> Self {
        if b {
            Logic::One
        } else {
            Logic::Zero
        }
    }

    /// Returns bit `index` of `value` as a logic level.
    pub fn bit_of(value: u64, index: u32) -> Self {
        Self::from_bool(index < 64 && (value >> index) & 1 == 1)
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Zero => write!(f, "0"),
            Logic::One => write!(f, "1"),
            Logic::X => write!(f, "X"),
            Logic::Z => write!(f, "Z"),
        }
    }
}
