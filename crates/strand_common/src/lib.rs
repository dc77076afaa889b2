//! Shared foundational types used across the strand netlist toolkit.
//!
//! This crate provides interned identifiers for port and circuit names,
//! 4-state logic literals for constant ports, structural content hashing,
//! and the internal-error type raised when an IR invariant is broken.

#![warn(missing_docs)]

pub mod hash;
pub mod ident;
pub mod logic;
pub mod result;

pub use hash::{ContentHash, ContentHasher};
pub use ident::{Ident, Interner};
pub use logic::Logic;
pub use result::InternalError;
