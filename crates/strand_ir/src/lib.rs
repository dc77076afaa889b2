//! Typed hierarchical netlist IR.
//!
//! A netlist is built inside a [`Design`] session: declare primitives and
//! definitions with directed interfaces, place [`Instance`]s of them inside
//! definitions, and [`wire`](Design::wire) outputs to inputs. Every consumer
//! bit has at most one driver; constant ports carry a literal instead.
//!
//! # Usage
//!
//! ```
//! use strand_ir::{Design, Direction};
//!
//! let mut d = Design::new();
//! let i = d.types.bit(Direction::Input);
//! let o = d.types.bit(Direction::Output);
//! let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)])?;
//! let top = d.define_circuit("main", &[("I", i), ("O", o)])?;
//! let u = d.instantiate(top, inv, &[])?;
//! d.wire(d.boundary(top, "I")?, d.port_of(u, "I")?)?;
//! d.wire(d.port_of(u, "O")?, d.boundary(top, "O")?)?;
//! d.end_circuit(top)?;
//! d.check_wired(top)?;
//! # Ok::<(), strand_ir::IrError>(())
//! ```
//!
//! # Modules
//!
//! - `types`: directions and interned type descriptors
//! - `port`: references, ports and driving links
//! - `interface`: ordered name-to-port maps
//! - `circuit`: primitives, definitions and instances
//! - `design`: the construction session
//! - `wire`: wiring and value resolution
//! - `anon`: anonymous circuits and positional application
//! - `scope`: scope-qualified keys
//! - `check`: wiring completeness and listings
//! - `library`: width-parameterized primitive families
//! - `fingerprint`: structural hashing

#![warn(missing_docs)]

pub mod anon;
pub mod arena;
pub mod check;
pub mod circuit;
pub mod const_value;
pub mod debug;
pub mod design;
pub mod error;
pub mod fingerprint;
pub mod ids;
pub mod interface;
pub mod library;
pub mod port;
pub mod scope;
pub mod types;
pub mod wire;

pub use anon::AnonymousCircuit;
pub use arena::{Arena, ArenaId};
pub use circuit::{Body, Circuit, CircuitKind, Instance};
pub use const_value::ConstValue;
pub use debug::DebugInfo;
pub use design::Design;
pub use error::IrError;
pub use ids::{CircuitId, InstanceId, PortId, ScopeId, TypeId};
pub use interface::{Interface, InterfacePort, PortClass, CLOCK_NAMES};
pub use port::{Driver, Port, PortRef};
pub use scope::{QualifiedBit, QualifiedInstance, ScopeTable};
pub use types::{Direction, Type, TypeDb};
