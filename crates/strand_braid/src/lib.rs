//! Braid combinators for the strand netlist IR.
//!
//! A braid takes several circuits with the same interface and combines them
//! into one [`AnonymousCircuit`](strand_ir::AnonymousCircuit): each port name
//! is forked (one shared driver), joined (an array of the individual ports),
//! flattened (one array of all their elements) or chained (an output of one
//! circuit feeds an input of the next). `compose`, `curry` and `uncurry`
//! rearrange single circuits.
//!
//! # Usage
//!
//! ```
//! use strand_braid::{map_n, scan};
//! use strand_ir::{Design, Direction};
//!
//! let mut d = Design::new();
//! let i = d.types.bit(Direction::Input);
//! let o = d.types.bit(Direction::Output);
//! let inv = d.declare_primitive("Inv", &[("I", i), ("O", o)])?;
//! let top = d.define_circuit("chain", &[])?;
//! let stages = map_n(3, || d.instantiate(top, inv, &[]))?;
//! let views: Vec<_> = stages.iter().map(|s| d.view(*s)).collect();
//! let chain = scan(&mut d, &views, "I", "O")?;
//! assert_eq!(chain.interface.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]

pub mod args;
pub mod braid;
pub mod compose;
pub mod error;
pub mod replicate;

pub use args::BraidArgs;
pub use braid::{braid, flat_all, fold, fork_all, join_all, scan};
pub use compose::{compose, curry, uncurry};
pub use error::BraidError;
pub use replicate::{col, map_n, row};
