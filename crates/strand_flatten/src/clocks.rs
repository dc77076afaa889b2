//! Default wiring of clock-category ports.

use strand_ir::{CircuitId, Design, Direction, PortId};

use crate::error::FlattenError;
use crate::hierarchy::definition_order;

/// Clock-category names wired from a definition's boundary by default.
pub const DEFAULT_CLOCKS: [&str; 4] = ["CLK", "RESET", "SET", "CE"];

/// Wires every undriven clock input of every instance below `top` from the
/// same-named boundary input of the definition it is placed in.
///
/// Definitions are visited children first, so a clock introduced at the top
/// reaches every level whose boundary declares it. Every wire is checked
/// before the first is made; if any definition is already sealed nothing is
/// wired. Returns the number of wires made.
pub fn setup_clocks(design: &mut Design, top: CircuitId) -> Result<usize, FlattenError> {
    let mut links = Vec::new();
    for circuit in definition_order(design, top)? {
        links.extend(clock_links(design, circuit)?);
    }
    for &(src, dst) in &links {
        design.check_wire(src, dst)?;
    }
    for &(src, dst) in &links {
        design.wire(src, dst)?;
    }
    tracing::debug!(circuit = design.circuit_name(top), wires = links.len(), "setup clocks");
    Ok(links.len())
}

fn clock_links(design: &Design, circuit: CircuitId) -> Result<Vec<(PortId, PortId)>, FlattenError> {
    let body = design.body(circuit)?;
    let mut links = Vec::new();
    for name in DEFAULT_CLOCKS {
        let Some(ident) = design.interner.get(name) else {
            continue;
        };
        // Inside the body a declared input reads as a producer.
        let Some(src) = body.interface.get(ident) else {
            continue;
        };
        if src.direction != Direction::Output {
            continue;
        }
        for &inst in &body.instances {
            let Some(dst) = design.instance(inst).interface.get(ident) else {
                continue;
            };
            if dst.direction == Direction::Input
                && !design.is_driven(dst.port)
                && design.types.same_shape(src.ty, dst.ty)
            {
                links.push((src.port, dst.port));
            }
        }
    }
    Ok(links)
}
