//! Composition and currying of anonymous circuits.

use strand_ir::{AnonymousCircuit, Design, Direction, PortId};

use crate::error::BraidError;

/// Feeds every functional output of `c2` into the same-named input of `c1`.
///
/// The result exposes the functional inputs of `c2` followed by the
/// functional outputs of `c1`. All wires are checked before any is made.
pub fn compose(
    design: &mut Design,
    c1: &AnonymousCircuit,
    c2: &AnonymousCircuit,
) -> Result<AnonymousCircuit, BraidError> {
    let mut links = Vec::new();
    for (name, out) in c2.interface.output_args() {
        if let Some(entry) = c1.interface.get(name) {
            if entry.direction == Direction::Input {
                links.push((out, entry.port));
            }
        }
    }
    for &(src, dst) in &links {
        design.check_wire(src, dst)?;
    }

    let mut exposed = c2.interface.input_args();
    exposed.extend(c1.interface.output_args());
    let result = design.anonymous_circuit_from(exposed)?;

    tracing::debug!(
        c1 = %design.anon_name(c1),
        c2 = %design.anon_name(c2),
        wires = links.len(),
        "compose"
    );
    for (src, dst) in links {
        design.wire(src, dst)?;
    }
    Ok(result)
}

/// Splits the array input `prefix` into inputs `prefix0 .. prefixN-1`, in
/// place. Every other port keeps its position.
pub fn curry(
    design: &Design,
    circuit: &AnonymousCircuit,
    prefix: &str,
) -> Result<AnonymousCircuit, BraidError> {
    let target = design
        .interner
        .get(prefix)
        .and_then(|n| circuit.interface.get(n))
        .filter(|p| p.direction == Direction::Input)
        .ok_or_else(|| BraidError::UnknownPort {
            name: prefix.to_string(),
        })?;
    if !design.types.is_array(target.ty) {
        return Err(BraidError::NotAnArray {
            name: prefix.to_string(),
        });
    }

    let mut args: Vec<(String, PortId)> = Vec::new();
    for (name, entry) in circuit.interface.iter() {
        if entry.port == target.port {
            for (i, &e) in design.port(entry.port).elements.iter().enumerate() {
                args.push((format!("{prefix}{i}"), e));
            }
        } else {
            args.push((design.name(name).to_string(), entry.port));
        }
    }
    let args = args.into_iter().map(|(n, p)| (design.ident(&n), p)).collect();
    Ok(design.anonymous_circuit_from(args)?)
}

/// Gathers every input whose name starts with `prefix`, in declaration
/// order, into one array input named `prefix` placed first.
pub fn uncurry(
    design: &mut Design,
    circuit: &AnonymousCircuit,
    prefix: &str,
) -> Result<AnonymousCircuit, BraidError> {
    let mut gathered = Vec::new();
    let mut rest = Vec::new();
    for (name, entry) in circuit.interface.iter() {
        if entry.direction == Direction::Input && design.name(name).starts_with(prefix) {
            gathered.push(entry.port);
        } else {
            rest.push((name, entry.port));
        }
    }
    if gathered.is_empty() {
        return Err(BraidError::UnknownPort {
            name: prefix.to_string(),
        });
    }
    let array = design.array(&gathered)?;
    let mut args = vec![(design.ident(prefix), array)];
    args.extend(rest);
    Ok(design.anonymous_circuit_from(args)?)
}
