//! The braid combinator and its derived forms.
//!
//! `braid` takes a list of circuits with identical interfaces and combines
//! them port name by port name. Each name is forked, joined, flattened or
//! chained according to [`BraidArgs`]; the result is a new anonymous circuit.

use std::collections::HashMap;

use strand_ir::{AnonymousCircuit, Design, Direction, PortClass, PortId};

use crate::args::BraidArgs;
use crate::error::BraidError;

/// How one port name is combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plan<'a> {
    Chain {
        oarg: &'a str,
        reverse: bool,
        scan: bool,
    },
    Fork,
    Join,
    Flat,
}

/// Combines `circuits` port by port.
///
/// The whole plan is validated before the first wire is made: an empty list,
/// mismatched interfaces, unknown or doubly classified names, non-array flat
/// ports and any wire that would fail are all reported without side effects.
pub fn braid(
    design: &mut Design,
    circuits: &[AnonymousCircuit],
    args: &BraidArgs,
) -> Result<AnonymousCircuit, BraidError> {
    let first = circuits.first().ok_or(BraidError::Empty)?;
    check_shapes(design, circuits)?;
    let plans = classify(design, first, args)?;

    let mut order: Vec<(String, Plan<'_>)> = Vec::new();
    for name in first.interface.names().map(|n| design.name(n)) {
        let consumed = plans
            .values()
            .any(|p| matches!(p, Plan::Chain { oarg, .. } if *oarg == name));
        if consumed {
            continue;
        }
        let plan = match plans.get(name) {
            Some(&plan) => plan,
            None => default_plan(design, first, name, args.fork_clocks),
        };
        order.push((name.to_string(), plan));
    }
    for (name, plan) in &order {
        check_plan(design, circuits, name, *plan)?;
    }

    tracing::debug!(circuits = circuits.len(), ports = order.len(), "braid");

    let mut exposed: Vec<(String, PortId)> = Vec::new();
    for (name, plan) in &order {
        let ports = column(design, circuits, name)?;
        match *plan {
            Plan::Chain {
                oarg,
                reverse,
                scan,
            } => {
                let outs = column(design, circuits, oarg)?;
                for (src, dst) in chain_links(&ports, &outs, reverse) {
                    design.wire(src, dst)?;
                }
                // Both directions expose the first input and the last output.
                let oport = if scan {
                    design.array(&outs)?
                } else {
                    outs[outs.len() - 1]
                };
                exposed.push((name.clone(), ports[0]));
                exposed.push((oarg.to_string(), oport));
            }
            Plan::Fork => {
                let ty = design.port(ports[0]).ty;
                let net = design.anonymous(name, ty);
                for &p in &ports {
                    design.wire(net, p)?;
                }
                exposed.push((name.clone(), net));
            }
            Plan::Join => exposed.push((name.clone(), design.array(&ports)?)),
            Plan::Flat => {
                let elements: Vec<PortId> = ports
                    .iter()
                    .flat_map(|p| design.port(*p).elements.clone())
                    .collect();
                exposed.push((name.clone(), design.array(&elements)?));
            }
        }
    }

    let exposed = exposed
        .into_iter()
        .map(|(n, p)| (design.ident(&n), p))
        .collect();
    Ok(design.anonymous_circuit_from(exposed)?)
}

/// Forks every functional input; everything else is joined.
pub fn fork_all(design: &mut Design, circuits: &[AnonymousCircuit]) -> Result<AnonymousCircuit, BraidError> {
    let first = circuits.first().ok_or(BraidError::Empty)?;
    let mut args = BraidArgs::new();
    for (name, _) in first.interface.input_args() {
        args = args.fork(design.name(name));
    }
    braid(design, circuits, &args)
}

/// Joins every port; clock inputs are still forked.
pub fn join_all(design: &mut Design, circuits: &[AnonymousCircuit]) -> Result<AnonymousCircuit, BraidError> {
    braid(design, circuits, &BraidArgs::new())
}

/// Flattens every functional input; each must be an array.
pub fn flat_all(design: &mut Design, circuits: &[AnonymousCircuit]) -> Result<AnonymousCircuit, BraidError> {
    let first = circuits.first().ok_or(BraidError::Empty)?;
    let mut args = BraidArgs::new();
    for (name, _) in first.interface.input_args() {
        args = args.flat(design.name(name));
    }
    braid(design, circuits, &args)
}

/// Daisy-chains `oarg` into `iarg` left to right, exposing the ends.
pub fn fold(
    design: &mut Design,
    circuits: &[AnonymousCircuit],
    iarg: &str,
    oarg: &str,
) -> Result<AnonymousCircuit, BraidError> {
    braid(design, circuits, &BraidArgs::new().fold(iarg, oarg))
}

/// Daisy-chains `oarg` into `iarg` left to right, exposing every output.
pub fn scan(
    design: &mut Design,
    circuits: &[AnonymousCircuit],
    iarg: &str,
    oarg: &str,
) -> Result<AnonymousCircuit, BraidError> {
    braid(design, circuits, &BraidArgs::new().scan(iarg, oarg))
}

fn chain_links(ins: &[PortId], outs: &[PortId], reverse: bool) -> Vec<(PortId, PortId)> {
    (0..ins.len().saturating_sub(1))
        .map(|i| {
            if reverse {
                (outs[i + 1], ins[i])
            } else {
                (outs[i], ins[i + 1])
            }
        })
        .collect()
}

/// Every circuit's port named `name`, in list order.
fn column(design: &Design, circuits: &[AnonymousCircuit], name: &str) -> Result<Vec<PortId>, BraidError> {
    circuits
        .iter()
        .map(|c| {
            design
                .interner
                .get(name)
                .and_then(|n| c.port(n))
                .ok_or_else(|| BraidError::UnknownPort {
                    name: name.to_string(),
                })
        })
        .collect()
}

fn check_shapes(design: &Design, circuits: &[AnonymousCircuit]) -> Result<(), BraidError> {
    let Some((first, rest)) = circuits.split_first() else {
        return Err(BraidError::Empty);
    };
    for (offset, c) in rest.iter().enumerate() {
        let index = offset + 1;
        let mismatch = |reason: String| BraidError::InterfaceShapeMismatch { index, reason };
        if c.interface.len() != first.interface.len() {
            return Err(mismatch(format!(
                "expected {} ports, found {}",
                first.interface.len(),
                c.interface.len()
            )));
        }
        for ((na, pa), (nb, pb)) in first.interface.iter().zip(c.interface.iter()) {
            if na != nb {
                return Err(mismatch(format!(
                    "found port `{}` where `{}` was expected",
                    design.name(nb),
                    design.name(na)
                )));
            }
            if pa.direction != pb.direction || !design.types.same_shape(pa.ty, pb.ty) {
                return Err(mismatch(format!(
                    "port `{}` is {}, expected {}",
                    design.name(na),
                    design.types.display(pb.ty, &design.interner),
                    design.types.display(pa.ty, &design.interner)
                )));
            }
        }
    }
    Ok(())
}

fn classify<'a>(
    design: &Design,
    first: &AnonymousCircuit,
    args: &'a BraidArgs,
) -> Result<HashMap<&'a str, Plan<'a>>, BraidError> {
    let mut seen: HashMap<&str, &'static str> = HashMap::new();
    for (name, bucket) in args.slots() {
        if design.interner.get(name).and_then(|n| first.port(n)).is_none() {
            return Err(BraidError::UnknownPort {
                name: name.to_string(),
            });
        }
        if let Some(prev) = seen.insert(name, bucket) {
            return Err(BraidError::AmbiguousClassification {
                name: name.to_string(),
                first: prev,
                second: bucket,
            });
        }
    }

    let mut plans = HashMap::new();
    for (pairs, reverse, scan) in [
        (&args.fold, false, false),
        (&args.rfold, true, false),
        (&args.scan, false, true),
        (&args.rscan, true, true),
    ] {
        for (i, o) in pairs {
            plans.insert(
                i.as_str(),
                Plan::Chain {
                    oarg: o.as_str(),
                    reverse,
                    scan,
                },
            );
        }
    }
    for name in &args.fork {
        plans.entry(name.as_str()).or_insert(Plan::Fork);
    }
    for name in &args.join {
        plans.entry(name.as_str()).or_insert(Plan::Join);
    }
    for name in &args.flat {
        plans.entry(name.as_str()).or_insert(Plan::Flat);
    }
    Ok(plans)
}

fn check_plan(
    design: &Design,
    circuits: &[AnonymousCircuit],
    name: &str,
    plan: Plan<'_>,
) -> Result<(), BraidError> {
    let ports = column(design, circuits, name)?;
    match plan {
        Plan::Chain { oarg, reverse, .. } => {
            let outs = column(design, circuits, oarg)?;
            for (src, dst) in chain_links(&ports, &outs, reverse) {
                design.check_wire(src, dst)?;
            }
        }
        Plan::Fork => {
            for &p in &ports {
                design.check_drivable(p)?;
            }
        }
        Plan::Join => {}
        Plan::Flat => {
            let ty = design.port(ports[0]).ty;
            if !design.types.is_array(ty) {
                return Err(BraidError::NotAnArray {
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// The plan for a name no bucket mentions.
fn default_plan(design: &Design, first: &AnonymousCircuit, name: &str, fork_clocks: bool) -> Plan<'static> {
    let entry = design
        .interner
        .get(name)
        .and_then(|n| first.interface.get(n));
    match entry {
        Some(p) if fork_clocks && p.class == PortClass::Clock && p.direction == Direction::Input => {
            Plan::Fork
        }
        _ => Plan::Join,
    }
}
