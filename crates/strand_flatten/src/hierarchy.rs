//! The instantiation graph of a definition.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use strand_ir::{CircuitId, Design};

use crate::error::FlattenError;

/// Builds the graph of definitions reachable from `top`, with an edge from
/// each definition to every definition it instantiates.
pub fn instantiation_graph(
    design: &Design,
    top: CircuitId,
) -> Result<DiGraphMap<CircuitId, ()>, FlattenError> {
    let mut graph = DiGraphMap::new();
    let mut stack = vec![top];
    graph.add_node(top);
    while let Some(parent) = stack.pop() {
        for &inst in &design.body(parent)?.instances {
            let child = design.instance(inst).circuit;
            if design.is_primitive(child) {
                continue;
            }
            if child == parent {
                return Err(FlattenError::RecursiveHierarchy {
                    circuit: design.circuit_name(child).to_string(),
                });
            }
            if !graph.contains_node(child) {
                stack.push(child);
            }
            graph.add_edge(parent, child, ());
        }
    }
    Ok(graph)
}

/// Returns every definition reachable from `top`, children before parents
/// and `top` last.
///
/// Fails with [`FlattenError::RecursiveHierarchy`] if any definition
/// instantiates itself.
pub fn definition_order(design: &Design, top: CircuitId) -> Result<Vec<CircuitId>, FlattenError> {
    if design.is_primitive(top) {
        return Err(FlattenError::NotADefinition {
            name: design.circuit_name(top).to_string(),
        });
    }
    let graph = instantiation_graph(design, top)?;
    let mut order = toposort(&graph, None).map_err(|cycle| FlattenError::RecursiveHierarchy {
        circuit: design.circuit_name(cycle.node_id()).to_string(),
    })?;
    order.reverse();
    Ok(order)
}
