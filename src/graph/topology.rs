//! Derives the rooted-tree view of a graph: roots, ordered children and parents.
//!
//! Nothing here is cached. Every query walks the current connection set, so the
//! answers always reflect the latest edit.

use super::definition::{Graph, GraphNode, NodeId, PortType};
use crate::error::StructuralError;
use ahash::AHashSet;
use itertools::Itertools;

/// Returns every node without an incoming connection, top to bottom.
///
/// Roots sharing a vertical position keep identifier order.
pub fn find_roots(graph: &Graph) -> Vec<&GraphNode> {
    let targets: AHashSet<&NodeId> = graph
        .connections
        .iter()
        .map(|c| c.node(PortType::In))
        .collect();

    graph
        .nodes
        .iter()
        .filter(|n| !targets.contains(&n.id))
        .sorted_by(|a, b| {
            a.position
                .y
                .total_cmp(&b.position.y)
                .then_with(|| a.id.cmp(&b.id))
        })
        .collect()
}

/// Returns the children of `parent`, left to right.
///
/// Connections pointing at nodes that no longer exist are skipped, and a child
/// connected more than once is listed once. Children sharing a horizontal
/// position keep identifier order, so the result never depends on the order
/// the connections were made in.
pub fn get_children<'g>(graph: &'g Graph, parent: &NodeId) -> Vec<&'g GraphNode> {
    graph
        .connections
        .iter()
        .filter(|c| c.node(PortType::Out) == parent)
        .filter_map(|c| graph.node(c.node(PortType::In)))
        .unique_by(|n| n.id.clone())
        .sorted_by(|a, b| {
            a.position
                .x
                .total_cmp(&b.position.x)
                .then_with(|| a.id.cmp(&b.id))
        })
        .collect()
}

/// Returns the parent of `node`, or `None` for a root.
pub fn get_parent<'g>(graph: &'g Graph, node: &NodeId) -> Option<&'g GraphNode> {
    graph
        .connections
        .iter()
        .filter(|c| c.node(PortType::In) == node)
        .find_map(|c| graph.node(c.node(PortType::Out)))
}

/// Locates the single root of kind `Root`.
///
/// Roots of other kinds (loose nodes the user has not wired up yet) are
/// ignored; they never make the graph invalid.
pub fn find_canonical_root(graph: &Graph) -> Result<&GraphNode, StructuralError> {
    let canonical: Vec<&GraphNode> = find_roots(graph)
        .into_iter()
        .filter(|n| n.kind.is_root())
        .collect();

    match canonical.as_slice() {
        [] => Err(StructuralError::NoValidRoot),
        [root] => Ok(*root),
        many => Err(StructuralError::AmbiguousRoots { count: many.len() }),
    }
}

/// `true` when the graph holds exactly one canonical root.
pub fn is_tree_valid(graph: &Graph) -> bool {
    find_canonical_root(graph).is_ok()
}
