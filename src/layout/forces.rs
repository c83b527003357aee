use crate::graph::{Graph, NodeId, Point};
use ahash::AHashSet;

/// Default strength of the repulsion.
pub const DEFAULT_SPEED: f64 = 500.0;

const HORIZONTAL_CLEARANCE: f64 = 30.0;
const VERTICAL_CLEARANCE: f64 = 10.0;

/// One pass of pairwise repulsion between overlapping nodes.
///
/// Every node not in `pinned` is pushed away from each node whose box it
/// overlaps (boxes are widened by a small clearance first), with a strength that
/// falls off with the square of the distance. Nodes that do not overlap are
/// left alone. Nodes sitting exactly on top of each other are pushed to the
/// right. Returns how many nodes moved.
///
/// The editor calls this repeatedly while the user drags nodes around; pinned
/// nodes are the ones under the user's cursor.
pub fn relax_overlaps(graph: &mut Graph, pinned: &AHashSet<NodeId>, speed: f64) -> usize {
    let mut moved = 0;

    for index in 0..graph.nodes.len() {
        let node = &graph.nodes[index];
        if pinned.contains(&node.id) {
            continue;
        }
        let origin = node.position;
        let size = node.size;

        let mut shift = Point::default();
        for (other_index, other) in graph.nodes.iter().enumerate() {
            if other_index == index {
                continue;
            }
            let mut dx = origin.x - other.position.x;
            let dy = origin.y - other.position.y;
            if dx == 0.0 && dy == 0.0 {
                dx = 1.0;
            }

            let width_window = (if dx < 0.0 { size.width } else { other.size.width }) + HORIZONTAL_CLEARANCE;
            let height_window = (if dy < 0.0 { size.height } else { other.size.height }) + VERTICAL_CLEARANCE;
            if dx.abs() > width_window || dy.abs() > height_window {
                continue;
            }

            let l = 2.0 * (dx * dx + dy * dy);
            shift.x += dx * speed / l;
            shift.y += dy * speed / l;
        }

        if shift != Point::default() {
            let node = &mut graph.nodes[index];
            node.position.x += shift.x;
            node.position.y += shift.y;
            moved += 1;
        }
    }

    moved
}
