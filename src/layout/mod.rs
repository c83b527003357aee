//! Automatic tree layout for the editor canvas.
//!
//! Nodes are placed depth-first, level by level. A registry of the nodes
//! already placed on each level keeps every new subtree to the right of what is
//! already laid out, and parents are centered over their children afterwards.
//! This is a placement heuristic: subtrees that only meet several levels down
//! can still overlap.

use crate::error::StructuralError;
use crate::graph::{Graph, NodeId, Point, SceneRect, find_roots, get_children};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use tracing::{debug, warn};

pub mod forces;

/// Spacing constants of the layout. The defaults match the editor's look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Base horizontal gap. Siblings are advanced by twice this value, the last
    /// node of the same level is cleared by twice it, the last node of the next
    /// level by three times it.
    pub sibling_spacing: f64,
    /// Vertical gap between the bottom of a parent and the top of its children.
    pub level_gap: f64,
    /// Where the first root is placed by a whole-tree layout.
    pub origin: Point,
    /// Margin added around the nodes when fitting the canvas.
    pub canvas_margin: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sibling_spacing: 15.0,
            level_gap: 100.0,
            origin: Point::new(10.0, 10.0),
            canvas_margin: 30.0,
        }
    }
}

impl LayoutConfig {
    /// Horizontal distance between the right edge of a child and the left edge
    /// of its next sibling.
    pub fn child_advance(&self) -> f64 {
        2.0 * self.sibling_spacing
    }

    fn same_level_margin(&self) -> f64 {
        2.0 * self.sibling_spacing
    }

    fn next_level_margin(&self) -> f64 {
        3.0 * self.sibling_spacing
    }
}

/// Nodes already placed, per level, in placement order.
pub type LevelRegistry = AHashMap<usize, Vec<NodeId>>;

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out every tree in the graph, one root after the other, then fits the
    /// canvas around the result.
    ///
    /// Roots are taken top to bottom, and roots sharing a row left to right, so
    /// a second call keeps the order the first one produced.
    pub fn reorder(&self, graph: &mut Graph) {
        let roots: Vec<NodeId> = find_roots(graph)
            .into_iter()
            .sorted_by(|a, b| {
                a.position
                    .y
                    .total_cmp(&b.position.y)
                    .then_with(|| a.position.x.total_cmp(&b.position.x))
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|n| n.id.clone())
            .collect();
        let mut pass = LayoutPass::new(&self.config, None, Some(0.0));
        for root in &roots {
            pass.place(graph, root, self.config.origin, 0);
        }
        debug!(roots = roots.len(), placed = pass.placed.len(), "whole-tree layout done");
        self.fit_scene(graph);
    }

    /// Reflows the subtree below `anchor` without moving `anchor` itself.
    pub fn reorder_subtree(&self, graph: &mut Graph, anchor: &NodeId) -> Result<(), StructuralError> {
        let cursor = graph
            .position(anchor)
            .ok_or_else(|| StructuralError::NodeNotFound {
                node_id: anchor.clone(),
            })?;
        let mut pass = LayoutPass::new(&self.config, Some(anchor), None);
        pass.place(graph, anchor, cursor, 0);
        debug!(anchor = %anchor, placed = pass.placed.len(), "subtree layout done");
        self.fit_scene(graph);
        Ok(())
    }

    /// Resizes the canvas to the bounding box of all nodes plus the margin.
    pub fn fit_scene(&self, graph: &mut Graph) {
        let (right, bottom) = graph
            .nodes
            .iter()
            .fold((0.0_f64, 0.0_f64), |(right, bottom), n| {
                (right.max(n.right()), bottom.max(n.bottom()))
            });
        let margin = self.config.canvas_margin;
        graph.set_scene_rect(SceneRect {
            x: -margin,
            y: -margin,
            width: right + 2.0 * margin,
            height: bottom + 2.0 * margin,
        });
    }
}

/// State shared by the recursion of one layout call.
struct LayoutPass<'c> {
    config: &'c LayoutConfig,
    anchor: Option<&'c NodeId>,
    /// Leftmost x for the first node of a level. `None` lets it start at the cursor.
    left_edge: Option<f64>,
    registry: LevelRegistry,
    placed: AHashSet<NodeId>,
}

impl<'c> LayoutPass<'c> {
    fn new(config: &'c LayoutConfig, anchor: Option<&'c NodeId>, left_edge: Option<f64>) -> Self {
        Self {
            config,
            anchor,
            left_edge,
            registry: LevelRegistry::default(),
            placed: AHashSet::new(),
        }
    }

    /// Right edge of the last node placed on `level`, if any.
    fn last_right(&self, graph: &Graph, level: usize) -> Option<f64> {
        self.registry
            .get(&level)
            .and_then(|nodes| nodes.last())
            .and_then(|id| graph.node(id))
            .map(|n| n.right())
    }

    fn place(&mut self, graph: &mut Graph, node_id: &NodeId, mut cursor: Point, level: usize) {
        let Some(size) = graph.size(node_id) else {
            return;
        };
        if !self.placed.insert(node_id.clone()) {
            warn!(node = %node_id, "node reached twice during layout, keeping its first placement");
            return;
        }

        let children: Vec<(NodeId, f64)> = get_children(graph, node_id)
            .into_iter()
            .map(|c| (c.id.clone(), c.size.width))
            .collect();
        let spacing = self.config.sibling_spacing;
        let total_width: f64 = children.iter().map(|(_, w)| w + spacing).sum();

        let clearance = self
            .last_right(graph, level)
            .map(|right| right + self.config.same_level_margin());
        let same_level = clearance.or(self.left_edge).unwrap_or(cursor.x);
        let next_level = self
            .last_right(graph, level + 1)
            .map_or(cursor.x, |right| right + self.config.next_level_margin());
        cursor.x = cursor.x.max(same_level).max(next_level);

        let is_anchor = self.anchor == Some(node_id);
        if !is_anchor {
            graph.set_position(node_id, cursor);
        }
        self.registry.entry(level).or_default().push(node_id.clone());
        debug!(node = %node_id, level, x = cursor.x, y = cursor.y, "placed");

        let mut child_cursor = Point::new(cursor.x, cursor.y + size.height + self.config.level_gap);
        if children.len() > 1 {
            child_cursor.x = cursor.x - total_width * 0.5;
        }
        for (child_id, width) in &children {
            self.place(graph, child_id, child_cursor, level + 1);
            child_cursor.x += width + self.config.child_advance();
        }

        if is_anchor {
            return;
        }
        match children.as_slice() {
            [] => {}
            [(only, _)] => {
                if let Some(child) = graph.node(only) {
                    let centered = child.position.x + child.size.width / 2.0 - size.width / 2.0;
                    // Never left of the node placed before it on this level.
                    let x = clearance.map_or(centered, |min_x| centered.max(min_x));
                    graph.set_position(node_id, Point::new(x, cursor.y));
                }
            }
            [(first, _), .., (last, _)] => {
                let span = graph
                    .position(first)
                    .zip(graph.node(last).map(|n| n.right()));
                if let Some((first_pos, last_right)) = span {
                    let x = (first_pos.x + last_right) * 0.5 - size.width / 2.0;
                    // Parents only ever move right to center over their children.
                    if x > cursor.x {
                        graph.set_position(node_id, Point::new(x, cursor.y));
                    }
                }
            }
        }
    }
}
