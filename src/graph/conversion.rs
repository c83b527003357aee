use super::definition::Graph;
use crate::error::GraphConversionError;

/// A trait for editor data models that can be converted into a kodo `Graph`.
///
/// This is the seam between a concrete editor (and its document format) and the
/// compiler/layout engine. Implement it on your own scene structs to hand them
/// to kodo.
///
/// # Example
///
/// ```rust,no_run
/// use kodo::prelude::*;
/// use kodo::error::GraphConversionError;
///
/// struct MyNode { id: String, type_name: String, data: Option<String>, x: f64, y: f64 }
/// struct MyScene { nodes: Vec<MyNode>, links: Vec<(String, String)> }
///
/// impl IntoGraph for MyScene {
///     fn into_graph(self) -> Result<Graph, GraphConversionError> {
///         let mut graph = Graph::new();
///         for node in self.nodes {
///             let kind = NodeKind::from_type_name(&node.type_name, node.data.as_deref());
///             graph.add_node(GraphNode::new(
///                 node.id,
///                 kind,
///                 Point::new(node.x, node.y),
///                 Size::new(120.0, 60.0),
///             ));
///         }
///         for (parent, child) in self.links {
///             graph.connect(parent, child);
///         }
///         Ok(graph)
///     }
/// }
/// ```
pub trait IntoGraph {
    /// Consumes the object and converts it into a kodo graph.
    fn into_graph(self) -> Result<Graph, GraphConversionError>;
}

impl IntoGraph for Graph {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        Ok(self)
    }
}
