use crate::backend::RemoteConnector;
use crate::error::{CompileError, StructuralError};
use crate::graph::{Graph, NodeId, find_canonical_root};
use crate::tree::{CompiledHandle, CompiledTree, next_generation};
use std::sync::Arc;
use tracing::debug;

mod builder;

use builder::TreeBuilder;

/// Compiles editor graphs into executable behavior trees.
pub struct TreeCompiler {
    connector: Arc<dyn RemoteConnector>,
    link_back: bool,
}

pub struct CompilerBuilder {
    connector: Arc<dyn RemoteConnector>,
    link_back: bool,
}

impl CompilerBuilder {
    pub fn new(connector: Arc<dyn RemoteConnector>) -> Self {
        Self {
            connector,
            link_back: true,
        }
    }

    /// Whether compiled nodes are linked back onto their graph nodes (on by default).
    pub fn with_link_back(mut self, link_back: bool) -> Self {
        self.link_back = link_back;
        self
    }

    pub fn build(self) -> TreeCompiler {
        TreeCompiler {
            connector: self.connector,
            link_back: self.link_back,
        }
    }
}

impl TreeCompiler {
    pub fn builder(connector: Arc<dyn RemoteConnector>) -> CompilerBuilder {
        CompilerBuilder::new(connector)
    }

    /// Compiles the tree hanging off the graph's canonical root.
    pub fn compile(&self, graph: &mut Graph) -> Result<CompiledTree, CompileError> {
        let root_id = find_canonical_root(graph)?.id.clone();
        self.compile_from(graph, &root_id)
    }

    /// Compiles the subtree rooted at `node_id`, whatever its kind.
    ///
    /// Either the whole subtree compiles or nothing does: graph nodes are only
    /// linked once every node has been built.
    pub fn compile_from(
        &self,
        graph: &mut Graph,
        node_id: &NodeId,
    ) -> Result<CompiledTree, CompileError> {
        if !graph.contains(node_id) {
            return Err(StructuralError::NodeNotFound {
                node_id: node_id.clone(),
            }
            .into());
        }

        let mut builder = TreeBuilder::new(graph, self.connector.as_ref());
        let root = builder.build(node_id)?;
        let origins = builder.into_origins();

        let generation = next_generation();
        if self.link_back {
            for (slot, origin) in origins.iter().enumerate() {
                if let Some(id) = origin {
                    graph.link_compiled(id, CompiledHandle { generation, slot });
                }
            }
        }

        debug!(
            root = %node_id,
            nodes = origins.len(),
            generation,
            "tree compiled"
        );
        Ok(CompiledTree::new(generation, root, origins))
    }
}
