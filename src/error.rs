use crate::graph::NodeId;
use thiserror::Error;

/// Errors describing a graph that cannot be turned into a single rooted tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("No valid root found: the graph needs exactly one root node of kind 'Root'")]
    NoValidRoot,

    #[error("Found {count} root nodes of kind 'Root', but exactly one is required")]
    AmbiguousRoots { count: usize },

    #[error("Node '{node_id}' is reachable from itself; the connections form a cycle")]
    Cycle { node_id: NodeId },

    #[error("Node '{node_id}' is connected to more than one parent")]
    MultipleParents { node_id: NodeId },

    #[error("Node '{node_id}' not found in the graph")]
    NodeNotFound { node_id: NodeId },
}

/// Errors raised while creating or tearing down external resources.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("Failed to create the scripting context: {0}")]
    ContextCreation(String),

    #[error("Failed to close the scripting context: {0}")]
    ContextTeardown(String),

    #[error("Failed to connect to remote service '{service}': {message}")]
    RemoteConnection { service: String, message: String },
}

/// Errors that can occur while compiling a graph into an executable tree.
///
/// Compilation is all-or-nothing: when one of these is returned no tree exists
/// and no graph node has been linked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("Node '{node_id}' has a kind without a compilation rule: '{type_name}'")]
    UnsupportedNodeKind { node_id: NodeId, type_name: String },

    #[error("Root node '{root_id}' has no child to compile")]
    EmptyTree { root_id: NodeId },

    #[error(transparent)]
    Resource(#[from] ResourceError),
}

/// Errors that end a tick-executor run before or after the tick loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("Cannot start the run: {0}")]
    Structural(#[from] StructuralError),

    #[error("Cannot start the run: {0}")]
    Compile(#[from] CompileError),

    #[error("Run aborted: {0}")]
    Resource(#[from] ResourceError),
}

/// Errors that can occur when converting a custom editor format into a kodo `Graph`.
#[derive(Error, Debug, Clone)]
pub enum GraphConversionError {
    #[error("Invalid custom data: {0}")]
    ValidationError(String),
}
