//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kodo crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use kodo::prelude::*;
//! use std::sync::Arc;
//!
//! # fn run_example(mut graph: Graph) -> Result<(), CompileError> {
//! let compiler = TreeCompiler::builder(Arc::new(EchoConnector)).build();
//! let mut tree = compiler.compile(&mut graph)?;
//!
//! let mut context = EchoRuntime.create_context()?;
//! let status = tree.tick(&mut *context);
//! println!("{}\n-> {}", TreeFormatter::format_tree(&tree), status);
//! # Ok(())
//! # }
//! ```

// Graph model and topology
pub use crate::graph::{
    Connection, Graph, GraphNode, IntoGraph, NodeId, NodeKind, Point, PortType, SceneRect, Size,
    find_canonical_root, find_roots, get_children, get_parent, is_tree_valid,
};

// Compilation and compiled trees
pub use crate::compiler::TreeCompiler;
pub use crate::tree::{CompiledHandle, CompiledTree, NodeStatus, TreeFormatter, TreeNode};

// Backends
pub use crate::backend::{
    EchoConnector, EchoRuntime, LeafRole, RemoteConnector, RemoteLeaf, ScriptContext,
    ScriptRuntime,
};

// Layout
pub use crate::layout::{LayoutConfig, LayoutEngine};

// Execution
pub use crate::executor::{ExecutorConfig, ExecutorState, RunMode, RunReport, RunSignal, TickExecutor};

// Error types
pub use crate::error::{CompileError, ResourceError, RunError, StructuralError};
