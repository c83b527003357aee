//! # Kodo - Behavior-Tree Graph Compiler and Executor
//!
//! **Kodo** takes the node graph a user assembles in a visual behavior-tree
//! editor and turns it into something that runs. Actions, conditions and control
//! nodes are wired together on a canvas; kodo derives the rooted tree from those
//! connections, compiles it into an executable tree whose leaves delegate to a
//! scripting runtime or to remote services, and ticks it on a fixed interval
//! until told to stop. It also lays the graph out on the canvas so trees render
//! without overlapping siblings.
//!
//! ## Core Workflow
//!
//! 1.  **Load Your Graph**: Convert your editor's scene into a [`graph::Graph`],
//!     typically by implementing [`graph::IntoGraph`].
//! 2.  **Inspect or Lay Out**: Use [`graph::topology`] to query roots and children,
//!     and [`layout::LayoutEngine`] to reposition nodes.
//! 3.  **Compile**: [`compiler::TreeCompiler`] builds a [`tree::CompiledTree`] from
//!     the graph's single `Root` node.
//! 4.  **Run**: [`executor::TickExecutor`] compiles, ticks and finalizes the tree,
//!     controlled from any thread through a [`executor::RunSignal`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kodo::prelude::*;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let mut graph = Graph::new();
//! graph
//!     .add_node(GraphNode::new("root", NodeKind::Root, Point::new(0.0, 0.0), Size::new(80.0, 40.0)))
//!     .add_node(GraphNode::new("seq", NodeKind::Sequence, Point::new(0.0, 100.0), Size::new(100.0, 40.0)))
//!     .add_node(GraphNode::new(
//!         "check",
//!         NodeKind::ScriptCondition { script: "is_ready.lua".to_string() },
//!         Point::new(-60.0, 200.0),
//!         Size::new(120.0, 60.0),
//!     ))
//!     .add_node(GraphNode::new(
//!         "grasp",
//!         NodeKind::RemoteAction { service: "arm".to_string() },
//!         Point::new(80.0, 200.0),
//!         Size::new(120.0, 60.0),
//!     ));
//! graph.connect("root", "seq").connect("seq", "check").connect("seq", "grasp");
//!
//! // Tidy the canvas.
//! LayoutEngine::default().reorder(&mut graph);
//! assert!(is_tree_valid(&graph));
//!
//! // Run on a worker thread, stop from here.
//! let signal = RunSignal::new();
//! let executor = TickExecutor::new(
//!     Arc::new(EchoRuntime),
//!     Arc::new(EchoConnector),
//!     signal.clone(),
//!     ExecutorConfig::default().with_tick_interval(Duration::from_millis(100)),
//! );
//! signal.set_mode(RunMode::Running);
//! let worker = executor.spawn(graph);
//! std::thread::sleep(Duration::from_millis(350));
//! signal.request_stop();
//! let (_graph, report) = worker.join().expect("tick thread panicked");
//! println!("ticked {} times", report?.ticks);
//! # Ok::<(), kodo::error::RunError>(())
//! ```

pub mod backend;
pub mod compiler;
pub mod error;
pub mod executor;
pub mod graph;
pub mod layout;
pub mod prelude;
pub mod tree;
