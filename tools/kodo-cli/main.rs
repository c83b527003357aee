use clap::{Parser, Subcommand};
use kodo::error::GraphConversionError;
use kodo::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_NODE_WIDTH: f64 = 120.0;
const DEFAULT_NODE_HEIGHT: f64 = 60.0;
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// --- JSON Document Structs (Input Format Specific) ---
// These structs match the editor's `graph.json` format and are only used here for conversion.

#[derive(Serialize, Deserialize)]
struct RawDocument {
    nodes: Vec<RawNode>,
    #[serde(alias = "edges")]
    connections: Vec<RawConnection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scene: Option<RawScene>,
}

#[derive(Serialize, Deserialize)]
struct RawNode {
    id: String,
    #[serde(rename = "type", alias = "nodeType")]
    node_type: String,
    /// Script name or remote service name, for leaves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    x: f64,
    y: f64,
    #[serde(default = "default_width")]
    width: f64,
    #[serde(default = "default_height")]
    height: f64,
}

#[derive(Serialize, Deserialize)]
struct RawConnection {
    #[serde(alias = "from")]
    source: String,
    #[serde(alias = "to")]
    target: String,
}

#[derive(Serialize, Deserialize)]
struct RawScene {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

fn default_width() -> f64 {
    DEFAULT_NODE_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_NODE_HEIGHT
}

// --- Converter Implementation ---
// This implements the conversion from the raw JSON model to kodo's canonical Graph.

impl IntoGraph for &RawDocument {
    fn into_graph(self) -> Result<Graph, GraphConversionError> {
        let mut graph = Graph::new();
        for raw in &self.nodes {
            if graph.contains(&NodeId::from(raw.id.as_str())) {
                return Err(GraphConversionError::ValidationError(format!(
                    "duplicate node id '{}'",
                    raw.id
                )));
            }
            if raw.width <= 0.0 || raw.height <= 0.0 {
                return Err(GraphConversionError::ValidationError(format!(
                    "node '{}' has a non-positive size",
                    raw.id
                )));
            }
            graph.add_node(GraphNode::new(
                raw.id.as_str(),
                NodeKind::from_type_name(&raw.node_type, raw.data.as_deref()),
                Point::new(raw.x, raw.y),
                Size::new(raw.width, raw.height),
            ));
        }
        for raw in &self.connections {
            graph.connect(raw.source.as_str(), raw.target.as_str());
        }
        Ok(graph)
    }
}

impl RawDocument {
    /// Copies positions and the canvas bounds back from a laid-out graph.
    fn update_from(&mut self, graph: &Graph) {
        for raw in &mut self.nodes {
            if let Some(position) = graph.position(&NodeId::from(raw.id.as_str())) {
                raw.x = position.x;
                raw.y = position.y;
            }
        }
        let rect = graph.scene_rect;
        self.scene = Some(RawScene {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
        });
    }
}

/// Compile, lay out and run node-graph behavior trees
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the graph forms a runnable tree and print the compiled tree
    Validate {
        /// Path to the graph JSON file
        graph_path: String,
    },
    /// Lay out every tree in the graph and write the result
    Layout {
        /// Path to the graph JSON file
        graph_path: String,
        /// Where to write the laid-out graph. Defaults to stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Only reflow the subtree below this node
        #[arg(long)]
        anchor: Option<String>,
    },
    /// Tick the tree against logging backends for a while
    Run {
        /// Path to the graph JSON file
        graph_path: String,
        /// Pause between two ticks, in milliseconds
        #[arg(long, default_value_t = 1000)]
        tick_interval: u64,
        /// How long to run before stopping, in milliseconds
        #[arg(long, default_value_t = 5000)]
        duration: u64,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Validate { graph_path } => run_validate(&graph_path),
        Command::Layout {
            graph_path,
            output,
            anchor,
        } => run_layout(&graph_path, output, anchor),
        Command::Run {
            graph_path,
            tick_interval,
            duration,
        } => run_ticks(
            &graph_path,
            Duration::from_millis(tick_interval),
            Duration::from_millis(duration),
        ),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KODO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("kodo=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_document(path: &str) -> RawDocument {
    let json = fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read graph file '{}': {}", path, e)));
    serde_json::from_str(&json)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse graph JSON: {}", e)))
}

fn to_graph(document: &RawDocument) -> Graph {
    document
        .into_graph()
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert document to graph: {}", e)))
}

fn run_validate(graph_path: &str) {
    let document = load_document(graph_path);
    let mut graph = to_graph(&document);

    println!(
        "Loaded {} nodes, {} connections, {} root(s).",
        graph.nodes.len(),
        graph.connections.len(),
        find_roots(&graph).len()
    );
    if !is_tree_valid(&graph) {
        let reason = find_canonical_root(&graph)
            .err()
            .map_or_else(|| "unknown".to_string(), |e| e.to_string());
        exit_with_error(&format!("Graph is not a runnable tree: {}", reason));
    }

    let compile_start = Instant::now();
    let tree = TreeCompiler::builder(Arc::new(EchoConnector))
        .with_link_back(false)
        .build()
        .compile(&mut graph)
        .unwrap_or_else(|e| exit_with_error(&format!("Compilation failed: {}", e)));

    println!(
        "Compilation Successful! {} nodes compiled in {:?}\n",
        tree.len(),
        compile_start.elapsed()
    );
    print!("{}", TreeFormatter::format_tree(&tree));
}

fn run_layout(graph_path: &str, output: Option<String>, anchor: Option<String>) {
    let mut document = load_document(graph_path);
    let mut graph = to_graph(&document);
    let engine = LayoutEngine::default();

    match anchor {
        Some(anchor) => engine
            .reorder_subtree(&mut graph, &NodeId::from(anchor))
            .unwrap_or_else(|e| exit_with_error(&format!("Layout failed: {}", e))),
        None => engine.reorder(&mut graph),
    }
    document.update_from(&graph);

    let json = serde_json::to_string_pretty(&document)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to serialize graph: {}", e)));
    match output {
        Some(path) => {
            fs::write(&path, json)
                .unwrap_or_else(|e| exit_with_error(&format!("Failed to write '{}': {}", path, e)));
            println!("Wrote laid-out graph to '{}'", path);
        }
        None => println!("{}", json),
    }
}

fn run_ticks(graph_path: &str, tick_interval: Duration, duration: Duration) {
    let document = load_document(graph_path);
    let graph = to_graph(&document);
    if let Err(e) = find_canonical_root(&graph) {
        exit_with_error(&format!("Graph is not a runnable tree: {}", e));
    }

    let signal = RunSignal::new();
    let executor = TickExecutor::new(
        Arc::new(EchoRuntime),
        Arc::new(EchoConnector),
        signal.clone(),
        ExecutorConfig::default().with_tick_interval(tick_interval),
    );

    signal.set_mode(RunMode::Running);
    let handle = executor.spawn(graph);
    // Stop early if the worker gives up on its own, e.g. on a compile error.
    wait_for_worker(&handle, duration);
    signal.request_stop();

    let (_graph, result) = handle
        .join()
        .unwrap_or_else(|_| exit_with_error("Executor thread panicked"));
    let report = result.unwrap_or_else(|e| exit_with_error(&e.to_string()));

    println!("\n--- Run Summary ---");
    println!("Ticks:        {}", report.ticks);
    println!("Last Status:  {}", report.last_status);
}

/// Waits up to `duration` for the worker, returning `true` if it finished first.
fn wait_for_worker<T>(handle: &JoinHandle<T>, duration: Duration) -> bool {
    let deadline = Instant::now() + duration;
    while !handle.is_finished() {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        thread::sleep(POLL_INTERVAL.min(remaining));
    }
    true
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
