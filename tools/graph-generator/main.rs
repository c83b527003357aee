use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use serde::Serialize;
use std::fs;

const LEAF_TYPES: [&str; 4] = ["LuaAction", "LuaCondition", "YARPAction", "YARPCondition"];
const SERVICES: [&str; 5] = ["arm", "base", "gripper", "camera", "battery"];

/// A CLI tool to generate random behavior-tree graphs for kodo
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_graph.json")]
    output: String,

    /// Maximum depth below the root
    #[arg(long, default_value_t = 4)]
    depth: usize,

    /// The minimum number of children per composite
    #[arg(long, default_value_t = 1)]
    min: usize,

    /// The maximum number of children per composite
    #[arg(long, default_value_t = 4)]
    max: usize,

    /// Scatter nodes over the canvas instead of stacking them by level
    #[arg(long)]
    scatter: bool,
}

#[derive(Serialize)]
struct GeneratedNode {
    id: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

#[derive(Serialize)]
struct GeneratedConnection {
    source: String,
    target: String,
}

#[derive(Serialize, Default)]
struct GeneratedGraph {
    nodes: Vec<GeneratedNode>,
    connections: Vec<GeneratedConnection>,
}

struct Generator<'a> {
    cli: &'a Cli,
    rng: ThreadRng,
    graph: GeneratedGraph,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.min > cli.max {
        eprintln!(
            "Error: --min ({}) cannot be greater than --max ({})",
            cli.min, cli.max
        );
        std::process::exit(1);
    }

    println!(
        "Generating a behavior tree (depth {}, children per composite: {} to {})...",
        cli.depth, cli.min, cli.max
    );

    let mut generator = Generator {
        cli: &cli,
        rng: rand::rng(),
        graph: GeneratedGraph::default(),
    };
    let root = generator.add_node("Root", None, 0);
    let top = generator.add_node("Sequence", None, 1);
    generator.connect(&root, &top);
    generator.grow(&top, 1);

    let graph = generator.graph;
    let json_output = serde_json::to_string_pretty(&graph)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} nodes and {} connections into '{}'",
        graph.nodes.len(),
        graph.connections.len(),
        cli.output
    );

    Ok(())
}

impl Generator<'_> {
    /// Adds the children of a composite, recursing into composite children.
    fn grow(&mut self, parent: &str, depth: usize) {
        let count = self.rng.random_range(self.cli.min..=self.cli.max);
        for _ in 0..count {
            let at_bottom = depth + 1 >= self.cli.depth;
            let child = if !at_bottom && self.rng.random_bool(0.4) {
                let kind = if self.rng.random_bool(0.5) { "Sequence" } else { "Fallback" };
                let id = self.add_node(kind, None, depth + 1);
                self.grow(&id, depth + 1);
                id
            } else {
                self.add_leaf(depth + 1)
            };
            self.connect(parent, &child);
        }
    }

    fn add_leaf(&mut self, depth: usize) -> String {
        let leaf_type = LEAF_TYPES[self.rng.random_range(0..LEAF_TYPES.len())];
        let data = if leaf_type.starts_with("Lua") {
            format!("script_{}.lua", self.graph.nodes.len())
        } else {
            SERVICES[self.rng.random_range(0..SERVICES.len())].to_string()
        };
        self.add_node(leaf_type, Some(data), depth)
    }

    fn add_node(&mut self, node_type: &str, data: Option<String>, depth: usize) -> String {
        let id = format!("n{}", self.graph.nodes.len());
        let (x, y) = if self.cli.scatter {
            (
                self.rng.random_range(-500.0..500.0),
                self.rng.random_range(0.0..800.0),
            )
        } else {
            (self.graph.nodes.len() as f64 * 10.0, depth as f64 * 160.0)
        };
        self.graph.nodes.push(GeneratedNode {
            id: id.clone(),
            node_type: node_type.to_string(),
            data,
            x,
            y,
            width: self.rng.random_range(80.0..160.0_f64).round(),
            height: 60.0,
        });
        id
    }

    fn connect(&mut self, source: &str, target: &str) {
        self.graph.connections.push(GeneratedConnection {
            source: source.to_string(),
            target: target.to_string(),
        });
    }
}
