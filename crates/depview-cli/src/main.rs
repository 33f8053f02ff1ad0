use anyhow::{Context, Result, anyhow};
use clap::Parser;
use depview_core::{Edge, EdgeMatcher, Node, NodeId, Relation};
use depview_graph::{
    Collapser, DependencyGraph, LayoutContext, LayoutRegistry, LayoutScaler, LayoutSettings, Point,
    Rect, TreeModel, project_graph,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the graph JSON file ({"nodes": [...], "edges": [...]})
    #[arg(short, long)]
    graph: PathBuf,

    /// Layout algorithm to run
    #[arg(short, long, default_value = "tree")]
    layout: String,

    /// Relations followed from source to target when building the tree
    #[arg(long, value_delimiter = ',')]
    forward: Vec<Relation>,

    /// Relations followed from target back to source
    #[arg(long, value_delimiter = ',')]
    reverse: Vec<Relation>,

    /// Fold nodes behind a master, as master:a,b,c. May be repeated.
    #[arg(long, value_parser = parse_collapse)]
    collapse: Vec<CollapseArg>,

    /// Collapse every interior node of the tree before laying out
    #[arg(long)]
    collapse_tree: bool,

    /// Viewport the result is fitted into, as WIDTHxHEIGHT
    #[arg(long, default_value = "800x600", value_parser = parse_viewport)]
    viewport: Rect,

    /// Layout settings JSON; missing fields keep their defaults
    #[arg(short, long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
struct CollapseArg {
    master: NodeId,
    members: Vec<NodeId>,
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    nodes: Vec<Node>,
    #[serde(default)]
    edges: Vec<Edge>,
}

#[derive(Debug, Serialize)]
struct LayoutOutput {
    positions: BTreeMap<i64, Point>,
    scale: f32,
    center: Point,
}

fn parse_node_id(raw: &str) -> Result<NodeId> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .map(NodeId)
        .with_context(|| format!("invalid node id '{raw}'"))
}

fn parse_collapse(raw: &str) -> Result<CollapseArg> {
    let (master, members) = raw
        .split_once(':')
        .ok_or_else(|| anyhow!("expected master:a,b,c but got '{raw}'"))?;
    let members = members
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_node_id)
        .collect::<Result<Vec<_>>>()?;
    Ok(CollapseArg {
        master: parse_node_id(master)?,
        members,
    })
}

fn parse_viewport(raw: &str) -> Result<Rect> {
    let (width, height) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("expected WIDTHxHEIGHT but got '{raw}'"))?;
    let width: f32 = width.trim().parse().context("invalid viewport width")?;
    let height: f32 = height.trim().parse().context("invalid viewport height")?;
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(anyhow!("viewport dimensions must be non-negative"));
    }
    Ok(Rect::from_pos_size(Point::ORIGIN, width, height))
}

fn build_matcher(forward: &[Relation], reverse: &[Relation]) -> EdgeMatcher {
    if forward.is_empty() && reverse.is_empty() {
        return EdgeMatcher::all_forward();
    }
    EdgeMatcher::forward(forward).with_reverse(reverse)
}

fn load_settings(path: Option<&Path>) -> Result<LayoutSettings> {
    let Some(path) = path else {
        return Ok(LayoutSettings::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read settings {}", path.display()))?;
    LayoutSettings::from_json_str(&json)
        .with_context(|| format!("invalid settings in {}", path.display()))
}

fn load_graph(path: &Path) -> Result<DependencyGraph> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read graph {}", path.display()))?;
    let file: GraphFile = serde_json::from_str(&json)
        .with_context(|| format!("failed to parse graph {}", path.display()))?;
    Ok(DependencyGraph::from_parts(file.nodes, file.edges))
}

fn run(args: &Args) -> Result<LayoutOutput> {
    let settings = load_settings(args.settings.as_deref())?;
    let graph = load_graph(&args.graph)?;
    let matcher = build_matcher(&args.forward, &args.reverse);
    tracing::info!(
        "Loaded graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let mut collapser = Collapser::new();
    if args.collapse_tree {
        let tree = TreeModel::from_graph(&graph, &matcher);
        collapser.collapse_tree(&tree, &graph.node_ids());
    }
    for group in &args.collapse {
        collapser.collapse(group.master, &group.members, false);
    }
    let exposed = project_graph(&graph, &collapser.build_hidden_node_map());

    let registry = LayoutRegistry::with_defaults();
    let context = LayoutContext::new(&exposed, matcher, args.viewport);
    let mut runner = registry.runner_for(&args.layout, &context, &settings)?;
    let steps = runner.run_to_completion();
    let positions = runner.positions(&exposed.node_ids());
    tracing::info!(
        "Layout '{}' placed {} nodes in {} steps",
        args.layout,
        positions.len(),
        steps
    );

    let scaler = LayoutScaler::new(&exposed.node_ids(), &positions);
    Ok(LayoutOutput {
        scale: scaler.full_view_scale(&args.viewport, settings.zero_threshold),
        center: Point::new(scaler.center_x(), scaler.center_y()),
        positions: positions
            .into_iter()
            .map(|(node, point)| (node.0, point))
            .collect(),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let output = run(&args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
