use clap::Parser;
use flowtree::ids::{IdGenerator, SequentialIdGenerator};
use flowtree::model::{NodeKind, Slot, Workflow, WorkflowNode};
use flowtree::mutation;
use flowtree::query;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs;

/// A CLI tool to generate random workflow trees for testing and benchmarking
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_workflow.json")]
    output: String,

    /// Number of nodes to add below the start node
    #[arg(short, long, default_value_t = 25)]
    nodes: usize,

    /// Seed for a reproducible tree
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Generating a workflow with {} added node(s)...", cli.nodes);

    let workflow = generate_workflow(&mut rng, cli.nodes)?;
    fs::write(&cli.output, workflow.to_json_pretty()?)?;

    println!(
        "Successfully generated {} node(s), {} edge(s) and saved them to '{}'",
        workflow.node_count(),
        query::edges(workflow.root()).len(),
        cli.output
    );

    Ok(())
}

/// Grows a tree one `add_node` at a time, each time under a randomly chosen
/// node that can still take children.
fn generate_workflow(
    rng: &mut StdRng,
    count: usize,
) -> Result<Workflow, Box<dyn std::error::Error>> {
    let mut ids = SequentialIdGenerator::new("gen");
    let mut workflow = Workflow::new();

    for _ in 0..count {
        let open: Vec<(String, NodeKind)> = query::iter_preorder(workflow.root())
            .filter(|visit| !visit.node.kind().is_terminal())
            .map(|visit| (visit.node.id().to_string(), visit.node.kind()))
            .collect();
        // The start node never becomes terminal, so `open` is never empty.
        let (parent_id, parent_kind) = &open[rng.random_range(0..open.len())];

        let kind = random_kind(rng);
        let node = WorkflowNode::new(kind, ids.next_id(), kind.default_label());
        let slot = match parent_kind {
            NodeKind::Branch => Some(Slot::ALL[rng.random_range(0..Slot::ALL.len())]),
            _ => None,
        };
        workflow = mutation::add_node(&workflow, parent_id, node, slot)?;
    }

    Ok(workflow)
}

fn random_kind(rng: &mut StdRng) -> NodeKind {
    match rng.random_range(0..10) {
        0..=5 => NodeKind::Action,
        6..=7 => NodeKind::Branch,
        _ => NodeKind::End,
    }
}
