use clap::{Parser, Subcommand, ValueEnum};
use flowtree::editor::WorkflowEditor;
use flowtree::layout::LayoutConfig;
use flowtree::model::{NodeKind, Slot, Workflow};
use flowtree::query;
use std::fs;
use std::path::{Path, PathBuf};

/// Define a CLI-specific enum for clap to parse.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindCli {
    Action,
    Branch,
    End,
}

impl From<KindCli> for NodeKind {
    fn from(kind: KindCli) -> Self {
        match kind {
            KindCli::Action => NodeKind::Action,
            KindCli::Branch => NodeKind::Branch,
            KindCli::End => NodeKind::End,
        }
    }
}

/// Inspect, edit and lay out workflow trees stored as JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a new workflow containing only a start node
    New {
        /// Write the example workflow instead
        #[arg(long)]
        example: bool,
        #[arg(short, long, default_value = "workflow.json")]
        output: PathBuf,
    },
    /// Print the workflow as an indented tree
    Show { file: PathBuf },
    /// Print the computed node positions as JSON
    Layout {
        file: PathBuf,
        /// JSON file overriding layout sizes and gaps
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print every parent to child link as JSON
    Edges { file: PathBuf },
    /// Append a node under a parent
    Add {
        file: PathBuf,
        #[arg(long)]
        parent: String,
        #[arg(long, value_enum)]
        kind: KindCli,
        /// Branch slot: 0 (left), 1 (center) or 2 (right)
        #[arg(long)]
        slot: Option<usize>,
        /// Where to write the result; defaults to the input file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Delete a node, reconnecting its children to its parent
    Delete {
        file: PathBuf,
        #[arg(long)]
        node: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Insert a node between a parent and one of its children
    Insert {
        file: PathBuf,
        #[arg(long)]
        parent: String,
        #[arg(long)]
        target: String,
        #[arg(long, value_enum)]
        kind: KindCli,
        #[arg(long)]
        slot: Option<usize>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Change a node's label
    Relabel {
        file: PathBuf,
        #[arg(long)]
        node: String,
        #[arg(long)]
        label: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli.command) {
        exit_with_error(&e.to_string());
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::New { example, output } => {
            let workflow = if example {
                Workflow::example()?
            } else {
                Workflow::new()
            };
            write_workflow(&output, &workflow)?;
        }
        Command::Show { file } => {
            let workflow = read_workflow(&file)?;
            print!("{}", workflow);
            println!("{} node(s)", workflow.node_count());
        }
        Command::Layout { file, config } => {
            let workflow = read_workflow(&file)?;
            let config = match config {
                Some(path) => LayoutConfig::from_json(&fs::read_to_string(path)?)?,
                None => LayoutConfig::default(),
            };
            let editor = WorkflowEditor::builder()
                .with_workflow(workflow)
                .with_layout_config(config)
                .build();
            println!("{}", serde_json::to_string_pretty(editor.positions())?);
        }
        Command::Edges { file } => {
            let workflow = read_workflow(&file)?;
            let edges = query::edges(workflow.root());
            println!("{}", serde_json::to_string_pretty(&edges)?);
        }
        Command::Add {
            file,
            parent,
            kind,
            slot,
            output,
        } => {
            let mut editor = open_editor(&file)?;
            let id = editor.add_node(&parent, kind.into(), parse_slot(slot)?)?;
            log::info!("Added node '{}' under '{}'", id, parent);
            save(&editor, output.as_deref().unwrap_or(&file))?;
        }
        Command::Delete { file, node, output } => {
            let mut editor = open_editor(&file)?;
            editor.delete_node(&node)?;
            log::info!("Deleted node '{}'", node);
            save(&editor, output.as_deref().unwrap_or(&file))?;
        }
        Command::Insert {
            file,
            parent,
            target,
            kind,
            slot,
            output,
        } => {
            let mut editor = open_editor(&file)?;
            let id = editor.insert_node_between(&parent, &target, kind.into(), parse_slot(slot)?)?;
            log::info!("Inserted node '{}' between '{}' and '{}'", id, parent, target);
            save(&editor, output.as_deref().unwrap_or(&file))?;
        }
        Command::Relabel {
            file,
            node,
            label,
            output,
        } => {
            let mut editor = open_editor(&file)?;
            editor.update_label(&node, label)?;
            save(&editor, output.as_deref().unwrap_or(&file))?;
        }
    }
    Ok(())
}

fn parse_slot(slot: Option<usize>) -> Result<Option<Slot>, Box<dyn std::error::Error>> {
    Ok(slot.map(Slot::try_from).transpose()?)
}

fn read_workflow(path: &Path) -> Result<Workflow, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Could not read workflow '{}': {}", path.display(), e))?;
    Ok(Workflow::from_json(&content)?)
}

fn open_editor(path: &Path) -> Result<WorkflowEditor, Box<dyn std::error::Error>> {
    let workflow = read_workflow(path)?;
    Ok(WorkflowEditor::builder().with_workflow(workflow).build())
}

fn save(editor: &WorkflowEditor, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    write_workflow(path, editor.workflow())
}

fn write_workflow(path: &Path, workflow: &Workflow) -> Result<(), Box<dyn std::error::Error>> {
    fs::write(path, workflow.to_json_pretty()?)
        .map_err(|e| format!("Could not write workflow '{}': {}", path.display(), e))?;
    log::info!(
        "Wrote {} node(s) to '{}'",
        workflow.node_count(),
        path.display()
    );
    Ok(())
}
