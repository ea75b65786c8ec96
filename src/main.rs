use std::path::PathBuf;

use clap::{Parser, Subcommand};
use datapipe_tools::nodes::NodeRegistry;
use datapipe_tools::{Result, ToolError, convert};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| run(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Compile(args) => execute_compile(args),
        Command::Node(command) => execute_node(command),
        Command::Workflow(command) => execute_workflow(command),
    }
}

fn execute_compile(args: CompileArgs) -> Result<()> {
    if !args.manifest.exists() {
        return Err(ToolError::MissingInput(args.manifest));
    }
    let output = convert::manifest_to_cwl(
        &args.manifest,
        &args.output_folder,
        args.alias.as_deref().map(split_alias),
        non_empty(args.forwards),
    )?;
    println!("{}", output.display());
    Ok(())
}

fn execute_node(command: NodeCommand) -> Result<()> {
    match command {
        NodeCommand::Add(args) => {
            if !args.manifest.exists() {
                return Err(ToolError::MissingInput(args.manifest));
            }
            let registry = NodeRegistry::new(args.folder);
            let node = convert::register_node(
                &args.manifest,
                &registry,
                args.name,
                args.alias.as_deref().map(split_alias),
                non_empty(args.forwards),
            )?;
            println!("{}", node.cwl_path.display());
            Ok(())
        }
        NodeCommand::List { folder } => {
            let registry = NodeRegistry::new(folder);
            for node in registry.list()? {
                println!("{}\t{}", node.name, node.cwl_path.display());
            }
            Ok(())
        }
        NodeCommand::Remove { folder, name } => NodeRegistry::new(folder).remove(&name),
    }
}

fn execute_workflow(command: WorkflowCommand) -> Result<()> {
    match command {
        WorkflowCommand::Init {
            folder,
            nodes,
            output,
        } => {
            let registry = NodeRegistry::new(folder);
            convert::initialize_workflow(&registry, &nodes, &output)
        }
    }
}

fn split_alias(alias: &str) -> Vec<String> {
    alias.split('.').map(str::to_string).collect()
}

fn non_empty(values: Vec<String>) -> Option<Vec<String>> {
    if values.is_empty() { None } else { Some(values) }
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Compile command manifests into cwl tool descriptors."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a command manifest into a cwl file.
    Compile(CompileArgs),
    /// Manage the compiled node registry.
    #[command(subcommand)]
    Node(NodeCommand),
    /// Assemble workflows from registered nodes.
    #[command(subcommand)]
    Workflow(WorkflowCommand),
}

#[derive(clap::Args)]
struct CompileArgs {
    /// Command manifest file (JSON).
    #[arg(long)]
    manifest: PathBuf,

    /// Folder receiving the cwl file, named after the command.
    #[arg(long)]
    output_folder: PathBuf,

    /// Invocation tokens for the base command, separated by '.'.
    #[arg(long)]
    alias: Option<String>,

    /// Input parameters to forward to the cwl output.
    #[arg(short = 'f', long = "forward")]
    forwards: Vec<String>,
}

#[derive(Subcommand)]
enum NodeCommand {
    /// Compile a manifest and store it as a registry node.
    Add(NodeAddArgs),
    /// List registered nodes.
    List {
        /// Registry folder.
        #[arg(long)]
        folder: PathBuf,
    },
    /// Remove a registered node.
    Remove {
        /// Registry folder.
        #[arg(long)]
        folder: PathBuf,

        /// Node name.
        #[arg(long)]
        name: String,
    },
}

#[derive(clap::Args)]
struct NodeAddArgs {
    /// Command manifest file (JSON).
    #[arg(long)]
    manifest: PathBuf,

    /// Registry folder.
    #[arg(long)]
    folder: PathBuf,

    /// Node name; defaults to the command name.
    #[arg(long)]
    name: Option<String>,

    /// Invocation tokens for the base command, separated by '.'.
    #[arg(long)]
    alias: Option<String>,

    /// Input parameters to forward to the cwl output.
    #[arg(short = 'f', long = "forward")]
    forwards: Vec<String>,
}

#[derive(Subcommand)]
enum WorkflowCommand {
    /// Build a workflow document from registered nodes.
    Init {
        /// Registry folder.
        #[arg(long)]
        folder: PathBuf,

        /// Node names, in step order; names may repeat.
        #[arg(long = "node", required = true)]
        nodes: Vec<String>,

        /// Output workflow file.
        #[arg(long)]
        output: PathBuf,
    },
}
