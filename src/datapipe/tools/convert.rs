use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::datapipe::tools::cwl;
use crate::datapipe::tools::error::Result;
use crate::datapipe::tools::io::{cwl_write, manifest};
use crate::datapipe::tools::nodes::{CWL_EXTENSION, NodeRecipe, NodeRegistry, RegistryNode};

/// Compiles a command manifest into a tool descriptor file named after the
/// command, placed inside `output_folder`. Returns the written path.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output_folder.display())
)]
pub fn manifest_to_cwl(
    input: &Path,
    output_folder: &Path,
    alias: Option<Vec<String>>,
    forwards: Option<Vec<String>>,
) -> Result<PathBuf> {
    let command = manifest::read_command(input)?;
    info!(
        command = %command.name,
        parameter_count = command.parameters.len(),
        "loaded command manifest"
    );

    let tool = cwl::compile(&command, alias.as_deref(), forwards.as_deref())?;
    debug!(
        input_count = tool.inputs.len(),
        output_count = tool.outputs.len(),
        "tool descriptor compiled"
    );

    fs::create_dir_all(output_folder)?;
    let output = output_folder.join(format!("{}.{CWL_EXTENSION}", command.name));
    cwl_write::write_tool(&output, &tool)?;
    Ok(output)
}

/// Compiles a command manifest and stores the result as a registry node.
///
/// The node is named after the command unless an explicit name is given, and
/// its meta sidecar records the manifest path, alias, and forwards.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), folder = %registry.folder().display())
)]
pub fn register_node(
    input: &Path,
    registry: &NodeRegistry,
    name: Option<String>,
    alias: Option<Vec<String>>,
    forwards: Option<Vec<String>>,
) -> Result<RegistryNode> {
    let command = manifest::read_command(input)?;
    let tool = cwl::compile(&command, alias.as_deref(), forwards.as_deref())?;
    let node_name = name.unwrap_or_else(|| command.name.clone());

    let recipe = NodeRecipe {
        manifest: Some(input.to_path_buf()),
        alias,
        forwards,
    };
    let node = registry.create(&node_name, &tool, &recipe)?;
    info!(node = %node.name, "node registered");
    Ok(node)
}

/// Builds a workflow from registry nodes and writes it to the target file.
#[instrument(
    level = "info",
    skip_all,
    fields(folder = %registry.folder().display(), output = %output.display())
)]
pub fn initialize_workflow(registry: &NodeRegistry, names: &[String], output: &Path) -> Result<()> {
    let workflow = registry.initialize_workflow(names)?;
    info!(step_count = workflow.steps.len(), "workflow assembled");
    cwl_write::write_workflow(output, &workflow)
}
