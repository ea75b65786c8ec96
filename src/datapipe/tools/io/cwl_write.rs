use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::datapipe::tools::cwl::ToolDescriptor;
use crate::datapipe::tools::error::Result;
use crate::datapipe::tools::workflow::WorkflowDescriptor;

/// Interpreter marker prefixed to every generated document.
pub const CWL_MARKER: &str = "#!/usr/bin/env cwl-runner";

/// Renders a document as YAML preceded by the interpreter marker line.
///
/// Serialization goes through serde, so the encoded form never shares
/// structure between entries and map keys keep their insertion order.
pub fn render<T: Serialize>(document: &T) -> Result<String> {
    let body = serde_yaml_ng::to_string(document)?;
    Ok(format!("{CWL_MARKER}\n{body}"))
}

/// Writes a tool descriptor to the target file.
pub fn write_tool(path: &Path, tool: &ToolDescriptor) -> Result<()> {
    fs::write(path, render(tool)?)?;
    Ok(())
}

/// Writes a workflow descriptor to the target file.
pub fn write_workflow(path: &Path, workflow: &WorkflowDescriptor) -> Result<()> {
    fs::write(path, render(workflow)?)?;
    Ok(())
}
