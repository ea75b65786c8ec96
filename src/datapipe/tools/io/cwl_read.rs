use std::fs;
use std::path::Path;

use crate::datapipe::tools::cwl::{COMMAND_LINE_TOOL, ToolDescriptor};
use crate::datapipe::tools::error::{Result, ToolError};

/// Reads a stored tool descriptor back into the document model.
pub fn read_tool(path: &Path) -> Result<ToolDescriptor> {
    let source = fs::read_to_string(path)?;
    parse_tool(&source)
}

/// Parses tool-descriptor source, skipping the interpreter marker line.
pub fn parse_tool(source: &str) -> Result<ToolDescriptor> {
    let tool: ToolDescriptor = serde_yaml_ng::from_str(strip_marker(source))?;
    if tool.class != COMMAND_LINE_TOOL {
        return Err(ToolError::InvalidDocument(format!(
            "expected class {COMMAND_LINE_TOOL}, found {}",
            tool.class
        )));
    }
    Ok(tool)
}

fn strip_marker(source: &str) -> &str {
    if source.starts_with("#!") {
        source
            .split_once('\n')
            .map(|(_, rest)| rest)
            .unwrap_or_default()
    } else {
        source
    }
}
