use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::datapipe::tools::error::{Result, ToolError};
use crate::datapipe::tools::model::CommandModel;

/// A command manifest file: a JSON document declaring the commands a script
/// exposes. The compiler consumes exactly one command per manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub commands: Vec<CommandModel>,
}

/// Reads a manifest and extracts its single command definition.
///
/// A manifest declaring zero or several commands is rejected before any
/// compilation starts.
pub fn read_command(path: &Path) -> Result<CommandModel> {
    let data = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&data)?;
    single_command(manifest, path)
}

fn single_command(manifest: Manifest, path: &Path) -> Result<CommandModel> {
    let found = manifest.commands.len();
    let mut commands = manifest.commands;
    match commands.pop() {
        Some(command) if commands.is_empty() => Ok(command),
        _ => Err(ToolError::MissingSourceCommand {
            path: path.to_path_buf(),
            found,
        }),
    }
}
