//! On-disk registry of compiled nodes.
//!
//! A node is a `<name>.cwl` tool descriptor stored next to a `<name>.yml`
//! meta sidecar recording the recipe it was compiled from. Entries missing
//! either file are ignored when listing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::datapipe::tools::cwl::ToolDescriptor;
use crate::datapipe::tools::error::{Result, ToolError};
use crate::datapipe::tools::io::{cwl_read, cwl_write};
use crate::datapipe::tools::workflow::{self, WorkflowDescriptor};

/// File extension of stored tool descriptors.
pub const CWL_EXTENSION: &str = "cwl";
/// File extension of the meta sidecar.
pub const META_EXTENSION: &str = "yml";

/// Recipe a node was compiled from, persisted as the meta sidecar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeRecipe {
    /// Manifest the command model was ingested from.
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    /// Invocation tokens used as the base command.
    #[serde(default)]
    pub alias: Option<Vec<String>>,
    /// Input parameters forwarded to outputs.
    #[serde(default)]
    pub forwards: Option<Vec<String>>,
}

/// A node loaded from the registry folder.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryNode {
    pub name: String,
    pub cwl_path: PathBuf,
    pub tool: ToolDescriptor,
    pub recipe: NodeRecipe,
}

/// Registry rooted at a folder of `.cwl` + `.yml` pairs.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    folder: PathBuf,
}

impl NodeRegistry {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn cwl_path(&self, name: &str) -> PathBuf {
        self.folder.join(format!("{name}.{CWL_EXTENSION}"))
    }

    fn meta_path(&self, name: &str) -> PathBuf {
        self.folder.join(format!("{name}.{META_EXTENSION}"))
    }

    /// Loads a single node, or `None` when either file is missing.
    pub fn load(&self, name: &str) -> Result<Option<RegistryNode>> {
        let cwl_path = self.cwl_path(name);
        let meta_path = self.meta_path(name);
        if !cwl_path.is_file() || !meta_path.is_file() {
            return Ok(None);
        }

        let tool = cwl_read::read_tool(&cwl_path)?;
        let recipe: NodeRecipe = serde_yaml_ng::from_str(&fs::read_to_string(&meta_path)?)?;
        Ok(Some(RegistryNode {
            name: name.to_string(),
            cwl_path,
            tool,
            recipe,
        }))
    }

    /// Lists valid nodes in the folder, sorted by name.
    #[instrument(level = "debug", skip(self), fields(folder = %self.folder.display()))]
    pub fn list(&self) -> Result<Vec<RegistryNode>> {
        if !self.folder.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = Vec::new();
        for entry in fs::read_dir(&self.folder)? {
            let path = entry?.path();
            let is_cwl = path
                .extension()
                .is_some_and(|extension| extension == CWL_EXTENSION);
            if !is_cwl {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();

        let mut nodes = Vec::with_capacity(names.len());
        for name in names {
            if let Some(node) = self.load(&name)? {
                nodes.push(node);
            }
        }
        debug!(node_count = nodes.len(), "registry listed");
        Ok(nodes)
    }

    /// Stores a compiled node under the given name.
    #[instrument(level = "info", skip(self, tool, recipe))]
    pub fn create(
        &self,
        name: &str,
        tool: &ToolDescriptor,
        recipe: &NodeRecipe,
    ) -> Result<RegistryNode> {
        if self.load(name)?.is_some() {
            return Err(ToolError::NodeExists(name.to_string()));
        }

        fs::create_dir_all(&self.folder)?;
        let cwl_path = self.cwl_path(name);
        cwl_write::write_tool(&cwl_path, tool)?;
        fs::write(self.meta_path(name), serde_yaml_ng::to_string(recipe)?)?;

        Ok(RegistryNode {
            name: name.to_string(),
            cwl_path,
            tool: tool.clone(),
            recipe: recipe.clone(),
        })
    }

    /// Deletes a node and its meta sidecar.
    #[instrument(level = "info", skip(self))]
    pub fn remove(&self, name: &str) -> Result<()> {
        if self.load(name)?.is_none() {
            return Err(ToolError::NodeNotFound(name.to_string()));
        }
        fs::remove_file(self.cwl_path(name))?;
        fs::remove_file(self.meta_path(name))?;
        Ok(())
    }

    /// Builds a workflow running the named nodes in order. Names may repeat;
    /// each occurrence becomes its own step.
    pub fn initialize_workflow(&self, names: &[String]) -> Result<WorkflowDescriptor> {
        let mut selection = Vec::with_capacity(names.len());
        for name in names {
            let node = self
                .load(name)?
                .ok_or_else(|| ToolError::NodeNotFound(name.clone()))?;
            selection.push(node);
        }
        Ok(workflow::build_workflow(&selection))
    }
}
