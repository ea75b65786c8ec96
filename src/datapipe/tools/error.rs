use std::path::PathBuf;

use thiserror::Error;

use crate::datapipe::tools::model::PrimitiveKind;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// tool ingests a command model, compiles it, or emits documents.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON parsing or serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when YAML parsing or serialization fails.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Raised when a descriptor's kind and cardinality have no defined
    /// mapping, such as a boolean consuming more than one token.
    #[error("invalid parameter shape for '{name}': {kind:?} with arity {arity}")]
    InvalidParameterShape {
        name: String,
        kind: PrimitiveKind,
        arity: u32,
    },

    /// Raised when a forward name does not match any declared input.
    #[error("unknown forward target '{0}'")]
    UnknownForwardTarget(String),

    /// Raised when two descriptors declare the same parameter name.
    #[error("duplicate parameter name '{0}'")]
    DuplicateParameter(String),

    /// Raised when a manifest does not contain exactly one command definition.
    #[error("expected exactly one command in {}, found {found}", path.display())]
    MissingSourceCommand { path: PathBuf, found: usize },

    /// Raised when a stored document does not look like a cwl file.
    #[error("invalid cwl document: {0}")]
    InvalidDocument(String),

    /// Raised when creating a registry node whose name is already taken.
    #[error("node with name '{0}' already exists")]
    NodeExists(String),

    /// Raised when a registry lookup does not find the requested node.
    #[error("node with name '{0}' not found")]
    NodeNotFound(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
