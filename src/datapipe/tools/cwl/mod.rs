//! The tool-descriptor compiler.
//!
//! Translates an ingested [`CommandModel`] into a `CommandLineTool` document
//! that a workflow engine can read to know how to invoke the command, what
//! inputs it takes, and which of those inputs are forwarded to outputs. The
//! whole translation is a pure function: one call, one immutable document,
//! no IO.

pub mod types;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::datapipe::tools::error::{Result, ToolError};
use crate::datapipe::tools::model::CommandModel;
use self::types::{InputBinding, TypeExpr, TypeNode};

/// Version of the target document format.
pub const CWL_VERSION: &str = "v1.0";
/// Document class emitted for a single command.
pub const COMMAND_LINE_TOOL: &str = "CommandLineTool";

/// One entry of the `inputs` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Parameter help text.
    pub doc: Option<String>,
    /// Type expression, including the optional wrapper for non-required
    /// parameters.
    #[serde(rename = "type")]
    pub ty: TypeExpr,
    /// Default value. Absent for repeatable parameters, whose default lives
    /// inside the core array type node instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Invocation binding. Placed here for single-occurrence parameters and
    /// inside the core array type node for repeatable ones.
    #[serde(
        rename = "inputBinding",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_binding: Option<InputBinding>,
}

/// Expression evaluated by the consuming engine to produce an output value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBinding {
    #[serde(rename = "outputEval")]
    pub output_eval: String,
}

/// One entry of the `outputs` mapping, derived from a forwarded input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    /// Core type of the forwarded input, optional wrapper stripped.
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(rename = "outputBinding")]
    pub output_binding: OutputBinding,
}

/// The compiled tool descriptor. Field order matches the serialized field
/// order; `inputs` and `outputs` preserve insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(rename = "cwlVersion")]
    pub cwl_version: String,
    pub class: String,
    pub doc: Option<String>,
    #[serde(rename = "baseCommand")]
    pub base_command: Vec<String>,
    pub inputs: IndexMap<String, InputSpec>,
    pub outputs: IndexMap<String, OutputSpec>,
}

impl ToolDescriptor {
    fn new(doc: Option<String>, base_command: Vec<String>) -> Self {
        Self {
            cwl_version: CWL_VERSION.to_string(),
            class: COMMAND_LINE_TOOL.to_string(),
            doc,
            base_command,
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
        }
    }
}

/// Compiles a command model into a tool descriptor.
///
/// `alias` becomes the `baseCommand` token sequence verbatim; when absent the
/// caller must supply a runnable command line out-of-band. Each forward name
/// must match a declared parameter and yields an output mirroring that
/// input's core type.
pub fn compile(
    command: &CommandModel,
    alias: Option<&[String]>,
    forwards: Option<&[String]>,
) -> Result<ToolDescriptor> {
    let base_command = alias.map(<[String]>::to_vec).unwrap_or_default();
    let mut descriptor = ToolDescriptor::new(command.help.clone(), base_command);

    for param in &command.parameters {
        if descriptor.inputs.contains_key(&param.name) {
            return Err(ToolError::DuplicateParameter(param.name.clone()));
        }
        let classified = types::classify(param)?;
        descriptor.inputs.insert(
            param.name.clone(),
            InputSpec {
                doc: param.help.clone(),
                ty: classified.ty,
                default: classified.default,
                input_binding: classified.input_binding,
            },
        );
    }

    if let Some(forwards) = forwards {
        resolve_forwards(&mut descriptor, forwards)?;
    }

    Ok(descriptor)
}

/// Derives one output per forward name, in forward-list order. The output key
/// is the input name prefixed with `_` to keep the two namespaces apart, and
/// the binding evaluates to the value bound to the input at invocation time.
fn resolve_forwards(descriptor: &mut ToolDescriptor, forwards: &[String]) -> Result<()> {
    for name in forwards {
        let input = descriptor
            .inputs
            .get(name)
            .ok_or_else(|| ToolError::UnknownForwardTarget(name.clone()))?;

        let spec = OutputSpec {
            ty: input.ty.core().forwarded(),
            output_binding: OutputBinding {
                output_eval: format!("$(inputs.{name})"),
            },
        };
        descriptor.outputs.insert(format!("_{name}"), spec);
    }
    Ok(())
}
