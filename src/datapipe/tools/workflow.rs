//! Builds a `Workflow` document out of compiled registry nodes.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::datapipe::tools::cwl::CWL_VERSION;
use crate::datapipe::tools::cwl::types::TypeExpr;
use crate::datapipe::tools::nodes::RegistryNode;

/// Document class emitted for a workflow.
pub const WORKFLOW_CLASS: &str = "Workflow";

/// Requirement entries declared by every generated workflow.
pub const WORKFLOW_REQUIREMENTS: [&str; 4] = [
    "StepInputExpressionRequirement",
    "InlineJavascriptRequirement",
    "MultipleInputFeatureRequirement",
    "ScatterFeatureRequirement",
];

/// Empty requirement body.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Requirement {}

/// One workflow step referencing a stored tool descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Path of the tool descriptor executed by this step.
    pub run: String,
    /// Step input connections, keyed by the tool's input names. Values are
    /// placeholders to be filled when the workflow is wired up.
    #[serde(rename = "in")]
    pub inputs: IndexMap<String, String>,
    /// Output keys exposed by the tool.
    pub out: Vec<String>,
}

/// A workflow document assembled from an ordered node selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDescriptor {
    #[serde(rename = "cwlVersion")]
    pub cwl_version: String,
    pub class: String,
    pub requirements: IndexMap<String, Requirement>,
    pub inputs: IndexMap<String, TypeExpr>,
    pub outputs: Vec<String>,
    pub steps: IndexMap<String, WorkflowStep>,
}

/// Assembles a workflow whose steps run the given nodes in order.
///
/// A node selected more than once gets distinct step names through a per-name
/// counter suffix. Every step input surfaces as a workflow-level input named
/// `<step>_<input>` carrying a copy of the tool input's type.
pub fn build_workflow(nodes: &[RegistryNode]) -> WorkflowDescriptor {
    let mut requirements = IndexMap::new();
    for name in WORKFLOW_REQUIREMENTS {
        requirements.insert(name.to_string(), Requirement::default());
    }

    let mut workflow = WorkflowDescriptor {
        cwl_version: CWL_VERSION.to_string(),
        class: WORKFLOW_CLASS.to_string(),
        requirements,
        inputs: IndexMap::new(),
        outputs: Vec::new(),
        steps: IndexMap::new(),
    };

    let mut counters: BTreeMap<&str, usize> = BTreeMap::new();

    for node in nodes {
        let counter = counters.entry(node.name.as_str()).or_insert(0);
        let step_name = format!("{}{}", node.name, counter);
        *counter += 1;

        let step = WorkflowStep {
            run: node.cwl_path.display().to_string(),
            inputs: node
                .tool
                .inputs
                .keys()
                .map(|key| (key.clone(), String::new()))
                .collect(),
            out: node.tool.outputs.keys().cloned().collect(),
        };

        for (input_name, input_spec) in &node.tool.inputs {
            workflow
                .inputs
                .insert(format!("{step_name}_{input_name}"), input_spec.ty.clone());
        }

        workflow.steps.insert(step_name, step);
    }

    workflow
}
