use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Primitive kind declared by a CLI parameter.
///
/// `Choice` keeps its enumeration and `Tuple` exists as a distinct kind even
/// though both compile to a plain `string` in the target format; the extra
/// information is discarded at classification time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Free-form string value.
    String,
    /// String value restricted to a fixed set of choices.
    Choice { choices: Vec<String> },
    /// Integer value.
    Integer,
    /// Floating point value.
    Float,
    /// Boolean switch.
    Boolean,
    /// Fixed group of heterogeneous values, serialised as an opaque string.
    Tuple,
}

/// Cardinality class derived from a descriptor's multiplicity and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeShape {
    /// One occurrence, one token.
    Scalar,
    /// One occurrence consuming a fixed number of tokens.
    FixedArity,
    /// Any number of occurrences, one token each.
    Repeated,
    /// Any number of occurrences, a fixed number of tokens each.
    RepeatedFixedArity,
}

impl TypeShape {
    /// Derives the shape from the multiplicity flag and the per-occurrence
    /// token count. Callers must validate `arity >= 1` first.
    pub fn from_cardinality(multiple: bool, arity: u32) -> Self {
        match (multiple, arity > 1) {
            (false, false) => TypeShape::Scalar,
            (false, true) => TypeShape::FixedArity,
            (true, false) => TypeShape::Repeated,
            (true, true) => TypeShape::RepeatedFixedArity,
        }
    }
}

/// One CLI parameter as seen by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    /// Unique identifier used as the input key.
    pub name: String,
    /// Human-readable description shown in the generated document.
    #[serde(default)]
    pub help: Option<String>,
    /// Whether a value must be supplied on the invocation.
    #[serde(default)]
    pub required: bool,
    /// Whether the parameter may be repeated on the invocation.
    #[serde(default)]
    pub multiple: bool,
    /// Number of scalar tokens consumed per occurrence.
    #[serde(default = "default_arity")]
    pub arity: u32,
    /// Declared primitive kind.
    #[serde(flatten)]
    pub kind: PrimitiveKind,
    /// Default value, type-compatible with the primitive kind.
    #[serde(default)]
    pub default: Option<Value>,
    /// Primary flag token used to bind a value on the command line.
    pub flag: String,
}

fn default_arity() -> u32 {
    1
}

impl ParameterDescriptor {
    /// Derives the cardinality shape of this descriptor.
    pub fn shape(&self) -> TypeShape {
        TypeShape::from_cardinality(self.multiple, self.arity)
    }
}

/// A command declaration consumed from the ingestion layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandModel {
    /// Command name, used to derive output file names.
    pub name: String,
    /// Command help text, copied into the document's `doc` field.
    #[serde(default)]
    pub help: Option<String>,
    /// Ordered parameter declarations.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
}
