use serde::de::Error as _;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::datapipe::tools::error::{Result, ToolError};
use crate::datapipe::tools::model::{ParameterDescriptor, PrimitiveKind, TypeShape};

/// Primitive type name in the target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Int,
    Float,
    Boolean,
}

impl Primitive {
    /// Maps a declared kind onto its target primitive. `Choice` loses its
    /// enumeration and `Tuple` its arity; both collapse to `string`.
    pub fn from_kind(kind: &PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::String | PrimitiveKind::Choice { .. } | PrimitiveKind::Tuple => {
                Primitive::String
            }
            PrimitiveKind::Integer => Primitive::Int,
            PrimitiveKind::Float => Primitive::Float,
            PrimitiveKind::Boolean => Primitive::Boolean,
        }
    }
}

/// Constant tag carried by array type nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayMarker {
    #[serde(rename = "array")]
    Array,
}

/// Binding of a parameter to its command-line flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputBinding {
    /// Flag token prepended to the bound value.
    pub prefix: String,
}

/// An array type node. For repeatable parameters the consuming workflow
/// engine expects the default value and the input binding nested here rather
/// than on the enclosing input spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    #[serde(rename = "type")]
    pub marker: ArrayMarker,
    pub items: Box<TypeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(
        rename = "inputBinding",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub input_binding: Option<InputBinding>,
}

impl ArrayType {
    /// Creates a plain array of the given item type.
    pub fn of(items: TypeNode) -> Self {
        Self {
            marker: ArrayMarker::Array,
            items: Box::new(items),
            default: None,
            input_binding: None,
        }
    }
}

/// One node of a type expression: the `null` branch of an optional wrapper, a
/// primitive name, or a (possibly nested) array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeNode {
    Null,
    Primitive(Primitive),
    Array(ArrayType),
}

impl TypeNode {
    /// Structural copy stripped of any embedded default or input binding, as
    /// required when mirroring an input type into a derived output.
    pub fn forwarded(&self) -> TypeNode {
        match self {
            TypeNode::Null => TypeNode::Null,
            TypeNode::Primitive(primitive) => TypeNode::Primitive(*primitive),
            TypeNode::Array(array) => TypeNode::Array(ArrayType::of(array.items.forwarded())),
        }
    }
}

/// Complete type expression of an input: either the core type alone, or the
/// two-element optional wrapper `[null, core]` for non-required inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    Required(TypeNode),
    Optional(TypeNode),
}

impl TypeExpr {
    /// The core type, with any optional wrapper stripped.
    pub fn core(&self) -> &TypeNode {
        match self {
            TypeExpr::Required(node) | TypeExpr::Optional(node) => node,
        }
    }

    /// Whether the expression carries the optional wrapper.
    pub fn is_optional(&self) -> bool {
        matches!(self, TypeExpr::Optional(_))
    }
}

impl Serialize for TypeExpr {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TypeExpr::Required(node) => node.serialize(serializer),
            TypeExpr::Optional(node) => {
                let mut seq = serializer.serialize_seq(Some(2))?;
                seq.serialize_element(&TypeNode::Null)?;
                seq.serialize_element(node)?;
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for TypeExpr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Single(TypeNode),
            Union(Vec<TypeNode>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Single(node) => Ok(TypeExpr::Required(node)),
            Repr::Union(mut nodes) => {
                let core = nodes
                    .pop()
                    .ok_or_else(|| D::Error::custom("empty type union"))?;
                if nodes != [TypeNode::Null] {
                    return Err(D::Error::custom(
                        "unsupported type union: expected [null, core]",
                    ));
                }
                Ok(TypeExpr::Optional(core))
            }
        }
    }
}

/// Result of classifying one descriptor: the type expression plus the pieces
/// that belong on the enclosing input spec rather than inside the type.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedParameter {
    pub ty: TypeExpr,
    pub default: Option<Value>,
    pub input_binding: Option<InputBinding>,
}

/// Classifies a descriptor into its type expression and decides where the
/// default value and the invocation binding are placed.
///
/// The mapping is total over the legal descriptor space: every kind maps to a
/// primitive and every shape to a nesting depth. The single undefined
/// combination, a boolean consuming more than one token per occurrence, is
/// rejected; so is a zero arity.
pub fn classify(param: &ParameterDescriptor) -> Result<ClassifiedParameter> {
    if param.arity == 0 || (matches!(param.kind, PrimitiveKind::Boolean) && param.arity > 1) {
        return Err(ToolError::InvalidParameterShape {
            name: param.name.clone(),
            kind: param.kind.clone(),
            arity: param.arity,
        });
    }

    let primitive = TypeNode::Primitive(Primitive::from_kind(&param.kind));
    let binding = InputBinding {
        prefix: param.flag.clone(),
    };

    let (core, spec_default, spec_binding) = match param.shape() {
        TypeShape::Scalar => (primitive, param.default.clone(), Some(binding)),
        TypeShape::FixedArity => (
            TypeNode::Array(ArrayType::of(primitive)),
            param.default.clone(),
            Some(binding),
        ),
        TypeShape::Repeated => {
            let mut array = ArrayType::of(primitive);
            array.default = param.default.clone();
            array.input_binding = Some(binding);
            (TypeNode::Array(array), None, None)
        }
        TypeShape::RepeatedFixedArity => {
            let mut array = ArrayType::of(TypeNode::Array(ArrayType::of(primitive)));
            array.default = param.default.clone();
            array.input_binding = Some(binding);
            (TypeNode::Array(array), None, None)
        }
    };

    let ty = if param.required {
        TypeExpr::Required(core)
    } else {
        TypeExpr::Optional(core)
    };

    Ok(ClassifiedParameter {
        ty,
        default: spec_default,
        input_binding: spec_binding,
    })
}
