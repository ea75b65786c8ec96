use datapipe_tools::ToolError;
use datapipe_tools::cwl::types::{ArrayType, Primitive, TypeExpr, TypeNode};
use datapipe_tools::cwl::{self, ToolDescriptor};
use datapipe_tools::io::cwl_read;
use datapipe_tools::io::cwl_write::{self, CWL_MARKER};
use datapipe_tools::model::{CommandModel, ParameterDescriptor, PrimitiveKind};

fn descriptor(name: &str, kind: PrimitiveKind, flag: &str) -> ParameterDescriptor {
    ParameterDescriptor {
        name: name.to_string(),
        help: None,
        required: true,
        multiple: false,
        arity: 1,
        kind,
        default: None,
        flag: flag.to_string(),
    }
}

fn command(parameters: Vec<ParameterDescriptor>) -> CommandModel {
    CommandModel {
        name: "example".to_string(),
        help: Some("An example command".to_string()),
        parameters,
    }
}

fn compile_single(param: ParameterDescriptor) -> ToolDescriptor {
    cwl::compile(&command(vec![param]), None, None).expect("compiled")
}

#[test]
fn required_scalar_string_maps_to_bare_primitive() {
    let tool = compile_single(descriptor("o", PrimitiveKind::String, "-o"));

    let input = tool.inputs.get("o").expect("input present");
    assert_eq!(
        input.ty,
        TypeExpr::Required(TypeNode::Primitive(Primitive::String))
    );
    assert_eq!(input.default, None);
    let binding = input.input_binding.as_ref().expect("binding on the spec");
    assert_eq!(binding.prefix, "-o");
}

#[test]
fn optional_integer_with_default_wraps_with_null() {
    let mut param = descriptor("n", PrimitiveKind::Integer, "--number");
    param.required = false;
    param.default = Some(serde_json::json!(5));
    let tool = compile_single(param);

    let input = tool.inputs.get("n").expect("input present");
    assert_eq!(
        input.ty,
        TypeExpr::Optional(TypeNode::Primitive(Primitive::Int))
    );
    assert_eq!(input.default, Some(serde_json::json!(5)));
    assert_eq!(
        input.input_binding.as_ref().expect("binding").prefix,
        "--number"
    );
}

#[test]
fn repeated_string_forward_mirrors_core_type() {
    let mut param = descriptor("f", PrimitiveKind::String, "-f");
    param.multiple = true;
    let forwards = vec!["f".to_string()];
    let tool = cwl::compile(&command(vec![param]), None, Some(&forwards)).expect("compiled");

    let input = tool.inputs.get("f").expect("input present");
    let TypeExpr::Required(TypeNode::Array(array)) = &input.ty else {
        panic!("expected a required array type, found {:?}", input.ty);
    };
    assert_eq!(*array.items, TypeNode::Primitive(Primitive::String));
    assert_eq!(
        array.input_binding.as_ref().expect("nested binding").prefix,
        "-f"
    );
    assert_eq!(input.input_binding, None);

    let output = tool.outputs.get("_f").expect("forwarded output");
    assert_eq!(
        output.ty,
        TypeNode::Array(ArrayType::of(TypeNode::Primitive(Primitive::String)))
    );
    assert_eq!(output.output_binding.output_eval, "$(inputs.f)");
}

#[test]
fn forward_strips_optional_wrapper() {
    let mut param = descriptor("count", PrimitiveKind::Integer, "--count");
    param.required = false;
    let forwards = vec!["count".to_string()];
    let tool = cwl::compile(&command(vec![param]), None, Some(&forwards)).expect("compiled");

    let output = tool.outputs.get("_count").expect("forwarded output");
    assert_eq!(output.ty, TypeNode::Primitive(Primitive::Int));
}

#[test]
fn shape_mapping_controls_array_nesting() {
    let mut fixed = descriptor("pair", PrimitiveKind::Float, "--pair");
    fixed.arity = 2;
    let tool = compile_single(fixed);
    let TypeExpr::Required(TypeNode::Array(array)) =
        &tool.inputs.get("pair").expect("input").ty
    else {
        panic!("fixed arity must map to an array");
    };
    assert_eq!(*array.items, TypeNode::Primitive(Primitive::Float));
    // Single-occurrence parameters keep the binding on the spec.
    assert_eq!(array.input_binding, None);

    let mut repeated_fixed = descriptor("grid", PrimitiveKind::Integer, "--grid");
    repeated_fixed.multiple = true;
    repeated_fixed.arity = 3;
    let tool = compile_single(repeated_fixed);
    let TypeExpr::Required(TypeNode::Array(outer)) =
        &tool.inputs.get("grid").expect("input").ty
    else {
        panic!("repeated fixed arity must map to an array");
    };
    let TypeNode::Array(inner) = outer.items.as_ref() else {
        panic!("repeated fixed arity must nest a second array");
    };
    assert_eq!(*inner.items, TypeNode::Primitive(Primitive::Int));
    assert_eq!(outer.input_binding.as_ref().expect("binding").prefix, "--grid");
}

#[test]
fn required_types_never_carry_the_optional_wrapper() {
    let kinds = [
        PrimitiveKind::String,
        PrimitiveKind::Choice {
            choices: vec!["a".to_string(), "b".to_string()],
        },
        PrimitiveKind::Integer,
        PrimitiveKind::Float,
        PrimitiveKind::Boolean,
        PrimitiveKind::Tuple,
    ];

    for kind in kinds {
        for (multiple, arity) in [(false, 1), (false, 2), (true, 1), (true, 2)] {
            if matches!(kind, PrimitiveKind::Boolean) && arity > 1 {
                continue;
            }
            let mut param = descriptor("p", kind.clone(), "-p");
            param.multiple = multiple;
            param.arity = arity;
            let tool = compile_single(param);
            assert!(
                !tool.inputs.get("p").expect("input").ty.is_optional(),
                "required {kind:?} multiple={multiple} arity={arity} must not be wrapped"
            );
        }
    }
}

#[test]
fn choice_and_tuple_collapse_to_string() {
    for kind in [
        PrimitiveKind::Choice {
            choices: vec!["fast".to_string(), "slow".to_string()],
        },
        PrimitiveKind::Tuple,
    ] {
        let tool = compile_single(descriptor("p", kind, "-p"));
        assert_eq!(
            tool.inputs.get("p").expect("input").ty,
            TypeExpr::Required(TypeNode::Primitive(Primitive::String))
        );
    }
}

#[test]
fn repeated_default_nests_inside_the_array_node() {
    let mut param = descriptor("tag", PrimitiveKind::String, "--tag");
    param.multiple = true;
    param.required = false;
    param.default = Some(serde_json::json!(["a", "b"]));
    let tool = compile_single(param);

    let input = tool.inputs.get("tag").expect("input");
    assert_eq!(input.default, None);
    assert_eq!(input.input_binding, None);
    let TypeExpr::Optional(TypeNode::Array(array)) = &input.ty else {
        panic!("expected optional array type");
    };
    assert_eq!(array.default, Some(serde_json::json!(["a", "b"])));
    assert_eq!(array.input_binding.as_ref().expect("binding").prefix, "--tag");
}

#[test]
fn boolean_with_arity_two_is_rejected() {
    let mut param = descriptor("flag", PrimitiveKind::Boolean, "--flag");
    param.arity = 2;
    let error = cwl::compile(&command(vec![param]), None, None).expect_err("must fail");
    assert!(matches!(error, ToolError::InvalidParameterShape { .. }));
}

#[test]
fn zero_arity_is_rejected() {
    let mut param = descriptor("p", PrimitiveKind::String, "-p");
    param.arity = 0;
    let error = cwl::compile(&command(vec![param]), None, None).expect_err("must fail");
    assert!(matches!(error, ToolError::InvalidParameterShape { .. }));
}

#[test]
fn unknown_forward_target_is_rejected() {
    let forwards = vec!["missing".to_string()];
    let error = cwl::compile(
        &command(vec![descriptor("o", PrimitiveKind::String, "-o")]),
        None,
        Some(&forwards),
    )
    .expect_err("must fail");
    match error {
        ToolError::UnknownForwardTarget(name) => assert_eq!(name, "missing"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_parameter_names_are_rejected() {
    let error = cwl::compile(
        &command(vec![
            descriptor("o", PrimitiveKind::String, "-o"),
            descriptor("o", PrimitiveKind::Integer, "-O"),
        ]),
        None,
        None,
    )
    .expect_err("must fail");
    match error {
        ToolError::DuplicateParameter(name) => assert_eq!(name, "o"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn alias_becomes_base_command_verbatim() {
    let alias = vec!["datapipe".to_string(), "example".to_string()];
    let tool = cwl::compile(&command(vec![]), Some(&alias), None).expect("compiled");
    assert_eq!(tool.base_command, alias);

    let tool = cwl::compile(&command(vec![]), None, None).expect("compiled");
    assert!(tool.base_command.is_empty());
}

#[test]
fn outputs_follow_forward_order_not_declaration_order() {
    let params = vec![
        descriptor("a", PrimitiveKind::String, "-a"),
        descriptor("b", PrimitiveKind::String, "-b"),
    ];
    let forwards = vec!["b".to_string(), "a".to_string()];
    let tool = cwl::compile(&command(params), None, Some(&forwards)).expect("compiled");

    let keys: Vec<&String> = tool.outputs.keys().collect();
    assert_eq!(keys, ["_b", "_a"]);
    let input_keys: Vec<&String> = tool.inputs.keys().collect();
    assert_eq!(input_keys, ["a", "b"]);
}

#[test]
fn rendered_document_keeps_marker_and_field_order() {
    let mut param = descriptor("input_folder", PrimitiveKind::String, "-i");
    param.help = Some("Input dataset folder".to_string());
    let forwards = vec!["input_folder".to_string()];
    let alias = vec!["datapipe".to_string(), "example".to_string()];
    let tool =
        cwl::compile(&command(vec![param]), Some(&alias), Some(&forwards)).expect("compiled");

    let rendered = cwl_write::render(&tool).expect("rendered");
    let mut lines = rendered.lines();
    assert_eq!(lines.next(), Some(CWL_MARKER));

    let order = [
        "cwlVersion:",
        "class: CommandLineTool",
        "doc:",
        "baseCommand:",
        "inputs:",
        "outputs:",
    ];
    let positions: Vec<usize> = order
        .iter()
        .map(|field| rendered.find(field).expect("field present"))
        .collect();
    assert!(
        positions.windows(2).all(|pair| pair[0] < pair[1]),
        "fields out of order in:\n{rendered}"
    );
}

#[test]
fn rendered_document_parses_back_unchanged() {
    let mut optional = descriptor("n", PrimitiveKind::Integer, "--number");
    optional.required = false;
    optional.default = Some(serde_json::json!(5));
    let mut repeated = descriptor("f", PrimitiveKind::String, "-f");
    repeated.multiple = true;
    let forwards = vec!["f".to_string(), "n".to_string()];
    let alias = vec!["datapipe".to_string()];

    let tool = cwl::compile(
        &command(vec![optional, repeated]),
        Some(&alias),
        Some(&forwards),
    )
    .expect("compiled");

    let rendered = cwl_write::render(&tool).expect("rendered");
    let parsed = cwl_read::parse_tool(&rendered).expect("parsed");
    assert_eq!(parsed, tool);
}
