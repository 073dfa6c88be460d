use yul_ir::builders::*;
use yul_ir::{Block, Expression, Statement};

#[test]
fn statements_are_tagged_by_kind() {
    let module = block(vec![nested(vec![let_(
        &["r"],
        Some(call("id", vec![number("5")])),
    )])]);

    let json = serde_json::to_value(&module).expect("serialize module");
    let inner = &json["statements"][0];
    assert_eq!(inner["kind"], "Block");
    let decl = &inner["statements"][0];
    assert_eq!(decl["kind"], "VariableDeclaration");
    assert_eq!(decl["value"]["kind"], "FunctionCall");
    assert_eq!(decl["value"]["function_name"]["name"], "id");
    let literal = &decl["value"]["arguments"][0];
    assert_eq!(literal["kind"], "Literal");
    assert_eq!(literal["literal_kind"], "Number");
    assert_eq!(literal["value"], "5");

    let back: Block = serde_json::from_value(json).expect("deserialize module");
    assert_eq!(back, module);
}

#[test]
fn missing_type_tags_default_to_empty() {
    let src = r#"{
        "statements": [
            {
                "kind": "FunctionDefinition",
                "name": "f",
                "parameters": [{ "name": "a" }],
                "return_variables": [{ "name": "r", "type_name": "u256" }],
                "body": { "statements": [] }
            }
        ]
    }"#;

    let module: Block = serde_json::from_str(src).expect("parse module");
    let Statement::FunctionDefinition(fun) = &module.statements[0] else {
        panic!("expected function definition, got {:?}", module.statements[0]);
    };
    assert_eq!(fun.parameters[0].type_name, "");
    assert_eq!(fun.return_variables[0].type_name, "u256");
    assert_eq!(module.to_string(), "{\n    function f(a) -> r:u256 { }\n}");
}

#[test]
fn identifiers_convert_into_expressions() {
    let expr: Expression = yul_ir::Identifier::new("x").into();
    assert_eq!(expr.as_identifier().map(|id| id.name.as_str()), Some("x"));
    assert!(number("1").as_identifier().is_none());

    let literal: Expression = number_literal("7").into();
    assert!(matches!(literal, Expression::Literal(ref lit) if lit.value == "7"));
    assert!(Block::default().is_empty());
    assert!(!block(vec![expr_stmt(literal)]).is_empty());
}
