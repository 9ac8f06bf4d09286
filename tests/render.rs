//! Tests for document and flattened (tfvars JSON) rendering.
//!
//! - Document output keeps the JSON:API shape
//! - Flattened output types values and masks sensitive ones

use tfcvars::output::render;
use tfcvars::cli::OutputFormat;
use tfcvars::{PrettyPrint, TfcError, ValueType, Variable, VariableSet};

const WORKSPACE_VARS: &str = include_str!("fixtures/workspace_vars.json");

fn fixture() -> VariableSet {
    VariableSet::from_json(WORKSPACE_VARS.as_bytes()).unwrap()
}

// ============================================================================
// Flattened Output Tests
// ============================================================================

#[test]
fn test_flat_hcl_list() {
    let variables = VariableSet::new(vec![
        Variable::new("cidr_subnet", r#"["10.0.5.0/24"]"#).with_hcl(true)
    ]);

    assert_eq!(
        variables.render_flat(false).unwrap(),
        r#"{"cidr_subnet":["10.0.5.0/24"]}"#
    );
}

#[test]
fn test_flat_number() {
    let variables = VariableSet::new(vec![Variable::new("count", "10")]);

    assert_eq!(variables.render_flat(false).unwrap(), r#"{"count":10}"#);
}

#[test]
fn test_flat_quoted_string() {
    let variables = VariableSet::new(vec![Variable::new("name", "\"api\"")]);

    assert_eq!(variables.render_flat(false).unwrap(), r#"{"name":"api"}"#);
}

#[test]
fn test_flat_declared_string() {
    let mut variables = VariableSet::new(vec![Variable::new("name", "api")]);
    variables.declare_type("name", ValueType::String);

    assert_eq!(variables.render_flat(false).unwrap(), r#"{"name":"api"}"#);
}

#[test]
fn test_flat_undeclared_bare_word_is_string() {
    let variables = VariableSet::new(vec![Variable::new("name", "api")]);

    assert_eq!(variables.render_flat(false).unwrap(), r#"{"name":"api"}"#);
}

#[test]
fn test_flat_undeclared_empty_value_is_empty_string() {
    let variables = VariableSet::new(vec![Variable::new("suffix", "")]);

    assert_eq!(variables.render_flat(false).unwrap(), r#"{"suffix":""}"#);
}

#[test]
fn test_flat_keeps_stored_text_of_json_values() {
    let cases = [
        ("big", "12345678901234567890123"),
        ("pi", "3.14159265358979323846"),
        ("exp", "1e2"),
        ("flag", "true"),
        ("nothing", "null"),
    ];
    let variables: VariableSet = cases.iter().map(|(k, v)| Variable::new(*k, *v)).collect();

    assert_eq!(
        variables.render_flat(false).unwrap(),
        r#"{"big":12345678901234567890123,"exp":1e2,"flag":true,"nothing":null,"pi":3.14159265358979323846}"#
    );
}

#[test]
fn test_flat_declared_type_mismatch_is_error() {
    let mut variables = VariableSet::new(vec![Variable::new("count", "ten")]);
    variables.declare_type("count", ValueType::Number);

    let err = variables.render_flat(false).unwrap_err();
    assert!(matches!(err, TfcError::InvalidValue { ref key, .. } if key == "count"));
}

#[test]
fn test_flat_sensitive_regardless_of_value() {
    for value in ["", "10", "hunter2", r#"["a"]"#] {
        let variables =
            VariableSet::new(vec![Variable::new("secret", value).with_sensitive(true)]);
        assert_eq!(
            variables.render_flat(false).unwrap(),
            r#"{"secret":"sensitive"}"#,
            "value {value:?}"
        );
    }
}

#[test]
fn test_flat_fixture() {
    let flat: serde_json::Value =
        serde_json::from_str(&fixture().render_flat(true).unwrap()).unwrap();

    assert_eq!(flat["cidr_subnet"][0], "10.0.5.0/24");
    assert_eq!(flat["database_name"], "db");
    assert_eq!(flat["db_password"], "sensitive");
}

// ============================================================================
// Document Output Tests
// ============================================================================

#[test]
fn test_document_output_is_valid_json() {
    let json_output = fixture().render_document(true).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert!(parsed["data"].is_array());
    assert_eq!(parsed["data"].as_array().unwrap().len(), 3);
}

#[test]
fn test_document_output_preserves_attributes() {
    let json_output = fixture().render_document(false).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json_output).unwrap();

    let first = &parsed["data"][0];
    assert_eq!(first["id"], "var-yYXXXXXXXXX");
    assert_eq!(first["type"], "vars");
    assert_eq!(first["attributes"]["hcl"], true);
    assert_eq!(first["attributes"]["category"], "terraform");
    assert!(first["attributes"]["description"].is_null());
}

// ============================================================================
// Table Output Tests
// ============================================================================

#[test]
fn test_table_output_is_not_json() {
    let output = render(&fixture(), OutputFormat::Table, true).unwrap();

    let parse_result: Result<serde_json::Value, _> = serde_json::from_str(&output);
    assert!(parse_result.is_err(), "Table output should NOT be valid JSON");
    assert!(output.contains("cidr_subnet"));
    assert_eq!(output, fixture().pretty_print());
}
