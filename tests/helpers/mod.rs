#![allow(dead_code)]

use n8n_validate::{ValidationReport, Validator, ValidatorConfig};
use serde_json::{Value, json};

// =============================================================================
// Document builders
// =============================================================================

pub fn node(id: &str, node_type: &str) -> Value {
    json!({ "id": id, "type": node_type })
}

pub fn node_with_params(id: &str, node_type: &str, parameters: Value) -> Value {
    json!({ "id": id, "type": node_type, "parameters": parameters })
}

pub fn edge(from: &str, to: &str) -> Value {
    json!({ "from": from, "to": to })
}

/// Edge-list workflow document.
pub fn workflow(nodes: Vec<Value>, connections: Vec<Value>) -> String {
    json!({
        "id": "test-wf",
        "name": "Test Workflow",
        "active": false,
        "nodes": nodes,
        "connections": connections,
    })
    .to_string()
}

// =============================================================================
// Validation shortcuts
// =============================================================================

pub fn validate(json: &str) -> ValidationReport {
    Validator::default().validate_str("test.json", json)
}

pub fn validate_with(config: &ValidatorConfig, json: &str) -> ValidationReport {
    Validator::from_config(config).validate_str("test.json", json)
}

pub fn codes(report: &ValidationReport) -> Vec<&str> {
    report.findings.iter().map(|f| f.code.as_str()).collect()
}

pub fn errors(report: &ValidationReport) -> Vec<&str> {
    report
        .findings
        .iter()
        .filter(|f| f.is_error())
        .map(|f| f.code.as_str())
        .collect()
}
