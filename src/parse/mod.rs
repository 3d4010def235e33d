//! Parse phase: JSON → normalized document + graph construction.
//!
//! Covers checks 1 (syntax) and 2 (top-level shape).

pub mod connections;
pub mod graph;
pub mod types;

pub use graph::WorkflowGraph;
pub use types::*;

use serde_json::Value;

use crate::error::{Check, Finding};

/// A document that survived the fatal parse checks, with any non-fatal
/// shape findings for entries that were skipped.
#[derive(Debug, Clone)]
pub struct Parsed {
    pub document: WorkflowDocument,
    pub findings: Vec<Finding>,
}

/// Parse a workflow JSON string.
///
/// `Err` carries the findings that stop validation of this document: invalid
/// JSON, or a missing node/connection collection.
pub fn parse(json: &str) -> Result<Parsed, Vec<Finding>> {
    let root: Value = serde_json::from_str(json)
        .map_err(|e| vec![Finding::parse(format!("Failed to parse workflow JSON: {}", e))])?;
    parse_value(&root)
}

/// Shape-check an already-decoded JSON value.
pub fn parse_value(root: &Value) -> Result<Parsed, Vec<Finding>> {
    let Some(object) = root.as_object() else {
        return Err(vec![Finding::error(
            Check::Shape,
            "S001",
            "document root must be a JSON object",
            None,
        )]);
    };

    let mut fatal = Vec::new();
    let raw_nodes = object.get("nodes");
    let raw_connections = object.get("connections");

    match raw_nodes {
        Some(Value::Array(_)) => {}
        Some(_) => fatal.push(Finding::error(Check::Shape, "S001", "'nodes' must be an array", None)),
        None => fatal.push(Finding::error(
            Check::Shape,
            "S001",
            "document has no 'nodes' collection",
            None,
        )),
    }
    match raw_connections {
        Some(Value::Array(_)) | Some(Value::Object(_)) => {}
        Some(_) => fatal.push(Finding::error(
            Check::Shape,
            "S002",
            "'connections' must be an array or an object",
            None,
        )),
        None => fatal.push(Finding::error(
            Check::Shape,
            "S002",
            "document has no 'connections' collection",
            None,
        )),
    }
    if !fatal.is_empty() {
        return Err(fatal);
    }

    let mut findings = Vec::new();
    let nodes = match raw_nodes {
        Some(Value::Array(entries)) => parse_nodes(entries, &mut findings),
        _ => Vec::new(),
    };
    let connections = raw_connections
        .map(|c| connections::normalize(c, &mut findings))
        .unwrap_or_default();

    let document = WorkflowDocument {
        id: object.get("id").and_then(scalar_to_string),
        name: object.get("name").and_then(scalar_to_string),
        active: object.get("active").and_then(Value::as_bool).unwrap_or(false),
        nodes,
        connections,
    };

    Ok(Parsed { document, findings })
}

fn parse_nodes(entries: &[Value], findings: &mut Vec<Finding>) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let raw = match serde_json::from_value::<RawNode>(entry.clone()) {
            Ok(raw) => raw,
            Err(e) => {
                findings.push(Finding::error(
                    Check::Shape,
                    "S003",
                    format!("node at index {i} is malformed: {e}"),
                    None,
                ));
                continue;
            }
        };

        // Exports that predate node ids identify nodes by name.
        let Some(id) = raw.id.clone().or_else(|| raw.name.clone()) else {
            findings.push(Finding::error(
                Check::Shape,
                "S003",
                format!("node at index {i} has neither an id nor a name"),
                None,
            ));
            continue;
        };

        nodes.push(Node {
            id,
            name: raw.name,
            node_type: raw.node_type,
            type_version: raw.type_version,
            disabled: raw.disabled,
            parameters: raw.parameters,
            credentials: raw
                .credentials
                .into_iter()
                .map(|(kind, cred)| (kind, cred.into()))
                .collect(),
        });
    }
    nodes
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
