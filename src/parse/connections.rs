//! Connection collection normalization.
//!
//! Two shapes are accepted:
//! - edge list: `[{"from": "a", "to": "b", "fromPort": "main"}]`
//! - platform map: `{"Source": {"main": [[{"node": "Target", "type": "main", "index": 0}]]}}`,
//!   where the outer array position is the source output index.

use serde_json::Value;

use super::types::{Connection, Port, RawConnectionTarget, RawEdge};
use crate::error::{Check, Finding};

/// Normalize a connection collection. Malformed entries become `S004`
/// findings and are skipped.
pub fn normalize(value: &Value, findings: &mut Vec<Finding>) -> Vec<Connection> {
    match value {
        Value::Array(entries) => from_edge_list(entries, findings),
        Value::Object(map) => {
            let mut connections = Vec::new();
            for (source, ports) in map {
                from_port_map(source, ports, &mut connections, findings);
            }
            connections
        }
        _ => Vec::new(),
    }
}

fn from_edge_list(entries: &[Value], findings: &mut Vec<Finding>) -> Vec<Connection> {
    let mut connections = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<RawEdge>(entry.clone()) {
            Ok(edge) => connections.push(Connection {
                source: edge.from,
                source_port: port_from_handle(edge.from_port),
                target: edge.to,
                target_port: port_from_handle(edge.to_port),
            }),
            Err(e) => findings.push(malformed(format!("connection at index {i} is malformed: {e}"), None)),
        }
    }
    connections
}

/// Edge-list handles name either an AI connection kind or a branch of a
/// `main` output. Only the former changes the connection kind.
fn port_from_handle(handle: Option<String>) -> Port {
    match handle {
        Some(handle) if handle.trim().is_empty() => Port::main(0),
        Some(handle) if handle.starts_with("ai_") => Port::new(handle, 0),
        Some(handle) => Port {
            label: Some(handle),
            ..Port::main(0)
        },
        None => Port::main(0),
    }
}

fn from_port_map(
    source: &str,
    ports: &Value,
    connections: &mut Vec<Connection>,
    findings: &mut Vec<Finding>,
) {
    let Some(ports) = ports.as_object() else {
        findings.push(malformed(
            format!("connections of '{source}' must be an object keyed by port type"),
            Some(source.to_string()),
        ));
        return;
    };

    for (kind, outputs) in ports {
        let Some(outputs) = outputs.as_array() else {
            findings.push(malformed(
                format!("'{kind}' connections of '{source}' must be an array of outputs"),
                Some(source.to_string()),
            ));
            continue;
        };

        for (output_index, targets) in outputs.iter().enumerate() {
            // Unconnected outputs are exported as null or [].
            let targets = match targets {
                Value::Null => continue,
                Value::Array(targets) => targets,
                _ => {
                    findings.push(malformed(
                        format!("'{kind}' output {output_index} of '{source}' must be an array"),
                        Some(source.to_string()),
                    ));
                    continue;
                }
            };

            for target in targets {
                match serde_json::from_value::<RawConnectionTarget>(target.clone()) {
                    Ok(t) => connections.push(Connection {
                        source: source.to_string(),
                        source_port: Port::new(kind.clone(), output_index),
                        target: t.node,
                        target_port: Port::new(t.kind, t.index),
                    }),
                    Err(e) => findings.push(malformed(
                        format!("'{kind}' output {output_index} of '{source}' has a malformed target: {e}"),
                        Some(source.to_string()),
                    )),
                }
            }
        }
    }
}

fn malformed(message: String, node_id: Option<String>) -> Finding {
    Finding::error(Check::Shape, "S004", message, node_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edge_list_defaults_to_main_ports() {
        let mut findings = Vec::new();
        let conns = normalize(&json!([{"from": "a", "to": "b"}]), &mut findings);
        assert!(findings.is_empty());
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].source_port, Port::main(0));
        assert_eq!(conns[0].target, "b");
    }

    #[test]
    fn edge_list_accepts_source_target_aliases() {
        let mut findings = Vec::new();
        let conns = normalize(
            &json!([{"source": "a", "target": "b", "sourceHandle": "true"}]),
            &mut findings,
        );
        assert!(findings.is_empty());
        assert_eq!(conns[0].source, "a");
        assert_eq!(conns[0].source_port.kind, "main");
        assert_eq!(conns[0].source_port.label.as_deref(), Some("true"));
    }

    #[test]
    fn edge_list_ai_handle_sets_connection_kind() {
        let mut findings = Vec::new();
        let conns = normalize(
            &json!([{"from": "model", "to": "agent", "fromPort": "ai_languageModel"}]),
            &mut findings,
        );
        assert!(conns[0].source_port.is_ai());
        assert_eq!(conns[0].source_port.label, None);
    }

    #[test]
    fn port_map_tracks_output_index() {
        let mut findings = Vec::new();
        let conns = normalize(
            &json!({
                "If": {"main": [
                    [{"node": "Yes", "type": "main", "index": 0}],
                    [{"node": "No", "type": "main", "index": 0}]
                ]}
            }),
            &mut findings,
        );
        assert!(findings.is_empty());
        assert_eq!(conns.len(), 2);
        assert_eq!(conns[1].target, "No");
        assert_eq!(conns[1].source_port, Port::main(1));
    }

    #[test]
    fn port_map_skips_null_outputs() {
        let mut findings = Vec::new();
        let conns = normalize(
            &json!({"A": {"main": [null, [], [{"node": "B"}]]}}),
            &mut findings,
        );
        assert!(findings.is_empty());
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].source_port.index, 2);
    }

    #[test]
    fn malformed_entries_are_reported_and_skipped() {
        let mut findings = Vec::new();
        let conns = normalize(&json!([{"from": "a"}, {"from": "a", "to": "b"}]), &mut findings);
        assert_eq!(conns.len(), 1);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].code, "S004");
        assert!(findings[0].message.contains("index 0"));
    }
}
