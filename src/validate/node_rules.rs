//! Per-node semantic rules (check 5), driven by the node-type registry.

use serde_json::Value;

use crate::error::{Check, Finding};
use crate::parse::types::Node;
use crate::registry::{NodeTypeRegistry, ParamRule};

/// Validate a single node against its registered type. Returns all findings.
pub fn validate_node(node: &Node, registry: &NodeTypeRegistry) -> Vec<Finding> {
    let mut findings = Vec::new();
    let node_id = Some(node.id.clone());

    validate_credential_refs(node, &mut findings);

    let Some(spec) = registry.lookup(&node.node_type) else {
        findings.push(Finding::warning(
            Check::NodeRules,
            "N001",
            format!("unknown node type '{}'", node.node_type),
            node_id,
        ));
        return findings;
    };

    if let Some(replacement) = &spec.deprecated_by {
        findings.push(Finding::warning(
            Check::NodeRules,
            "N002",
            format!(
                "node type '{}' is deprecated, use '{}'",
                node.node_type, replacement
            ),
            node_id.clone(),
        ));
    }

    for rule in &spec.required {
        if rule.default.is_none() && !is_declared(node, rule) {
            findings.push(Finding::error(
                Check::NodeRules,
                "N003",
                missing_param_message(rule),
                node_id.clone(),
            ));
        }
    }

    for deprecated in &spec.deprecated_params {
        if node.parameters.contains_key(&deprecated.name) {
            findings.push(Finding::warning(
                Check::NodeRules,
                "N004",
                format!(
                    "parameter '{}' is deprecated: {}",
                    deprecated.name, deprecated.hint
                ),
                node_id.clone(),
            ));
        }
    }

    if !spec.credentials.is_empty()
        && !spec
            .credentials
            .iter()
            .any(|kind| node.credentials.contains_key(kind))
    {
        findings.push(Finding::warning(
            Check::NodeRules,
            "N006",
            format!(
                "no credential referenced, expected one of: {}",
                spec.credentials.join(", ")
            ),
            node_id,
        ));
    }

    findings
}

fn validate_credential_refs(node: &Node, findings: &mut Vec<Finding>) {
    for (kind, cred) in &node.credentials {
        if cred.is_empty() {
            findings.push(Finding::error(
                Check::NodeRules,
                "N005",
                format!("credential '{}' has neither an id nor a name", kind),
                Some(node.id.clone()),
            ));
        }
    }
}

fn is_declared(node: &Node, rule: &ParamRule) -> bool {
    rule.names()
        .any(|name| node.parameters.get(name).is_some_and(is_present))
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn missing_param_message(rule: &ParamRule) -> String {
    if rule.alternatives.is_empty() {
        format!("missing required parameter '{}'", rule.name)
    } else {
        let alternatives: Vec<String> = rule
            .alternatives
            .iter()
            .map(|a| format!("'{}'", a))
            .collect();
        format!(
            "missing required parameter '{}' (or {})",
            rule.name,
            alternatives.join(", ")
        )
    }
}
