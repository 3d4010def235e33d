//! Rust types for n8n workflow documents.
//!
//! `Raw*` types are the serde targets for the exported JSON. They are
//! normalized into [`WorkflowDocument`] one entry at a time so a single
//! malformed node or connection does not hide problems in the rest of the
//! document.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// NORMALIZED DOCUMENT
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    pub active: bool,
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: Option<String>,
    pub node_type: String,
    pub type_version: Option<f64>,
    pub disabled: bool,
    pub parameters: Map<String, Value>,
    pub credentials: BTreeMap<String, CredentialRef>,
}

impl Node {
    /// The node's display name, falling back to its id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialRef {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl CredentialRef {
    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().is_none_or(|s| s.trim().is_empty());
        blank(&self.id) && blank(&self.name)
    }
}

/// A named port on a node: connection kind (`main`, `ai_languageModel`, ...)
/// plus its position among ports of that kind. Edge-list documents may also
/// name a branch handle (`"true"`, `"false"`, ...) which is kept as `label`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Port {
    pub kind: String,
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Port {
    pub fn new(kind: impl Into<String>, index: usize) -> Self {
        Port {
            kind: kind.into(),
            index,
            label: None,
        }
    }

    pub fn main(index: usize) -> Self {
        Port::new("main", index)
    }

    /// AI sub-node connection kinds (`ai_languageModel`, `ai_tool`, ...).
    pub fn is_ai(&self) -> bool {
        self.kind.starts_with("ai_")
    }
}

/// Directed edge. Endpoints hold node references as written in the
/// document (an id, or a node name in the platform's native format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub source_port: Port,
    pub target: String,
    pub target_port: Port,
}

// =============================================================================
// RAW SERDE TARGETS
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    pub type_version: Option<f64>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub credentials: BTreeMap<String, RawCredential>,
}

/// Older exports store a credential as its display name only.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawCredential {
    Named(String),
    Ref {
        id: Option<String>,
        name: Option<String>,
    },
}

impl From<RawCredential> for CredentialRef {
    fn from(raw: RawCredential) -> Self {
        match raw {
            RawCredential::Named(name) => CredentialRef {
                id: None,
                name: Some(name),
            },
            RawCredential::Ref { id, name } => CredentialRef { id, name },
        }
    }
}

/// Edge-list connection entry: `{"from": "a", "to": "b"}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    #[serde(alias = "source")]
    pub from: String,
    #[serde(alias = "target")]
    pub to: String,
    #[serde(default, alias = "sourceHandle")]
    pub from_port: Option<String>,
    #[serde(default, alias = "targetHandle")]
    pub to_port: Option<String>,
}

/// One target inside the platform's connection map:
/// `{"node": "Target Name", "type": "main", "index": 0}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConnectionTarget {
    pub node: String,
    #[serde(rename = "type", default = "default_port_kind")]
    pub kind: String,
    #[serde(default)]
    pub index: usize,
}

fn default_port_kind() -> String {
    "main".into()
}

/// Node ids are strings in current exports; some generators emit numbers.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "node id must be a string or a number, found {other}"
        ))),
    }
}
