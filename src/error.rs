//! Findings recorded per document, plus the hard failures that abort a run.

use std::path::PathBuf;

use serde::Serialize;

/// The validation check that produced a finding. Declaration order is the
/// order checks run in, and the primary sort key for findings. Serialized as
/// its check number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Check {
    Syntax,
    Shape,
    UniqueIds,
    Endpoints,
    NodeRules,
    Reachability,
    Cycles,
}

impl Check {
    pub fn number(&self) -> u8 {
        match self {
            Check::Syntax => 1,
            Check::Shape => 2,
            Check::UniqueIds => 3,
            Check::Endpoints => 4,
            Check::NodeRules => 5,
            Check::Reachability => 6,
            Check::Cycles => 7,
        }
    }
}

impl Serialize for Check {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub code: String,
    pub check: Check,
    pub severity: Severity,
    pub message: String,
    pub node_id: Option<String>,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.node_id {
            Some(id) => write!(
                f,
                "{:<7} [{}] {}: {}",
                self.severity.to_string(),
                self.code,
                id,
                self.message
            ),
            None => write!(
                f,
                "{:<7} [{}] {}",
                self.severity.to_string(),
                self.code,
                self.message
            ),
        }
    }
}

impl Finding {
    pub fn error(
        check: Check,
        code: &str,
        message: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        Finding {
            code: code.into(),
            check,
            severity: Severity::Error,
            message: message.into(),
            node_id,
        }
    }

    pub fn warning(
        check: Check,
        code: &str,
        message: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        Finding {
            code: code.into(),
            check,
            severity: Severity::Warning,
            message: message.into(),
            node_id,
        }
    }

    /// Build a finding whose severity is decided by configuration.
    pub fn with_severity(
        severity: Severity,
        check: Check,
        code: &str,
        message: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        Finding {
            code: code.into(),
            check,
            severity,
            message: message.into(),
            node_id,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Finding::error(Check::Syntax, "P001", message, None)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Environment-level failures. These abort the run; everything wrong with a
/// document's contents is a [`Finding`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    #[error("cannot read input '{}': {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error scanning '{}': {message}", .path.display())]
    Scan { path: PathBuf, message: String },

    #[error("invalid config '{}': {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finding_display_includes_node_context() {
        let f = Finding::error(
            Check::Endpoints,
            "S007",
            "connection references unknown destination node 'missing'",
            Some("trigger1".into()),
        );
        assert_eq!(
            f.to_string(),
            "error   [S007] trigger1: connection references unknown destination node 'missing'"
        );
    }

    #[test]
    fn finding_display_without_node() {
        let f = Finding::warning(Check::Reachability, "R001", "workflow has no trigger node", None);
        assert_eq!(f.to_string(), "warning [R001] workflow has no trigger node");
    }

    #[test]
    fn checks_order_by_number() {
        assert!(Check::Syntax < Check::Shape);
        assert!(Check::Reachability < Check::Cycles);
        assert_eq!(Check::Cycles.number(), 7);
    }

    #[test]
    fn finding_serializes_check_number() {
        let f = Finding::error(Check::UniqueIds, "S005", "dup", Some("A".into()));
        let value = serde_json::to_value(&f).unwrap();
        assert_eq!(value["check"], 3);
        assert_eq!(value["nodeId"], "A");
    }
}
