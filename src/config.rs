//! Validator configuration.
//!
//! Precedence: built-in defaults < config file < environment < CLI flags.
//! The CLI layer applies its own flags on top of what [`ValidatorConfig::load`]
//! returns.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Severity, ValidateError};
use crate::registry::NodeTypeSpec;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "n8n-validate.toml";

pub const ENV_STRICT: &str = "N8N_VALIDATE_STRICT";

/// How cycles between distinct nodes are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleMode {
    /// The execution model is acyclic; any cycle is an error.
    #[default]
    Error,
    /// Loops are tolerated (bounded by the runtime) but flagged.
    Warning,
    /// Cycle detection is skipped.
    Allow,
}

impl CycleMode {
    pub fn severity(&self) -> Option<Severity> {
        match self {
            CycleMode::Error => Some(Severity::Error),
            CycleMode::Warning => Some(Severity::Warning),
            CycleMode::Allow => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Promote a missing trigger from warning to error.
    pub strict: bool,
    pub cycles: CycleMode,
    /// Directory names skipped during recursive scans.
    pub exclude: Vec<String>,
    /// File extensions treated as workflow documents.
    pub extensions: Vec<String>,
    /// Extra node types, overriding built-ins of the same name.
    pub node_types: Vec<NodeTypeSpec>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            strict: false,
            cycles: CycleMode::Error,
            exclude: [".git", ".venv", "venv", "node_modules", "target"]
                .into_iter()
                .map(String::from)
                .collect(),
            extensions: vec!["json".into()],
            node_types: vec![],
        }
    }
}

impl ValidatorConfig {
    /// Load a config file. The file must exist.
    pub fn load(path: &Path) -> Result<Self, ValidateError> {
        let content = std::fs::read_to_string(path).map_err(|e| ValidateError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| ValidateError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Load a config file if it exists; `Ok(None)` otherwise.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ValidateError> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_STRICT) {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => self.strict = true,
                "0" | "false" | "no" => self.strict = false,
                other => tracing::warn!(value = other, "ignoring unrecognized {}", ENV_STRICT),
            }
        }
    }

    pub fn missing_trigger_severity(&self) -> Severity {
        if self.strict {
            Severity::Error
        } else {
            Severity::Warning
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::NodeKind;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = ValidatorConfig::from_toml("").unwrap();
        assert_eq!(config, ValidatorConfig::default());
        assert!(config.exclude.contains(&".venv".to_string()));
    }

    #[test]
    fn parses_full_config() {
        let config = ValidatorConfig::from_toml(
            r#"
strict = true
cycles = "warning"
extensions = ["json", "n8n"]

[[node_types]]
name = "n8n-nodes-community.foo"
kind = "action"
required = ["resource", { name = "mode", default = "auto" }]
"#,
        )
        .unwrap();
        assert!(config.strict);
        assert_eq!(config.cycles, CycleMode::Warning);
        assert_eq!(config.extensions, vec!["json", "n8n"]);
        let spec = &config.node_types[0];
        assert_eq!(spec.kind, NodeKind::Action);
        assert_eq!(spec.required.len(), 2);
        assert!(spec.required[0].default.is_none());
        assert!(spec.required[1].default.is_some());
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(ValidatorConfig::from_toml("stirct = true").is_err());
    }

    #[test]
    fn env_override_sets_strict() {
        let mut config = ValidatorConfig::default();
        config.apply_overrides_from(|key| (key == ENV_STRICT).then(|| "true".to_string()));
        assert!(config.strict);
        assert_eq!(config.missing_trigger_severity(), Severity::Error);

        config.apply_overrides_from(|_| Some("0".to_string()));
        assert!(!config.strict);
    }

    #[test]
    fn allow_mode_has_no_severity() {
        assert_eq!(CycleMode::Allow.severity(), None);
        assert_eq!(CycleMode::default().severity(), Some(Severity::Error));
    }
}
