//! Validation phase.
//!
//! Checks run in a fixed order and append to one findings list; nothing
//! short-circuits except the fatal parse/shape failures. Findings are then
//! sorted by check, node id (document-level findings first) and discovery
//! order, so output is stable across runs.

pub mod node_rules;
pub mod structural;

use crate::config::{CycleMode, ValidatorConfig};
use crate::error::{Finding, Severity};
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::WorkflowDocument;
use crate::registry::NodeTypeRegistry;
use crate::report::ValidationReport;

#[derive(Debug, Clone)]
pub struct Validator {
    registry: NodeTypeRegistry,
    missing_trigger: Severity,
    cycles: CycleMode,
}

impl Default for Validator {
    fn default() -> Self {
        Self::from_config(&ValidatorConfig::default())
    }
}

impl Validator {
    /// Built-in registry extended with the config's custom node types.
    pub fn from_config(config: &ValidatorConfig) -> Self {
        let mut registry = NodeTypeRegistry::builtin();
        for spec in &config.node_types {
            registry.register(spec.clone());
        }
        Validator {
            registry,
            missing_trigger: config.missing_trigger_severity(),
            cycles: config.cycles,
        }
    }

    /// Validate one JSON document. `source` names it in the report when the
    /// document carries no id of its own.
    pub fn validate_str(&self, source: &str, json: &str) -> ValidationReport {
        match crate::parse::parse(json) {
            Ok(parsed) => {
                let mut findings = parsed.findings;
                findings.extend(self.validate_document(&parsed.document));
                sort_findings(&mut findings);
                ValidationReport::new(source, Some(&parsed.document), findings)
            }
            Err(mut findings) => {
                sort_findings(&mut findings);
                ValidationReport::new(source, None, findings)
            }
        }
    }

    /// Run checks 3–7 over a parsed document. Returned in check order but
    /// not yet sorted by node id.
    pub fn validate_document(&self, document: &WorkflowDocument) -> Vec<Finding> {
        let graph = WorkflowGraph::build(document);
        let mut findings = Vec::new();

        structural::s005_unique_node_ids(document, &mut findings);
        structural::s006_s007_endpoints_resolve(document, &graph, &mut findings);
        for node in &document.nodes {
            findings.extend(node_rules::validate_node(node, &self.registry));
        }
        structural::r001_has_trigger(document, &self.registry, self.missing_trigger, &mut findings);
        structural::r002_r003_reachable(document, &graph, &self.registry, &mut findings);
        structural::c001_c002_cycles(document, &graph, self.cycles, &mut findings);

        findings
    }
}

/// Stable sort: check number, then node id, then discovery order.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| a.check.cmp(&b.check).then_with(|| a.node_id.cmp(&b.node_id)));
}
