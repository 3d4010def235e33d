//! Per-document reports, the run aggregate, and their text/JSON renderings.

use std::fmt::Write;

use serde::Serialize;

use crate::error::{Finding, Severity};
use crate::parse::types::WorkflowDocument;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Workflow id when the document declares one, otherwise `source`.
    pub document: String,
    pub source: String,
    pub name: Option<String>,
    pub findings: Vec<Finding>,
    pub valid: bool,
}

impl ValidationReport {
    pub fn new(source: &str, document: Option<&WorkflowDocument>, findings: Vec<Finding>) -> Self {
        let id = document.and_then(|d| d.id.clone());
        let name = document.and_then(|d| d.name.clone());
        let valid = !findings.iter().any(Finding::is_error);
        ValidationReport {
            document: id.unwrap_or_else(|| source.to_string()),
            source: source.to_string(),
            name,
            findings,
            valid,
        }
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }

    pub fn write_text(&self, out: &mut String) {
        let _ = write!(out, "== {}", self.source);
        if self.document != self.source {
            let _ = write!(out, " [{}]", self.document);
        }
        if let Some(name) = &self.name {
            let _ = write!(out, " ({})", name);
        }
        out.push('\n');

        if self.findings.is_empty() {
            out.push_str("  ok\n");
        }
        for finding in &self.findings {
            let _ = writeln!(out, "  {}", finding);
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub documents: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl RunSummary {
    pub fn of(report: &ValidationReport) -> Self {
        RunSummary {
            documents: 1,
            failed: usize::from(!report.valid),
            errors: report.error_count(),
            warnings: report.warning_count(),
        }
    }

    pub fn merge(self, other: RunSummary) -> Self {
        RunSummary {
            documents: self.documents + other.documents,
            failed: self.failed + other.failed,
            errors: self.errors + other.errors,
            warnings: self.warnings + other.warnings,
        }
    }

    pub fn from_reports(reports: &[ValidationReport]) -> Self {
        reports
            .iter()
            .map(RunSummary::of)
            .fold(RunSummary::default(), RunSummary::merge)
    }

    /// True when no document contains an error-severity finding.
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Summary: {} documents, {} failed, {} errors, {} warnings",
            self.documents, self.failed, self.errors, self.warnings
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub documents: Vec<ValidationReport>,
    pub summary: RunSummary,
    pub success: bool,
}

impl RunReport {
    pub fn from_reports(documents: Vec<ValidationReport>) -> Self {
        let summary = RunSummary::from_reports(&documents);
        RunReport {
            documents,
            success: summary.success(),
            summary,
        }
    }

    /// Text report. `quiet` keeps only failing documents.
    pub fn render_text(&self, quiet: bool) -> String {
        let mut out = String::new();
        for report in &self.documents {
            if quiet && report.valid {
                continue;
            }
            report.write_text(&mut out);
        }
        let _ = writeln!(out, "{}", self.summary);
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
