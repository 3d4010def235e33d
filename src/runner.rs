//! Batch driver: discover inputs, validate each document, aggregate.

use std::path::Path;

use crate::config::ValidatorConfig;
use crate::discover::collect_inputs;
use crate::error::{Finding, ValidateError};
use crate::report::{RunReport, ValidationReport};
use crate::validate::Validator;

/// Validate every document reachable from `path`.
///
/// Problems inside documents end up in the report; only an unreadable input
/// aborts the run.
pub fn run(path: &Path, config: &ValidatorConfig) -> Result<RunReport, ValidateError> {
    let validator = Validator::from_config(config);
    let inputs = collect_inputs(path, config)?;

    let mut reports = Vec::with_capacity(inputs.len());
    for input in &inputs {
        reports.push(validate_file(&validator, input)?);
    }

    let run = RunReport::from_reports(reports);
    tracing::info!(
        documents = run.summary.documents,
        failed = run.summary.failed,
        errors = run.summary.errors,
        warnings = run.summary.warnings,
        "validation finished"
    );
    Ok(run)
}

pub fn validate_file(validator: &Validator, path: &Path) -> Result<ValidationReport, ValidateError> {
    let source = path.display().to_string();
    tracing::debug!(path = %source, "validating document");

    let bytes = std::fs::read(path).map_err(|e| ValidateError::Input {
        path: path.to_path_buf(),
        source: e,
    })?;

    let report = match String::from_utf8(bytes) {
        Ok(json) => {
            let json = json.strip_prefix('\u{feff}').unwrap_or(&json);
            validator.validate_str(&source, json)
        }
        Err(e) => ValidationReport::new(
            &source,
            None,
            vec![Finding::parse(format!("file is not valid UTF-8: {}", e))],
        ),
    };

    if !report.valid {
        tracing::debug!(path = %source, errors = report.error_count(), "document failed");
    }
    Ok(report)
}
