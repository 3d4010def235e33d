pub mod config;
pub mod discover;
pub mod error;
pub mod parse;
pub mod registry;
pub mod report;
pub mod runner;
pub mod validate;

pub use config::{CycleMode, ValidatorConfig};
pub use error::{Check, Finding, Severity, ValidateError};
pub use report::{RunReport, RunSummary, ValidationReport};
pub use validate::Validator;
