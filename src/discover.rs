//! Input discovery: a single file, or every matching file under a directory.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::config::ValidatorConfig;
use crate::error::ValidateError;

/// Resolve the input path into the list of documents to validate, in
/// path order. An explicitly named file is always included, whatever its
/// extension.
pub fn collect_inputs(path: &Path, config: &ValidatorConfig) -> Result<Vec<PathBuf>, ValidateError> {
    let metadata = std::fs::metadata(path).map_err(|source| ValidateError::Input {
        path: path.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_excluded(entry, config));

    for entry in walker {
        let entry = entry.map_err(|e| ValidateError::Scan {
            path: e.path().unwrap_or(path).to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && has_document_extension(entry.path(), config) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    tracing::debug!(root = %path.display(), count = files.len(), "discovered documents");
    Ok(files)
}

fn is_excluded(entry: &DirEntry, config: &ValidatorConfig) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    let excluded = config.exclude.iter().any(|e| *e == name);
    if excluded {
        tracing::debug!(path = %entry.path().display(), "skipping excluded directory");
    }
    excluded
}

fn has_document_extension(path: &Path, config: &ValidatorConfig) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| config.extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_path_is_input_error() {
        let err = collect_inputs(Path::new("/definitely/not/here"), &ValidatorConfig::default())
            .unwrap_err();
        assert!(matches!(err, ValidateError::Input { .. }));
    }

    #[test]
    fn scans_recursively_skipping_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(root.join("z.json"), "{}").unwrap();
        fs::write(root.join("b/nested/a.JSON"), "{}").unwrap();
        fs::write(root.join("b/readme.md"), "").unwrap();
        fs::write(root.join("node_modules/pkg/package.json"), "{}").unwrap();

        let files = collect_inputs(root, &ValidatorConfig::default()).unwrap();
        assert_eq!(files, vec![root.join("b/nested/a.JSON"), root.join("z.json")]);
    }

    #[test]
    fn explicit_file_is_taken_as_is() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("workflow.txt");
        fs::write(&file, "{}").unwrap();
        let files = collect_inputs(&file, &ValidatorConfig::default()).unwrap();
        assert_eq!(files, vec![file]);
    }
}
