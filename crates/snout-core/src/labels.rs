//! Class-name list loading: one name per line, line index = class id.

use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelsError {
    #[error("failed to read class names from {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("class name list is empty")]
    Empty,
    #[error("class {0:?} is not in the name list")]
    UnknownClass(String),
}

/// Load an ordered class-name list from a text file.
pub fn load_labels(path: &Path) -> Result<Vec<String>, LabelsError> {
    let text = std::fs::read_to_string(path).map_err(|source| LabelsError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let labels: Vec<String> = text.lines().map(|line| line.trim().to_string()).collect();
    if labels.is_empty() {
        return Err(LabelsError::Empty);
    }

    tracing::debug!(path = %path.display(), count = labels.len(), "loaded class names");
    Ok(labels)
}

/// Resolve a class name to its id (position in the list).
pub fn class_id(labels: &[String], name: &str) -> Result<usize, LabelsError> {
    labels
        .iter()
        .position(|label| label == name)
        .ok_or_else(|| LabelsError::UnknownClass(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_names(dir: &tempfile::TempDir, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join("names.txt");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_labels_in_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_names(&dir, "cat\ndog\nhorse\n");
        let labels = load_labels(&path).unwrap();
        assert_eq!(labels, vec!["cat", "dog", "horse"]);
    }

    #[test]
    fn test_load_labels_trims_whitespace() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_names(&dir, "cat \n dog\r\n");
        let labels = load_labels(&path).unwrap();
        assert_eq!(labels, vec!["cat", "dog"]);
    }

    #[test]
    fn test_load_labels_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = load_labels(&dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, LabelsError::Read { .. }));
    }

    #[test]
    fn test_load_labels_empty_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_names(&dir, "");
        let err = load_labels(&path).unwrap_err();
        assert!(matches!(err, LabelsError::Empty));
    }

    #[test]
    fn test_class_id_resolves_position() {
        let labels: Vec<String> = ["cat", "dog"].iter().map(|s| s.to_string()).collect();
        assert_eq!(class_id(&labels, "dog").unwrap(), 1);
    }

    #[test]
    fn test_class_id_unknown_name() {
        let labels: Vec<String> = ["cat", "dog"].iter().map(|s| s.to_string()).collect();
        let err = class_id(&labels, "ferret").unwrap_err();
        assert!(matches!(err, LabelsError::UnknownClass(name) if name == "ferret"));
    }
}
