//! Run configuration, loaded from a JSON document.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    NotFound { path: String, source: io::Error },
    #[error("invalid JSON in config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing key {0:?} in config file")]
    MissingKey(&'static str),
    #[error("query image {0} not found")]
    QueryImageMissing(PathBuf),
    #[error("database directory {0} not found")]
    DatabaseDirMissing(PathBuf),
}

/// Paths for one matching run: the query image and the corpus root.
#[derive(Debug)]
pub struct RunConfig {
    pub query_image_path: PathBuf,
    pub database_dir: PathBuf,
}

impl RunConfig {
    /// Load and parse the config file. Each failure mode is a distinct
    /// error: unreadable file, malformed JSON, or a missing/non-string key.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::NotFound {
            path: path.display().to_string(),
            source,
        })?;
        let doc: Value = serde_json::from_str(&text)?;

        Ok(Self {
            query_image_path: string_key(&doc, "query_image_path")?.into(),
            database_dir: string_key(&doc, "database_dir")?.into(),
        })
    }

    /// Check that the configured paths exist before any work starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.query_image_path.is_file() {
            return Err(ConfigError::QueryImageMissing(
                self.query_image_path.clone(),
            ));
        }
        if !self.database_dir.is_dir() {
            return Err(ConfigError::DatabaseDirMissing(self.database_dir.clone()));
        }
        Ok(())
    }
}

fn string_key<'a>(doc: &'a Value, key: &'static str) -> Result<&'a str, ConfigError> {
    doc.get(key)
        .and_then(Value::as_str)
        .ok_or(ConfigError::MissingKey(key))
}
