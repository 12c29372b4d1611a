//! JSON file persistence.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::utilities::errors::ConfigError;

/// Reads and writes JSON documents inside one directory.
#[derive(Debug, Clone)]
pub struct FileHandler {
    directory: PathBuf,
}

impl FileHandler {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.directory.join(filename)
    }

    /// Load a JSON document.
    ///
    /// A missing file is `Ok(None)`; unreadable or invalid content is an error.
    pub fn load(&self, filename: &str) -> Result<Option<Value>, ConfigError> {
        let path = self.path_of(filename);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Save a JSON document, creating the directory if needed.
    ///
    /// The document is written to a temporary sibling first and renamed into
    /// place.
    pub fn save(&self, filename: &str, data: &Value) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.directory)?;
        let path = self.path_of(filename);
        let tmp = self.path_of(&format!(".{}.tmp", filename));
        fs::write(&tmp, serde_json::to_string_pretty(data)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    pub fn exists(&self, filename: &str) -> bool {
        self.path_of(filename).exists()
    }
}
