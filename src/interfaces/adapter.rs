//! Collaborator contracts for the vault: where it lives and how its files
//! are touched.
//!
//! The engine never performs file-system work itself; every capability goes
//! through these traits so hosts can plug in their own storage (a desktop
//! app's IPC bridge, a sandboxed FS, an in-memory fake in tests).

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::utilities::errors::{CapabilityError, DispatchError};

/// Failure reported by a file-system collaborator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileSystemError {
    #[error("Not found: {0}")]
    NotFound(PathBuf),

    #[error("Already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Timed out during {0}")]
    Timeout(String),

    #[error("File system unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl FileSystemError {
    /// Classify a `std::io::Error` raised while touching `path`.
    pub fn from_io(error: std::io::Error, path: &Path) -> Self {
        use std::io::ErrorKind;
        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::TimedOut => Self::Timeout(format!("I/O on {}", path.display())),
            ErrorKind::InvalidInput => Self::InvalidPath(path.display().to_string()),
            _ => Self::Io(format!("{}: {}", path.display(), error)),
        }
    }
}

impl From<FileSystemError> for CapabilityError {
    fn from(error: FileSystemError) -> Self {
        match error {
            FileSystemError::NotFound(path) => CapabilityError::NotFound {
                path: path.display().to_string(),
            },
            FileSystemError::AlreadyExists(path) => CapabilityError::AlreadyExists {
                path: path.display().to_string(),
            },
            FileSystemError::PermissionDenied(path) => CapabilityError::PermissionDenied {
                path: path.display().to_string(),
            },
            FileSystemError::InvalidPath(message) => CapabilityError::InvalidArgument { message },
            FileSystemError::Timeout(operation) => CapabilityError::Timeout { operation },
            FileSystemError::Unavailable(message) => {
                CapabilityError::BackendUnavailable { message }
            }
            FileSystemError::Io(message) => CapabilityError::Io { message },
        }
    }
}

impl From<FileSystemError> for DispatchError {
    fn from(error: FileSystemError) -> Self {
        DispatchError::Capability(error.into())
    }
}

/// One node of the vault's file tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FileEntry>,
}

impl FileEntry {
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: false,
            children: Vec::new(),
        }
    }

    pub fn directory(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        children: Vec<FileEntry>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            is_directory: true,
            children,
        }
    }

    /// Depth-first, pre-order walk over this entry and its descendants.
    pub fn flatten(&self) -> Vec<&FileEntry> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }
}

/// Supplies the vault root of the current window/session.
///
/// Called on every path-taking capability so that a vault switch is honored
/// on the next call.
pub trait VaultRootAccessor: Send + Sync {
    fn current_vault_root(&self) -> Result<PathBuf, FileSystemError>;
}

/// File-system primitives the capabilities are built on.
#[async_trait]
pub trait FileSystemService: Send + Sync {
    /// Create a new file; fails with `AlreadyExists` if the path is taken.
    async fn create_file(&self, path: &Path, content: &str) -> Result<(), FileSystemError>;

    async fn read_file(&self, path: &Path) -> Result<String, FileSystemError>;

    /// Replace the contents of an existing or new file.
    async fn write_file(&self, path: &Path, content: &str) -> Result<(), FileSystemError>;

    async fn delete_file(&self, path: &Path) -> Result<(), FileSystemError>;

    /// Create a directory (and missing parents); fails with `AlreadyExists`
    /// if the directory is already there.
    async fn create_directory(&self, path: &Path) -> Result<(), FileSystemError>;

    /// The vault tree rooted at `root` (the root itself is not included).
    async fn list_files_tree(&self, root: &Path) -> Result<Vec<FileEntry>, FileSystemError>;

    async fn exists(&self, path: &Path) -> Result<bool, FileSystemError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classification() {
        let path = Path::new("/vault/a.md");
        let err = FileSystemError::from_io(
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            path,
        );
        assert_eq!(err, FileSystemError::NotFound(path.to_path_buf()));

        let err = FileSystemError::from_io(
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no"),
            path,
        );
        assert_eq!(
            CapabilityError::from(err),
            CapabilityError::PermissionDenied {
                path: "/vault/a.md".into()
            }
        );
    }

    #[test]
    fn test_timeout_maps_to_capability_timeout() {
        let err = CapabilityError::from(FileSystemError::Timeout("read".into()));
        assert_eq!(
            err,
            CapabilityError::Timeout {
                operation: "read".into()
            }
        );
    }

    #[test]
    fn test_flatten_is_preorder() {
        let tree = FileEntry::directory(
            "projects",
            "/vault/projects",
            vec![
                FileEntry::file("a.md", "/vault/projects/a.md"),
                FileEntry::directory(
                    "old",
                    "/vault/projects/old",
                    vec![FileEntry::file("b.md", "/vault/projects/old/b.md")],
                ),
            ],
        );
        let names: Vec<&str> = tree.flatten().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["projects", "a.md", "old", "b.md"]);
    }
}
