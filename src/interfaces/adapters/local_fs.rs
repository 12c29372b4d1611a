//! Local disk implementation of `FileSystemService` on top of `tokio::fs`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use crate::interfaces::adapter::{FileEntry, FileSystemError, FileSystemService};

/// File-system service backed by the local disk.
///
/// Hidden entries (names starting with `.`) are left out of the tree so
/// editor and VCS metadata never reach the agent.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

async fn ensure_parent(path: &Path) -> Result<(), FileSystemError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FileSystemError::from_io(e, parent))?;
        }
    }
    Ok(())
}

#[async_trait]
impl FileSystemService for LocalFileSystem {
    async fn create_file(&self, path: &Path, content: &str) -> Result<(), FileSystemError> {
        ensure_parent(path).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| FileSystemError::from_io(e, path))?;
        file.flush()
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn read_file(&self, path: &Path) -> Result<String, FileSystemError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn write_file(&self, path: &Path, content: &str) -> Result<(), FileSystemError> {
        ensure_parent(path).await?;
        tokio::fs::write(path, content)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn delete_file(&self, path: &Path) -> Result<(), FileSystemError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn create_directory(&self, path: &Path) -> Result<(), FileSystemError> {
        if self.exists(path).await? {
            return Err(FileSystemError::AlreadyExists(path.to_path_buf()));
        }
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }

    async fn list_files_tree(&self, root: &Path) -> Result<Vec<FileEntry>, FileSystemError> {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || read_tree(&root))
            .await
            .map_err(|e| FileSystemError::Unavailable(format!("tree walk aborted: {}", e)))?
    }

    async fn exists(&self, path: &Path) -> Result<bool, FileSystemError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|e| FileSystemError::from_io(e, path))
    }
}

/// Recursively read a directory, sorted by name.
fn read_tree(dir: &Path) -> Result<Vec<FileEntry>, FileSystemError> {
    let mut entries = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(|e| FileSystemError::from_io(e, dir))? {
        let entry = entry.map_err(|e| FileSystemError::from_io(e, dir))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path: PathBuf = entry.path();
        let file_type = entry
            .file_type()
            .map_err(|e| FileSystemError::from_io(e, &path))?;

        if file_type.is_dir() {
            let children = read_tree(&path)?;
            entries.push(FileEntry::directory(name, path, children));
        } else {
            entries.push(FileEntry::file(name, path));
        }
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
