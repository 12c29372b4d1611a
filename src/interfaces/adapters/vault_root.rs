//! Vault root accessors.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::interfaces::adapter::{FileSystemError, VaultRootAccessor};

/// A vault root that never changes.
#[derive(Debug, Clone)]
pub struct FixedVaultRoot(PathBuf);

impl FixedVaultRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self(root.into())
    }
}

impl VaultRootAccessor for FixedVaultRoot {
    fn current_vault_root(&self) -> Result<PathBuf, FileSystemError> {
        Ok(self.0.clone())
    }
}

/// A vault root the host can switch while a session is running.
///
/// Clones share the same slot, so the settings side can hold one handle and
/// the dispatcher another.
#[derive(Debug, Clone, Default)]
pub struct SharedVaultRoot {
    root: Arc<RwLock<Option<PathBuf>>>,
}

impl SharedVaultRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(RwLock::new(Some(root.into()))),
        }
    }

    /// Point subsequent calls at another vault.
    pub fn switch_to(&self, root: impl Into<PathBuf>) {
        let root = root.into();
        log::info!("Switching vault root to {}", root.display());
        *self.root.write() = Some(root);
    }

    /// Forget the current vault; path-taking calls fail until a new one is set.
    pub fn clear(&self) {
        *self.root.write() = None;
    }
}

impl VaultRootAccessor for SharedVaultRoot {
    fn current_vault_root(&self) -> Result<PathBuf, FileSystemError> {
        self.root
            .read()
            .clone()
            .ok_or_else(|| FileSystemError::Unavailable("no vault is open".to_string()))
    }
}
