//! Capability implementations over the vault.
//!
//! Each capability is an adapter from validated arguments to one or two
//! collaborator calls. [`CapabilityKind`] is the closed set of implemented
//! capabilities; [`ToolContext`] carries the collaborators they need.

pub mod file_tools;
pub mod note_tools;
pub mod search_tool;

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::interfaces::adapter::{FileSystemService, VaultRootAccessor};
use crate::knowledge::KnowledgeSearch;
use crate::tools::structured_tool::ValidatedArgs;
use crate::utilities::errors::{CapabilityError, DispatchError};

// ---------------------------------------------------------------------------
// CapabilityKind
// ---------------------------------------------------------------------------

/// Every capability the engine knows how to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    Search,
    CreateNote,
    CreateDirectory,
    ReadFile,
    DeleteNote,
    EditNote,
    AppendToNote,
    ListFiles,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 8] = [
        CapabilityKind::Search,
        CapabilityKind::CreateNote,
        CapabilityKind::CreateDirectory,
        CapabilityKind::ReadFile,
        CapabilityKind::DeleteNote,
        CapabilityKind::EditNote,
        CapabilityKind::AppendToNote,
        CapabilityKind::ListFiles,
    ];

    /// Registry name of the capability.
    pub fn name(self) -> &'static str {
        match self {
            CapabilityKind::Search => "search",
            CapabilityKind::CreateNote => "createNote",
            CapabilityKind::CreateDirectory => "createDirectory",
            CapabilityKind::ReadFile => "readFile",
            CapabilityKind::DeleteNote => "deleteNote",
            CapabilityKind::EditNote => "editNote",
            CapabilityKind::AppendToNote => "appendToNote",
            CapabilityKind::ListFiles => "listFiles",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Run the capability against its collaborators.
    pub async fn execute(
        self,
        args: &ValidatedArgs,
        ctx: &ToolContext,
    ) -> Result<Value, DispatchError> {
        match self {
            CapabilityKind::Search => search_tool::search(args, ctx).await,
            CapabilityKind::CreateNote => note_tools::create_note(args, ctx).await,
            CapabilityKind::CreateDirectory => file_tools::create_directory(args, ctx).await,
            CapabilityKind::ReadFile => file_tools::read_file(args, ctx).await,
            CapabilityKind::DeleteNote => note_tools::delete_note(args, ctx).await,
            CapabilityKind::EditNote => note_tools::edit_note(args, ctx).await,
            CapabilityKind::AppendToNote => note_tools::append_to_note(args, ctx).await,
            CapabilityKind::ListFiles => file_tools::list_files(args, ctx).await,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ToolContext
// ---------------------------------------------------------------------------

/// Collaborators handed to every capability.
#[derive(Clone)]
pub struct ToolContext {
    pub vault_root: Arc<dyn VaultRootAccessor>,
    pub file_system: Arc<dyn FileSystemService>,
    pub knowledge: Arc<dyn KnowledgeSearch>,
}

impl fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolContext").finish_non_exhaustive()
    }
}

impl ToolContext {
    pub fn new(
        vault_root: Arc<dyn VaultRootAccessor>,
        file_system: Arc<dyn FileSystemService>,
        knowledge: Arc<dyn KnowledgeSearch>,
    ) -> Self {
        Self {
            vault_root,
            file_system,
            knowledge,
        }
    }

    /// The current vault root, read fresh on every call.
    pub fn vault_root(&self) -> Result<PathBuf, CapabilityError> {
        Ok(self.vault_root.current_vault_root()?)
    }

    /// Join a model-supplied path onto the vault root.
    ///
    /// The result must stay inside the vault once `.` and `..` are folded.
    /// A relative vault root is anchored at the working directory first.
    pub fn resolve_in_vault(&self, supplied: &str) -> Result<PathBuf, CapabilityError> {
        if supplied.trim().is_empty() {
            return Err(CapabilityError::invalid_argument("path must not be empty"));
        }
        let root = absolute_root(&self.vault_root()?)?;
        let resolved = normalize(&root.join(supplied));
        if !resolved.starts_with(&root) {
            log::warn!("Rejected path outside the vault: {}", supplied);
            return Err(CapabilityError::OutsideVault {
                path: supplied.to_string(),
            });
        }
        Ok(resolved)
    }
}

/// Absolute, normalized form of the vault root.
fn absolute_root(root: &Path) -> Result<PathBuf, CapabilityError> {
    let anchored = if root.is_absolute() {
        root.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| CapabilityError::Io {
            message: format!("cannot anchor vault root '{}': {}", root.display(), e),
        })?;
        cwd.join(root)
    };
    let normalized = normalize(&anchored);
    if normalized.as_os_str().is_empty() || !normalized.is_absolute() {
        return Err(CapabilityError::invalid_argument(format!(
            "vault root '{}' does not resolve to an absolute directory",
            root.display()
        )));
    }
    Ok(normalized)
}

/// Lexically fold `.` and `..` without touching the disk.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::interfaces::adapters::{FixedVaultRoot, LocalFileSystem};
    use crate::capabilities::CapabilityRegistry;
    use crate::knowledge::InMemoryKnowledgeStore;
    use crate::tools::tool_calling::RawArguments;

    /// A context over a fresh temporary vault.
    pub fn temp_context() -> (tempfile::TempDir, ToolContext, InMemoryKnowledgeStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryKnowledgeStore::new();
        let ctx = ToolContext::new(
            Arc::new(FixedVaultRoot::new(dir.path())),
            Arc::new(LocalFileSystem::new()),
            Arc::new(store.clone()),
        );
        (dir, ctx, store)
    }

    /// Validate `value` against a built-in capability's schema.
    pub fn args(capability: &str, value: Value) -> ValidatedArgs {
        CapabilityRegistry::builtin()
            .schema(capability)
            .unwrap()
            .validate(&RawArguments::from_value(value).unwrap())
            .unwrap()
    }
}
