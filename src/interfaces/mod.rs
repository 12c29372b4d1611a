//! # Vault Interfaces
//!
//! Narrow contracts for the services the capabilities call out to:
//!
//! ```text
//! capability adapter
//!   │ current_vault_root()          → VaultRootAccessor
//!   │ create/read/write/delete/list → FileSystemService
//!   ▼
//! host-provided implementation (or the local-disk adapters below)
//! ```
//!
//! Errors cross the boundary as [`FileSystemError`] and are converted into
//! [`CapabilityError`](crate::utilities::errors::CapabilityError) by the
//! capability layer.

pub mod adapter;
pub mod adapters;

pub use adapter::{FileEntry, FileSystemError, FileSystemService, VaultRootAccessor};
pub use adapters::{FixedVaultRoot, LocalFileSystem, SharedVaultRoot};
