//! Reference collaborators.
//!
//! Hosts embedding the engine usually bring their own implementations of
//! the traits in [`crate::interfaces::adapter`]; these cover the local-disk
//! case and tests.

pub mod local_fs;
pub mod vault_root;

pub use local_fs::LocalFileSystem;
pub use vault_root::{FixedVaultRoot, SharedVaultRoot};
