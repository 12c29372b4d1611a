//! Read-side file capabilities plus directory creation.

use std::path::Path;

use serde_json::Value;

use super::{absolute_root, ToolContext};
use crate::interfaces::adapter::FileEntry;
use crate::tools::structured_tool::ValidatedArgs;
use crate::utilities::errors::DispatchError;

/// `readFile`: the file's contents as a string.
pub async fn read_file(args: &ValidatedArgs, ctx: &ToolContext) -> Result<Value, DispatchError> {
    let path = ctx.resolve_in_vault(args.string("filePath")?)?;
    let content = ctx.file_system.read_file(&path).await?;
    Ok(Value::String(content))
}

/// `createDirectory`
pub async fn create_directory(
    args: &ValidatedArgs,
    ctx: &ToolContext,
) -> Result<Value, DispatchError> {
    let directory_name = args.string("directoryName")?;
    let path = ctx.resolve_in_vault(directory_name)?;

    ctx.file_system.create_directory(&path).await?;
    log::info!("Created directory {}", path.display());

    Ok(Value::String(format!(
        "Directory {} created successfully",
        directory_name
    )))
}

/// `listFiles`: every entry of the vault tree, depth-first, as a
/// vault-relative path with `/` separators.
pub async fn list_files(_args: &ValidatedArgs, ctx: &ToolContext) -> Result<Value, DispatchError> {
    let root = absolute_root(&ctx.vault_root()?)?;
    let tree = ctx.file_system.list_files_tree(&root).await?;

    let names: Vec<Value> = tree
        .iter()
        .flat_map(|entry| entry.flatten())
        .map(|entry| Value::String(vault_relative(&root, entry)))
        .collect();
    log::debug!("listFiles found {} entries under {}", names.len(), root.display());

    Ok(Value::Array(names))
}

fn vault_relative(root: &Path, entry: &FileEntry) -> String {
    match entry.path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        // Adapters that report bare or foreign paths still yield the name.
        _ => entry.name.clone(),
    }
}
