//! Note mutation capabilities: create, edit, append and delete.

use serde_json::Value;

use super::ToolContext;
use crate::tools::structured_tool::ValidatedArgs;
use crate::utilities::errors::{CapabilityError, DispatchError};

/// `createNote`: write a new note; fails if the path is already taken.
pub async fn create_note(args: &ValidatedArgs, ctx: &ToolContext) -> Result<Value, DispatchError> {
    let filename = args.string("filename")?;
    let content = args.string("content")?;
    let path = ctx.resolve_in_vault(filename)?;

    ctx.file_system.create_file(&path, content).await?;
    log::info!("Created note {}", path.display());

    Ok(Value::String(format!(
        "Note {} created successfully",
        path.display()
    )))
}

/// `editNote`: replace the full content of an existing note.
pub async fn edit_note(args: &ValidatedArgs, ctx: &ToolContext) -> Result<Value, DispatchError> {
    let filename = args.string("filename")?;
    let content = args.string("content")?;
    let path = ctx.resolve_in_vault(filename)?;

    if !ctx.file_system.exists(&path).await? {
        return Err(CapabilityError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    ctx.file_system.write_file(&path, content).await?;

    Ok(Value::String(format!(
        "Note {} edited successfully",
        filename
    )))
}

/// `appendToNote`: read the note, then write it back with `content` added.
///
/// Not atomic: a concurrent writer between the read and the write loses its
/// change.
pub async fn append_to_note(
    args: &ValidatedArgs,
    ctx: &ToolContext,
) -> Result<Value, DispatchError> {
    let filename = args.string("filename")?;
    let content = args.string("content")?;
    let path = ctx.resolve_in_vault(filename)?;

    let mut current = ctx.file_system.read_file(&path).await?;
    current.push_str(content);
    ctx.file_system.write_file(&path, &current).await?;

    Ok(Value::String(format!(
        "Note {} appended to successfully",
        filename
    )))
}

/// `deleteNote`
pub async fn delete_note(args: &ValidatedArgs, ctx: &ToolContext) -> Result<Value, DispatchError> {
    let filename = args.string("filename")?;
    let path = ctx.resolve_in_vault(filename)?;

    ctx.file_system.delete_file(&path).await?;
    log::info!("Deleted note {}", path.display());

    Ok(Value::String(format!(
        "Note {} deleted successfully",
        filename
    )))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{args, temp_context};
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_note() {
        let (dir, ctx, _) = temp_context();
        let out = create_note(
            &args("createNote", json!({"filename": "todo.md", "content": "buy milk"})),
            &ctx,
        )
        .await
        .unwrap();

        let expected = dir.path().join("todo.md");
        assert_eq!(
            out,
            json!(format!("Note {} created successfully", expected.display()))
        );
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "buy milk");
    }

    #[tokio::test]
    async fn test_create_note_twice_fails() {
        let (_dir, ctx, _) = temp_context();
        let a = args("createNote", json!({"filename": "a.md", "content": "x"}));
        create_note(&a, &ctx).await.unwrap();
        let err = create_note(&a, &ctx).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Capability(CapabilityError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_append_to_note() {
        let (dir, ctx, _) = temp_context();
        std::fs::write(dir.path().join("todo.md"), "buy milk").unwrap();

        let out = append_to_note(
            &args("appendToNote", json!({"filename": "todo.md", "content": " and eggs"})),
            &ctx,
        )
        .await
        .unwrap();

        assert_eq!(out, json!("Note todo.md appended to successfully"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("todo.md")).unwrap(),
            "buy milk and eggs"
        );
    }

    #[tokio::test]
    async fn test_edit_requires_existing_note() {
        let (dir, ctx, _) = temp_context();
        let a = args("editNote", json!({"filename": "plan.md", "content": "v2"}));

        let err = edit_note(&a, &ctx).await.unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Capability(CapabilityError::NotFound { .. })
        ));
        assert!(!dir.path().join("plan.md").exists());

        std::fs::write(dir.path().join("plan.md"), "v1").unwrap();
        let out = edit_note(&a, &ctx).await.unwrap();
        assert_eq!(out, json!("Note plan.md edited successfully"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("plan.md")).unwrap(),
            "v2"
        );
    }

    #[tokio::test]
    async fn test_delete_note() {
        let (dir, ctx, _) = temp_context();
        std::fs::write(dir.path().join("old.md"), "bye").unwrap();
        let a = args("deleteNote", json!({"filename": "old.md"}));

        assert_eq!(
            delete_note(&a, &ctx).await.unwrap(),
            json!("Note old.md deleted successfully")
        );
        assert!(!dir.path().join("old.md").exists());
        assert!(delete_note(&a, &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_paths_outside_vault_are_refused() {
        let (_dir, ctx, _) = temp_context();
        let err = create_note(
            &args("createNote", json!({"filename": "../escape.md", "content": "x"})),
            &ctx,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Capability(CapabilityError::OutsideVault { .. })
        ));
    }
}
