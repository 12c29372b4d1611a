//! Tool dispatcher: resolve, validate, execute, wrap.
//!
//! [`ToolDispatcher`] is the single entry point for agent tool calls. Every
//! call ends in a [`ResultEnvelope`] carrying the caller's call id, whatever
//! happened on the way: unknown names, bad arguments, collaborator failures
//! and even panics inside a capability are reported as error envelopes.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use futures::FutureExt;
use serde_json::Value;

use super::agent_tools::{CapabilityKind, ToolContext};
use super::tool_calling::CallRequest;
use super::tool_types::ResultEnvelope;
use crate::capabilities::CapabilityRegistry;
use crate::utilities::errors::{
    CapabilityError, DispatchError, RegistryError, UnknownCapabilityError,
};

/// Executes agent tool calls against a registry and its collaborators.
#[derive(Debug, Clone)]
pub struct ToolDispatcher {
    registry: Arc<CapabilityRegistry>,
    context: ToolContext,
}

impl ToolDispatcher {
    /// Build a dispatcher. Every registered capability must have an
    /// implementation.
    pub fn new(registry: CapabilityRegistry, context: ToolContext) -> Result<Self, RegistryError> {
        for name in registry.names() {
            if CapabilityKind::from_name(name).is_none() {
                return Err(RegistryError::MissingImplementation {
                    name: name.to_string(),
                });
            }
        }
        log::debug!(
            "Tool dispatcher ready with {} capabilities: {}",
            registry.len(),
            get_tool_names(&registry)
        );
        Ok(Self {
            registry: Arc::new(registry),
            context,
        })
    }

    /// Dispatcher over the built-in catalog.
    pub fn with_builtin(context: ToolContext) -> Result<Self, RegistryError> {
        Self::new(CapabilityRegistry::builtin().clone(), context)
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    /// Serve one call. Never fails; failures become error envelopes.
    pub async fn dispatch(&self, request: CallRequest) -> ResultEnvelope {
        let started_at = Instant::now();
        log::debug!(
            "Dispatching tool '{}' (call {})",
            request.capability_name,
            request.call_id
        );

        match self.run(&request).await {
            Ok(payload) => {
                log_tool_finished(&request.capability_name, started_at);
                ResultEnvelope::success(request.call_id, request.capability_name, payload)
            }
            Err(error) => {
                log::warn!(
                    "Tool '{}' (call {}) failed: {}",
                    request.capability_name,
                    request.call_id,
                    error
                );
                ResultEnvelope::failure(request.call_id, request.capability_name, error)
            }
        }
    }

    /// Serve several independent calls concurrently. Envelopes come back in
    /// request order.
    pub async fn dispatch_all(&self, requests: Vec<CallRequest>) -> Vec<ResultEnvelope> {
        join_all(requests.into_iter().map(|request| self.dispatch(request))).await
    }

    async fn run(&self, request: &CallRequest) -> Result<Value, DispatchError> {
        let name = request.capability_name.as_str();
        let schema = self.registry.schema(name)?;
        let kind =
            CapabilityKind::from_name(name).ok_or_else(|| UnknownCapabilityError::new(name))?;

        let raw = request.raw_arguments()?;
        let args = schema.validate(&raw)?;
        log::debug!("Tool '{}' arguments: {}", name, args.to_json());

        AssertUnwindSafe(kind.execute(&args, &self.context))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(CapabilityError::Internal {
                    message: format!("capability '{}' panicked: {}", name, panic_message(&*panic)),
                }
                .into())
            })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn log_tool_finished(tool_name: &str, started_at: Instant) {
    log::debug!(
        "Tool '{}' finished in {:.2}ms",
        tool_name,
        started_at.elapsed().as_secs_f64() * 1000.0
    );
}

// ---------------------------------------------------------------------------
// Prompt helpers
// ---------------------------------------------------------------------------

/// Plain-text description of every capability, for prompt construction.
pub fn render_text_description_and_args(registry: &CapabilityRegistry) -> String {
    registry
        .list()
        .iter()
        .map(|def| {
            let args: Vec<String> = def
                .parameters
                .iter()
                .map(|p| format!("{}: {}", p.name, p.param_type))
                .collect();
            format!(
                "Tool Name: {}\nTool Arguments: {{{}}}\nTool Description: {}",
                def.name,
                args.join(", "),
                def.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Comma-separated capability names.
pub fn get_tool_names(registry: &CapabilityRegistry) -> String {
    registry.names().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::capabilities::builtin;
    use crate::interfaces::adapter::{FileEntry, FileSystemError, FileSystemService};
    use crate::interfaces::adapters::FixedVaultRoot;
    use crate::knowledge::InMemoryKnowledgeStore;
    use crate::tools::agent_tools::test_support::temp_context;
    use crate::utilities::errors::ValidationError;

    fn dispatcher() -> (tempfile::TempDir, ToolDispatcher, InMemoryKnowledgeStore) {
        let (dir, ctx, store) = temp_context();
        (dir, ToolDispatcher::with_builtin(ctx).unwrap(), store)
    }

    #[tokio::test]
    async fn test_create_note_scenario() {
        let (dir, dispatcher, _) = dispatcher();
        let envelope = dispatcher
            .dispatch(
                CallRequest::new("createNote", json!({"filename": "todo.md", "content": "buy milk"}))
                    .with_call_id("call_1"),
            )
            .await;

        assert_eq!(envelope.call_id, "call_1");
        assert_eq!(envelope.capability_name, "createNote");
        assert!(!envelope.is_error());
        let path = dir.path().join("todo.md");
        assert_eq!(
            envelope.payload(),
            json!(format!("Note {} created successfully", path.display()))
        );
        assert_eq!(std::fs::read_to_string(path).unwrap(), "buy milk");
    }

    #[tokio::test]
    async fn test_append_scenario() {
        let (dir, dispatcher, _) = dispatcher();
        std::fs::write(dir.path().join("todo.md"), "buy milk").unwrap();

        let envelope = dispatcher
            .dispatch(CallRequest::positional(
                "appendToNote",
                vec![json!("todo.md"), json!(" and eggs")],
            ))
            .await;
        assert!(!envelope.is_error());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("todo.md")).unwrap(),
            "buy milk and eggs"
        );
    }

    #[tokio::test]
    async fn test_read_missing_file_is_error_envelope() {
        let (dir, dispatcher, _) = dispatcher();
        let missing = dir.path().join("missing.md");
        let envelope = dispatcher
            .dispatch(
                CallRequest::new("readFile", json!({"filePath": missing.to_str().unwrap()}))
                    .with_call_id("call_9"),
            )
            .await;

        assert!(envelope.is_error());
        assert_eq!(envelope.call_id, "call_9");
        assert!(matches!(
            envelope.error(),
            Some(DispatchError::Capability(CapabilityError::NotFound { .. }))
        ));
        let part = serde_json::to_value(envelope.to_tool_result_part()).unwrap();
        assert_eq!(part["isError"], true);
        assert_eq!(part["toolCallId"], "call_9");
    }

    #[tokio::test]
    async fn test_unknown_capability() {
        let (_dir, dispatcher, _) = dispatcher();
        let envelope = dispatcher
            .dispatch(CallRequest::new("formatDisk", json!({})).with_call_id("x"))
            .await;
        assert_eq!(
            envelope.error(),
            Some(&DispatchError::UnknownCapability(UnknownCapabilityError::new(
                "formatDisk"
            )))
        );
        assert_eq!(envelope.call_id, "x");
    }

    #[tokio::test]
    async fn test_missing_required_has_no_side_effects() {
        let (dir, dispatcher, _) = dispatcher();
        let envelope = dispatcher
            .dispatch(CallRequest::new("createNote", json!({"filename": "a.md"})))
            .await;
        assert_eq!(
            envelope.error(),
            Some(&DispatchError::Validation(ValidationError::missing("content")))
        );
        assert!(!dir.path().join("a.md").exists());
    }

    #[tokio::test]
    async fn test_stringified_arguments_and_bad_json() {
        let (dir, dispatcher, _) = dispatcher();
        std::fs::write(dir.path().join("a.md"), "alpha").unwrap();

        let envelope = dispatcher
            .dispatch(CallRequest::new("readFile", json!("{\"filePath\":\"a.md\"}")))
            .await;
        assert_eq!(envelope.payload(), json!("alpha"));

        let envelope = dispatcher
            .dispatch(CallRequest::new("readFile", json!("{not json")))
            .await;
        assert!(matches!(
            envelope.error(),
            Some(DispatchError::Validation(ValidationError::MalformedArguments { .. }))
        ));
    }

    #[tokio::test]
    async fn test_search_uses_default_limit() {
        let (_dir, dispatcher, store) = dispatcher();
        for i in 0..25 {
            store.add_note(format!("/vault/{}.md", i), "weekly review", None);
        }
        let envelope = dispatcher
            .dispatch(CallRequest::new("search", json!({"query": "review"})))
            .await;
        assert_eq!(envelope.payload().as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_dispatch_all_keeps_order() {
        let (dir, dispatcher, _) = dispatcher();
        std::fs::write(dir.path().join("a.md"), "alpha").unwrap();

        let envelopes = dispatcher
            .dispatch_all(vec![
                CallRequest::new("readFile", json!({"filePath": "a.md"})).with_call_id("1"),
                CallRequest::new("nope", json!({})).with_call_id("2"),
                CallRequest::new("listFiles", Value::Null).with_call_id("3"),
            ])
            .await;

        let ids: Vec<&str> = envelopes.iter().map(|e| e.call_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(envelopes[0].payload(), json!("alpha"));
        assert!(envelopes[1].is_error());
        assert_eq!(envelopes[2].payload(), json!(["a.md"]));
    }

    #[tokio::test]
    async fn test_vault_switch_is_honored() {
        use crate::interfaces::adapters::{LocalFileSystem, SharedVaultRoot};

        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        std::fs::write(second.path().join("b.md"), "").unwrap();

        let root = SharedVaultRoot::new(first.path());
        let ctx = ToolContext::new(
            Arc::new(root.clone()),
            Arc::new(LocalFileSystem::new()),
            Arc::new(InMemoryKnowledgeStore::new()),
        );
        let dispatcher = ToolDispatcher::with_builtin(ctx).unwrap();

        let listed = dispatcher.dispatch(CallRequest::new("listFiles", json!([]))).await;
        assert_eq!(listed.payload(), json!([]));

        root.switch_to(second.path());
        let listed = dispatcher.dispatch(CallRequest::new("listFiles", json!([]))).await;
        assert_eq!(listed.payload(), json!(["b.md"]));
    }

    /// Arguments that should succeed for `def` in a vault holding
    /// `existing.md`.
    fn well_formed_args(
        def: &crate::capabilities::CapabilityDefinition,
    ) -> serde_json::Map<String, Value> {
        def.parameters
            .iter()
            .filter(|p| p.is_required())
            .map(|p| {
                let value = match (def.name.as_str(), p.name.as_str()) {
                    ("createNote", "filename") => json!("fresh.md"),
                    (_, "filename") | (_, "filePath") => json!("existing.md"),
                    (_, "directoryName") => json!("folder"),
                    (_, "query") => json!("review"),
                    (_, "content") => json!("text"),
                    _ => match p.param_type.as_str() {
                        "number" => json!(3),
                        "boolean" => json!(true),
                        _ => json!("value"),
                    },
                };
                (p.name.clone(), value)
            })
            .collect()
    }

    #[tokio::test]
    async fn test_every_capability_accepts_well_formed_call() {
        for def in CapabilityRegistry::builtin().list() {
            let (dir, dispatcher, _) = dispatcher();
            std::fs::write(dir.path().join("existing.md"), "weekly review").unwrap();
            let call_id = format!("call-{}", def.name);

            let envelope = dispatcher
                .dispatch(
                    CallRequest::new(def.name.clone(), Value::Object(well_formed_args(def)))
                        .with_call_id(call_id.clone()),
                )
                .await;

            assert!(!envelope.is_error(), "{}: {:?}", def.name, envelope.error());
            assert_eq!(envelope.call_id, call_id);
            let part = serde_json::to_value(envelope.to_tool_result_part()).unwrap();
            assert_eq!(part["toolCallId"], call_id.as_str());
            assert!(part.get("isError").is_none());
        }
    }

    #[tokio::test]
    async fn test_every_required_parameter_is_enforced() {
        for def in CapabilityRegistry::builtin().list() {
            for required in def.parameters.iter().filter(|p| p.is_required()) {
                let (dir, dispatcher, _) = dispatcher();
                std::fs::write(dir.path().join("existing.md"), "weekly review").unwrap();
                let mut args = well_formed_args(def);
                args.remove(&required.name);

                let envelope = dispatcher
                    .dispatch(
                        CallRequest::new(def.name.clone(), Value::Object(args))
                            .with_call_id("missing"),
                    )
                    .await;

                assert_eq!(
                    envelope.error(),
                    Some(&DispatchError::Validation(ValidationError::missing(
                        required.name.clone()
                    ))),
                    "{} without {}",
                    def.name,
                    required.name
                );
                assert_eq!(envelope.call_id, "missing");
                assert_eq!(
                    std::fs::read_to_string(dir.path().join("existing.md")).unwrap(),
                    "weekly review"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_relative_vault_root_cannot_read_outside() {
        use crate::interfaces::adapters::LocalFileSystem;

        let outside = tempfile::tempdir().unwrap();
        let secret = outside.path().join("secret.md");
        std::fs::write(&secret, "hidden").unwrap();

        let ctx = ToolContext::new(
            Arc::new(FixedVaultRoot::new(".")),
            Arc::new(LocalFileSystem::new()),
            Arc::new(InMemoryKnowledgeStore::new()),
        );
        let dispatcher = ToolDispatcher::with_builtin(ctx).unwrap();

        let envelope = dispatcher
            .dispatch(CallRequest::new(
                "readFile",
                json!({"filePath": secret.to_str().unwrap()}),
            ))
            .await;
        assert!(matches!(
            envelope.error(),
            Some(DispatchError::Capability(CapabilityError::OutsideVault { .. }))
        ));
    }

    struct PanickingFs;

    #[async_trait]
    impl FileSystemService for PanickingFs {
        async fn create_file(&self, _: &Path, _: &str) -> Result<(), FileSystemError> {
            Ok(())
        }
        async fn read_file(&self, _: &Path) -> Result<String, FileSystemError> {
            panic!("disk on fire")
        }
        async fn write_file(&self, _: &Path, _: &str) -> Result<(), FileSystemError> {
            Ok(())
        }
        async fn delete_file(&self, _: &Path) -> Result<(), FileSystemError> {
            Ok(())
        }
        async fn create_directory(&self, _: &Path) -> Result<(), FileSystemError> {
            Ok(())
        }
        async fn list_files_tree(&self, _: &Path) -> Result<Vec<FileEntry>, FileSystemError> {
            Err(FileSystemError::Unavailable("offline".into()))
        }
        async fn exists(&self, _: &Path) -> Result<bool, FileSystemError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_panics_and_backend_faults_become_envelopes() {
        let ctx = ToolContext::new(
            Arc::new(FixedVaultRoot::new("/vault")),
            Arc::new(PanickingFs),
            Arc::new(InMemoryKnowledgeStore::new()),
        );
        let dispatcher = ToolDispatcher::with_builtin(ctx).unwrap();

        let envelope = dispatcher
            .dispatch(CallRequest::new("readFile", json!({"filePath": "a.md"})))
            .await;
        match envelope.error() {
            Some(DispatchError::Capability(CapabilityError::Internal { message })) => {
                assert!(message.contains("disk on fire"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        let envelope = dispatcher
            .dispatch(CallRequest::new("listFiles", json!({})))
            .await;
        assert!(matches!(
            envelope.error(),
            Some(DispatchError::Capability(CapabilityError::BackendUnavailable { .. }))
        ));
    }

    #[test]
    fn test_registry_without_implementation_is_rejected() {
        let (_dir, ctx, _) = temp_context();
        let mut defs = builtin::all();
        defs.push(crate::capabilities::CapabilityDefinition::new(
            "summarize",
            "Summarize a note",
        ));
        let registry = CapabilityRegistry::new(defs).unwrap();
        assert_eq!(
            ToolDispatcher::new(registry, ctx).unwrap_err(),
            RegistryError::MissingImplementation {
                name: "summarize".into()
            }
        );
    }

    #[test]
    fn test_render_text_description() {
        let text = render_text_description_and_args(CapabilityRegistry::builtin());
        assert!(text.contains("Tool Name: search\nTool Arguments: {query: string, limit: number}"));
        assert_eq!(
            get_tool_names(CapabilityRegistry::builtin()),
            "search, createNote, createDirectory, readFile, deleteNote, editNote, appendToNote, listFiles"
        );
    }
}
