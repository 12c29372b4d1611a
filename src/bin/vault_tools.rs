//! `vault-tools`: run agent tool calls against a local vault.
//!
//! Reads one call request, or a JSON array of them, from stdin and prints the
//! transcript tool-result parts as JSON.
//!
//! ```bash
//! echo '{"toolName":"createNote","args":{"filename":"todo.md","content":"buy milk"}}' \
//!     | vault-tools --vault ~/notes
//! vault-tools --specs
//! ```
//!
//! # Environment Variables
//!
//! - `VAULT_AGENT_VAULT_DIR` - vault directory when `--vault` is not given
//! - `RUST_LOG` - tracing filter (default: "info,vault_agent=debug")
//!
//! `--plain-log` switches to the library's `env_logger` line format.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use tokio::io::AsyncReadExt;

use vault_agent::interfaces::{FileSystemService, FixedVaultRoot, LocalFileSystem};
use vault_agent::knowledge::InMemoryKnowledgeStore;
use vault_agent::tools::{CallRequest, ToolContext, ToolDispatcher};
use vault_agent::utilities::{init_logging, EngineConfig};
use vault_agent::CapabilityRegistry;

const USAGE: &str = "usage: vault-tools [--vault DIR] [--specs] [--plain-log]";

struct Args {
    vault: Option<PathBuf>,
    specs: bool,
    plain_log: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        vault: None,
        specs: false,
        plain_log: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--specs" => args.specs = true,
            "--plain-log" => args.plain_log = true,
            "--vault" => {
                let dir = iter.next().context("--vault needs a directory")?;
                args.vault = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(args)
}

/// Index every markdown note in the vault so `search` has something to find.
async fn index_vault(
    fs: &LocalFileSystem,
    root: &Path,
    store: &InMemoryKnowledgeStore,
) -> Result<()> {
    let tree = fs
        .list_files_tree(root)
        .await
        .with_context(|| format!("cannot list vault {}", root.display()))?;

    for entry in tree.iter().flat_map(|e| e.flatten()) {
        if entry.is_directory || entry.path.extension().map_or(true, |ext| ext != "md") {
            continue;
        }
        match fs.read_file(&entry.path).await {
            Ok(content) => {
                let modified = std::fs::metadata(&entry.path)
                    .and_then(|m| m.modified())
                    .ok()
                    .map(chrono::DateTime::<chrono::Utc>::from);
                store.add_note(entry.path.display().to_string(), content, modified);
            }
            Err(e) => tracing::warn!("Skipping {}: {}", entry.path.display(), e),
        }
    }
    tracing::info!("Indexed {} notes from {}", store.len(), root.display());
    Ok(())
}

fn parse_requests(input: &str) -> Result<(Vec<CallRequest>, bool)> {
    let value: Value = serde_json::from_str(input).context("stdin is not valid JSON")?;
    match value {
        Value::Array(items) => {
            let requests = items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<CallRequest>, _>>()
                .context("invalid call request in array")?;
            Ok((requests, true))
        }
        other => {
            let request: CallRequest =
                serde_json::from_value(other).context("invalid call request")?;
            Ok((vec![request], false))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = parse_args()?;

    if args.plain_log {
        init_logging(true);
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info,vault_agent=debug".into()),
            )
            .init();
    }

    if args.specs {
        let specs = CapabilityRegistry::builtin().tool_specs();
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    let mut config = EngineConfig::from_env();
    if let Some(vault) = args.vault {
        config = config.with_vault_dir(vault);
    }
    let vault_dir = config.vault_dir.clone();
    if !vault_dir.is_dir() {
        bail!("vault directory {} does not exist", vault_dir.display());
    }

    let fs = LocalFileSystem::new();
    let store = InMemoryKnowledgeStore::new();
    index_vault(&fs, &vault_dir, &store).await?;

    let context = ToolContext::new(
        Arc::new(FixedVaultRoot::new(vault_dir)),
        Arc::new(fs),
        Arc::new(store),
    );
    let dispatcher = ToolDispatcher::with_builtin(context)?;

    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("cannot read stdin")?;
    let (requests, batch) = parse_requests(&input)?;

    let envelopes = dispatcher.dispatch_all(requests).await;
    let parts: Vec<_> = envelopes.iter().map(|e| e.to_tool_result_part()).collect();

    let output = if batch {
        serde_json::to_string_pretty(&parts)?
    } else {
        match parts.first() {
            Some(part) => serde_json::to_string_pretty(part)?,
            None => "null".to_string(),
        }
    };
    println!("{}", output);
    Ok(())
}
