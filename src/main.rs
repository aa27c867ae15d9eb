//! `cv-builder`: create, script, and inspect CV pages from the command line.
//!
//! Documents live as JSON files under `--data-dir`. `apply` replays a JSON
//! array of intents through a full editor session, so scripted edits obey the
//! same clamping, snapping, and history rules as interactive ones.

mod store;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use cv_canvas::config::{ConfigError, EditorConfig};
use cv_canvas::doc::Document;
use cv_canvas::element::Element;
use cv_canvas::intent::Intent;
use cv_canvas::session::{Access, Action, EditorSession, SessionError};
use cv_canvas::store::{DocumentId, Principal, StoreError, UserId};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::store::FileStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "cv-builder", about = "CV page editor driver")]
struct Cli {
    #[arg(long, env = "CV_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Acting user. The nil id is used for single-user setups.
    #[arg(long, env = "CV_USER_ID", default_value_t = Uuid::nil())]
    user: UserId,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty document owned by the acting user.
    New {
        document_id: DocumentId,
        #[arg(long, default_value = "Untitled CV")]
        title: String,
    },
    /// Apply a JSON array of intents to a document and save the result.
    Apply { document_id: DocumentId, script: PathBuf },
    /// Print a document with its elements in paint order.
    Show { document_id: DocumentId },
}

#[derive(Debug, Serialize)]
struct ApplySummary {
    document_id: DocumentId,
    intents: usize,
    changes: usize,
    elements: usize,
    history_entries: usize,
}

#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    id: DocumentId,
    title: &'a str,
    elements: Vec<&'a Element>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = FileStore::new(cli.data_dir);
    let principal = Principal::user(cli.user);

    match cli.command {
        Command::New { document_id, title } => run_new(&store, &principal, document_id, &title).await,
        Command::Apply { document_id, script } => {
            let config = EditorConfig::from_env()?;
            run_apply(&store, &principal, config, document_id, &script).await
        }
        Command::Show { document_id } => run_show(&store, &principal, document_id).await,
    }
}

async fn run_new(store: &FileStore, principal: &Principal, id: DocumentId, title: &str) -> Result<(), CliError> {
    store.create(principal, id, title, Vec::new()).await?;
    info!(%id, dir = %store.root().display(), "new document written");
    println!("{id}");
    Ok(())
}

async fn run_apply(
    store: &FileStore,
    principal: &Principal,
    config: EditorConfig,
    id: DocumentId,
    script: &Path,
) -> Result<(), CliError> {
    let raw = tokio::fs::read_to_string(script)
        .await
        .map_err(|source| CliError::Read { path: script.to_path_buf(), source })?;
    let intents: Vec<Intent> = serde_json::from_str(&raw)?;
    let total = intents.len();

    let mut session = EditorSession::new(config, Access::editor());
    session.load(store, principal, id).await?;

    let mut changes = 0;
    for intent in intents {
        let actions = session.apply(intent);
        changes += actions.iter().filter(|a| **a == Action::DocumentChanged).count();
        if actions.contains(&Action::SaveRequested) {
            session.save(store, principal).await?;
        }
    }
    if session.cancel_gesture() {
        warn!(%id, "script ended mid-gesture; gesture cancelled");
    }
    session.save(store, principal).await?;
    info!(%id, intents = total, changes, "script applied");

    let summary = ApplySummary {
        document_id: id,
        intents: total,
        changes,
        elements: session.document().len(),
        history_entries: session.history().len(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_show(store: &FileStore, principal: &Principal, id: DocumentId) -> Result<(), CliError> {
    let stored = store.document(principal, id).await?;
    let doc = Document::from_elements(stored.elements);
    let output = ShowOutput { id: stored.id, title: &stored.title, elements: doc.paint_order() };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
