//! List Motions - checklist status toggling for markdown documents.
//!
//! This binary is the host for the library: it runs the checklist commands
//! against files on disk and renders the live item count while watching.
//!
//! # Commands
//!
//! - `list-motions count <FILE>`: Print the checklist item count
//! - `list-motions mark <COMMAND> <FILE> --line <N>`: Rewrite one line's status
//! - `list-motions commands`: List command ids and names
//! - `list-motions watch <PATH>`: Re-render the count on every change
//!
//! # Environment Variables
//!
//! See the [`config`] module for available configuration options.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::EnvFilter;

use list_motions::config::Config;
use list_motions::controller::{Controller, StatusBar};
use list_motions::document::Document;
use list_motions::types::CommandId;
use list_motions::utils::{Debouncer, Sequencer};
use list_motions::watcher::{DocumentEvent, DocumentWatcher};

/// List Motions - checklist status toggling for markdown documents.
#[derive(Parser, Debug)]
#[command(name = "list-motions")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    LIST_MOTIONS_STATUS_LABEL  Status label (default: List Count)
    LIST_MOTIONS_DEBOUNCE_MS   Watch debounce in ms (default: 100)
    LIST_MOTIONS_BUFFER_SIZE   Watch event buffer size (default: 256)
    LIST_MOTIONS_EXTENSIONS    Comma-separated document extensions (default: md,markdown)

EXAMPLES:
    # Count checklist items
    list-motions count notes/today.md

    # Mark the item on line 4 (0-based) as in progress
    list-motions mark in-progress notes/today.md --line 4

    # Keep a live count while editing
    list-motions watch notes/
")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Print the number of checklist items in a document.
    Count {
        /// Markdown file to count.
        file: PathBuf,

        /// Emit JSON instead of the status text.
        #[arg(long)]
        json: bool,
    },

    /// Set the status of the checklist item on one line.
    ///
    /// Lines that are not checklist items are left untouched.
    Mark {
        /// Command id: done, open, in-progress (or the full list-motion-* id).
        command: CommandId,

        /// Markdown file to edit.
        file: PathBuf,

        /// Zero-based line number of the cursor.
        #[arg(short, long)]
        line: usize,

        /// Print the result without writing the file.
        #[arg(long)]
        dry_run: bool,

        /// Emit the applied edit as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the available commands.
    Commands {
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Watch a document or directory and print the count on every change.
    Watch {
        /// Markdown file or directory to watch.
        path: PathBuf,
    },
}

/// Status element writing to the terminal.
///
/// When `echo` is off the text is only kept on the controller.
struct TerminalStatus {
    echo: bool,
}

impl StatusBar for TerminalStatus {
    fn set_text(&mut self, text: &str) {
        if self.echo {
            println!("{text}");
            let _ = io::stdout().flush();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Count { file, json } => run_count(&config, &file, json),
        Command::Mark {
            command,
            file,
            line,
            dry_run,
            json,
        } => run_mark(&config, command, &file, line, dry_run, json),
        Command::Commands { json } => run_commands(json),
        Command::Watch { path } => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to create tokio runtime")?;

            runtime.block_on(run_watch(config, path))
        }
    }
}

/// Runs the count command.
fn run_count(config: &Config, file: &Path, json: bool) -> Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let mut controller =
        Controller::with_label(TerminalStatus { echo: false }, config.status_label.clone());
    let count = controller.on_active_document_changed(&text);

    if json {
        let report = json!({ "path": file, "count": count });
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", controller.status_text());
    }
    Ok(())
}

/// Runs the mark command against one line of a file.
fn run_mark(
    config: &Config,
    command: CommandId,
    file: &Path,
    line: usize,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let mut doc =
        Document::load(file).with_context(|| format!("Failed to read {}", file.display()))?;
    doc.set_cursor(line)
        .with_context(|| format!("Cannot place cursor in {}", file.display()))?;

    let controller =
        Controller::with_label(TerminalStatus { echo: false }, config.status_label.clone());
    let edit = controller.run_command(command, &mut doc)?;

    if json {
        println!("{}", serde_json::to_string(&json!({ "command": command, "edit": edit }))?);
    } else if let Some(edit) = &edit {
        println!("{}", edit.text);
    }

    match edit {
        Some(_) if !dry_run => {
            doc.save(file)
                .with_context(|| format!("Failed to write {}", file.display()))?;
            info!(path = %file.display(), line, command = %command, "Checklist item updated");
        }
        Some(_) => debug!(path = %file.display(), line, "Dry run, file not written"),
        None => {}
    }
    Ok(())
}

/// Runs the commands listing.
fn run_commands(json: bool) -> Result<()> {
    if json {
        let list: Vec<_> = CommandId::ALL
            .iter()
            .map(|c| json!({ "id": c, "name": c.name(), "status": c.status() }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else {
        for command in CommandId::ALL {
            println!("{:<26} {}", command.id(), command.name());
        }
    }
    Ok(())
}

/// Watches documents and re-renders the count until shutdown.
async fn run_watch(config: Config, path: PathBuf) -> Result<()> {
    info!(path = %path.display(), "Starting List Motions watcher");

    let mut controller =
        Controller::with_label(TerminalStatus { echo: true }, config.status_label.clone());

    let (event_tx, mut event_rx) = mpsc::channel::<DocumentEvent>(config.buffer_size);
    let watcher = DocumentWatcher::new(path.clone(), &config, event_tx)
        .with_context(|| format!("Failed to watch {}", path.display()))?;

    let (changed_tx, mut changed_rx) = mpsc::channel::<(PathBuf, (u64, String))>(config.buffer_size);
    let debouncer = Debouncer::new(config.debounce, changed_tx);
    let mut sequence = Sequencer::new();

    info!(
        target = %watcher.target().display(),
        debounce_ms = config.debounce.as_millis(),
        "Watching. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            _ = wait_for_shutdown() => {
                info!("Shutdown signal received");
                break;
            }

            Some(event) = event_rx.recv() => match event {
                DocumentEvent::Activated { path, content } => {
                    let stamp = sequence.stamp();
                    sequence.accept(stamp);
                    let count = controller.on_active_document_changed(&content);
                    debug!(path = %path.display(), count, "Active document changed");
                }
                DocumentEvent::Changed { path, content } => {
                    let stamp = sequence.stamp();
                    if let Err(e) = debouncer.send(path, (stamp, content)).await {
                        warn!(error = %e, "Dropping change notification");
                    }
                }
                DocumentEvent::Removed(path) => {
                    debug!(path = %path.display(), "Document removed");
                }
            },

            Some((path, (stamp, content))) = changed_rx.recv() => {
                if !sequence.accept(stamp) {
                    trace!(path = %path.display(), stamp, "Skipping change older than last render");
                    continue;
                }
                let count = controller.on_editor_content_changed(&content);
                debug!(path = %path.display(), count, "Document content changed");
            }
        }
    }

    let documents = watcher.known_count().await;
    drop(watcher);
    debouncer.shutdown().await;
    info!(last_count = controller.count(), documents, "Watcher stopped");
    Ok(())
}

/// Initializes the logging subsystem on stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .init();
}

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
