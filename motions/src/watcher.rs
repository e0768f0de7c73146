//! File watcher delivering document notifications.
//!
//! This module stands in for the host's change-notification subsystem. It
//! watches a single markdown file, or a directory tree of them, and emits
//! the full content of a document whenever it appears or changes.
//!
//! # Architecture
//!
//! The [`notify`] callback runs on notify's own thread and only forwards
//! paths into an internal channel. A tokio task drains that channel, reads
//! the file, and emits [`DocumentEvent`]s. The first time a path is seen it
//! produces [`DocumentEvent::Activated`]; later reads produce
//! [`DocumentEvent::Changed`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use tokio::sync::mpsc;
//! use list_motions::config::Config;
//! use list_motions::watcher::{DocumentEvent, DocumentWatcher};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let _watcher = DocumentWatcher::new(PathBuf::from("notes"), &Config::default(), tx)?;
//!
//!     while let Some(event) = rx.recv().await {
//!         if let DocumentEvent::Changed { path, content } = event {
//!             println!("{} now has {} bytes", path.display(), content.len());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{
    event::{ModifyKind, RenameMode},
    Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
};
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, error, info, trace, warn};

use crate::config::Config;

/// Notifications emitted by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEvent {
    /// A document was seen for the first time (initial scan or creation).
    Activated { path: PathBuf, content: String },

    /// A known document's content changed.
    Changed { path: PathBuf, content: String },

    /// A document was deleted or moved away.
    Removed(PathBuf),
}

impl DocumentEvent {
    /// Path the event refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Activated { path, .. } | Self::Changed { path, .. } => path,
            Self::Removed(path) => path,
        }
    }
}

#[derive(Debug)]
enum InternalEvent {
    Touched(PathBuf),
    Removed(PathBuf),
}

/// Errors that can occur during file watching operations.
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Failed to initialize the file system watcher.
    #[error("failed to create watcher: {0}")]
    WatcherInit(#[from] notify::Error),

    /// Failed to read a file or directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The watch target does not exist.
    #[error("watch target does not exist: {0}")]
    NotFound(PathBuf),
}

/// Result type for watcher operations.
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Filters paths down to the documents a watcher cares about.
#[derive(Debug, Clone)]
struct Scope {
    /// Set when watching a single file.
    file: Option<PathBuf>,
    config: Config,
}

impl Scope {
    fn accepts(&self, path: &Path) -> bool {
        match &self.file {
            Some(file) => path == file,
            None => self.config.is_document(path),
        }
    }
}

/// Watches markdown documents and emits their content on change.
///
/// Dropping the watcher stops the subscription.
#[derive(Debug)]
pub struct DocumentWatcher {
    #[allow(dead_code)]
    watcher: RecommendedWatcher,
    known: Arc<RwLock<HashSet<PathBuf>>>,
    target: PathBuf,
}

impl DocumentWatcher {
    /// Starts watching `target`, a file or a directory.
    ///
    /// Existing documents are announced immediately as
    /// [`DocumentEvent::Activated`]. Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the target does not exist or notify cannot
    /// subscribe to it.
    pub fn new(
        target: PathBuf,
        config: &Config,
        events: mpsc::Sender<DocumentEvent>,
    ) -> Result<Self> {
        if !target.exists() {
            return Err(WatcherError::NotFound(target));
        }
        let target = target.canonicalize()?;

        let scope = Scope {
            file: target.is_file().then(|| target.clone()),
            config: config.clone(),
        };

        let initial = if scope.file.is_some() {
            vec![target.clone()]
        } else {
            let mut found = Vec::new();
            scan_directory(&target, &scope, &mut found)?;
            found
        };

        info!(
            target = %target.display(),
            documents = initial.len(),
            "Initialized document watcher"
        );

        let (internal_tx, internal_rx) = mpsc::channel::<InternalEvent>(config.buffer_size);

        let known = Arc::new(RwLock::new(HashSet::new()));
        tokio::spawn(process_internal_events(
            initial,
            internal_rx,
            Arc::clone(&known),
            events,
        ));

        let watcher = create_watcher(internal_tx, scope, &target)?;

        Ok(Self {
            watcher,
            known,
            target,
        })
    }

    /// Canonical path being watched.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Number of documents announced so far and not removed.
    pub async fn known_count(&self) -> usize {
        self.known.read().await.len()
    }
}

fn create_watcher(
    internal_tx: mpsc::Sender<InternalEvent>,
    scope: Scope,
    target: &Path,
) -> Result<RecommendedWatcher> {
    // Single files are watched through their parent so editors that save by
    // rename still produce events.
    let (watch_path, mode) = match &scope.file {
        Some(file) => (
            file.parent().unwrap_or(target).to_path_buf(),
            RecursiveMode::NonRecursive,
        ),
        None => (target.to_path_buf(), RecursiveMode::Recursive),
    };

    let mut watcher = RecommendedWatcher::new(
        move |res: std::result::Result<Event, notify::Error>| {
            handle_notify_event(res, &scope, &internal_tx);
        },
        NotifyConfig::default(),
    )?;
    watcher.watch(&watch_path, mode)?;

    debug!(path = %watch_path.display(), ?mode, "Started file watch");
    Ok(watcher)
}

/// Classifies a notify event. Runs on notify's thread, so it never blocks.
fn handle_notify_event(
    res: std::result::Result<Event, notify::Error>,
    scope: &Scope,
    internal_tx: &mpsc::Sender<InternalEvent>,
) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            error!(error = %e, "File watcher error");
            return;
        }
    };

    trace!(kind = ?event.kind, paths = ?event.paths, "Received notify event");

    for (idx, path) in event.paths.iter().enumerate() {
        if !scope.accepts(path) {
            continue;
        }

        let internal = match event.kind {
            EventKind::Create(_) => InternalEvent::Touched(path.clone()),
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
                InternalEvent::Removed(path.clone())
            }
            // For a both-paths rename the first path is the old name.
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if idx == 0 => {
                InternalEvent::Removed(path.clone())
            }
            EventKind::Modify(ModifyKind::Metadata(_)) => continue,
            EventKind::Modify(_) => InternalEvent::Touched(path.clone()),
            EventKind::Remove(_) => InternalEvent::Removed(path.clone()),
            _ => continue,
        };

        if let Err(e) = internal_tx.try_send(internal) {
            warn!(error = %e, "Failed to queue document event, channel may be full");
        }
    }
}

async fn process_internal_events(
    initial: Vec<PathBuf>,
    mut rx: mpsc::Receiver<InternalEvent>,
    known: Arc<RwLock<HashSet<PathBuf>>>,
    sender: mpsc::Sender<DocumentEvent>,
) {
    let mut initial = initial.into_iter();

    loop {
        // Announce documents found by the initial scan before live events.
        let event = match initial.next() {
            Some(path) => InternalEvent::Touched(path),
            None => match rx.recv().await {
                Some(event) => event,
                None => break,
            },
        };

        let out = match event {
            InternalEvent::Touched(path) => {
                let content = match tokio::fs::read_to_string(&path).await {
                    Ok(content) => content,
                    Err(e) => {
                        // Often a transient state mid-save; the next event retries.
                        debug!(path = %path.display(), error = %e, "Skipping unreadable document");
                        continue;
                    }
                };
                if known.write().await.insert(path.clone()) {
                    info!(path = %path.display(), "Document activated");
                    DocumentEvent::Activated { path, content }
                } else {
                    DocumentEvent::Changed { path, content }
                }
            }
            InternalEvent::Removed(path) => {
                if !known.write().await.remove(&path) {
                    continue;
                }
                info!(path = %path.display(), "Document removed");
                DocumentEvent::Removed(path)
            }
        };

        if sender.send(out).await.is_err() {
            debug!("Document event receiver dropped");
            break;
        }
    }

    debug!("Internal event processor shutting down");
}

/// Recursively collects documents under `dir`.
fn scan_directory(dir: &Path, scope: &Scope, found: &mut Vec<PathBuf>) -> Result<()> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            warn!(dir = %dir.display(), "Permission denied, skipping directory");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            scan_directory(&path, scope, found)?;
        } else if scope.accepts(&path) {
            found.push(path);
        }
    }

    Ok(())
}
