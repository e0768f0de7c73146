//! List Motions - checklist status toggling for markdown documents.
//!
//! This crate rewrites the status token of markdown checklist items
//! (`- [ ]`, `- [/]`, `- [x]`) and keeps a live count of checklist items for
//! a status display.
//!
//! # Overview
//!
//! The core is a handful of pure string transforms in [`checklist`]. The
//! [`controller::Controller`] binds them to host events: three commands that
//! rewrite the cursor line, and document notifications that recount items
//! and re-render the status text. A host implements [`controller::EditorHost`]
//! and [`controller::StatusBar`]; this crate ships its own host in the form of
//! [`document::Document`] and [`watcher::DocumentWatcher`], driven by the
//! `list-motions` binary.
//!
//! # Modules
//!
//! - [`checklist`]: Line matching, status rewriting, and item counting
//! - [`types`]: Command ids, status tokens, and line edits
//! - [`controller`]: Event and command handling with the status text
//! - [`document`]: In-memory line buffer implementing the editor host
//! - [`watcher`]: File system watcher emitting document notifications
//! - [`config`]: Configuration from environment variables
//! - [`error`]: Error types for the host integration layer
//! - [`utils`]: Shared utilities (debouncing)

pub mod checklist;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod types;
pub mod utils;
pub mod watcher;

pub use checklist::{
    count_checklist_items, mark_done, mark_in_progress, mark_open, match_checklist_line,
    set_status, ChecklistMatch,
};
pub use config::{Config, ConfigError};
pub use controller::{Controller, EditorHost, StatusBar};
pub use document::Document;
pub use error::{MotionsError, Result};
pub use types::{ChecklistStatus, CommandId, LineEdit};
pub use utils::{Debouncer, DebouncerError, Sequencer, DEFAULT_DEBOUNCE_MS};
pub use watcher::{DocumentEvent, DocumentWatcher, WatcherError};
