//! Controller wiring host events and commands to the checklist transforms.
//!
//! The controller is constructed once per session and threaded through the
//! host's event subscriptions. It owns the only piece of mutable state, the
//! status text, which every document event overwrites (last event wins).
//!
//! # Example
//!
//! ```
//! use list_motions::controller::{Controller, StatusBar};
//! use list_motions::types::CommandId;
//!
//! #[derive(Default)]
//! struct Recorder(Vec<String>);
//!
//! impl StatusBar for Recorder {
//!     fn set_text(&mut self, text: &str) {
//!         self.0.push(text.to_string());
//!     }
//! }
//!
//! let mut controller = Controller::new(Recorder::default());
//! assert_eq!(controller.status_text(), "List Count: 0");
//!
//! controller.on_editor_content_changed("- [ ] a\n- [x] b");
//! assert_eq!(controller.status_text(), "List Count: 2");
//!
//! let edit = controller.on_command(CommandId::MarkDone, 0, "- [ ] a").unwrap();
//! assert_eq!(edit.text, "- [x] a");
//! ```

use tracing::{debug, trace};

use crate::checklist::{apply_status, count_checklist_items, match_checklist_line};
use crate::config::DEFAULT_STATUS_LABEL;
use crate::error::Result;
use crate::types::{CommandId, LineEdit};

/// Line-level editor access provided by the host.
pub trait EditorHost {
    /// Zero-based line the cursor is on.
    fn cursor_line(&self) -> usize;

    /// Full text of `line`, without its terminator.
    ///
    /// # Errors
    ///
    /// Returns an error if `line` is outside the document.
    fn line(&self, line: usize) -> Result<&str>;

    /// Replaces the character range `start..end` of `line` with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the line or range is outside the document.
    fn replace_range(&mut self, line: usize, start: usize, end: usize, text: &str) -> Result<()>;
}

/// The single text element the host shows in its status region.
pub trait StatusBar {
    fn set_text(&mut self, text: &str);
}

/// Top-level controller owning the displayed count.
#[derive(Debug)]
pub struct Controller<S: StatusBar> {
    status_bar: S,
    label: String,
    status_text: String,
    count: usize,
}

impl<S: StatusBar> Controller<S> {
    /// Creates a controller with the default label and renders a zero count.
    pub fn new(status_bar: S) -> Self {
        Self::with_label(status_bar, DEFAULT_STATUS_LABEL)
    }

    /// Creates a controller rendering `"{label}: {count}"`.
    pub fn with_label(status_bar: S, label: impl Into<String>) -> Self {
        let mut controller = Self {
            status_bar,
            label: label.into(),
            status_text: String::new(),
            count: 0,
        };
        controller.render(0);
        controller
    }

    /// Current status text.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Count shown by the last render.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Borrow the host status element.
    #[must_use]
    pub fn status_bar(&self) -> &S {
        &self.status_bar
    }

    /// Overwrites the status text with `count` and pushes it to the host.
    pub fn render(&mut self, count: usize) {
        self.count = count;
        self.status_text = format!("{}: {}", self.label, count);
        self.status_bar.set_text(&self.status_text);
    }

    /// Handles a switch to a different document.
    pub fn on_active_document_changed(&mut self, text: &str) -> usize {
        trace!("Active document changed");
        self.recount(text)
    }

    /// Handles an edit to the current document.
    pub fn on_editor_content_changed(&mut self, text: &str) -> usize {
        trace!("Editor content changed");
        self.recount(text)
    }

    /// Computes the edit for `command` on `line_text`.
    ///
    /// Returns `None` when the line is not a checklist item; the host must
    /// then apply no edit at all.
    #[must_use]
    pub fn on_command(
        &self,
        command: CommandId,
        cursor_line: usize,
        line_text: &str,
    ) -> Option<LineEdit> {
        match_checklist_line(line_text)?;

        let text = apply_status(line_text, command.status());
        debug!(command = %command, line = cursor_line, "Checklist line updated");
        Some(LineEdit::replace_line(cursor_line, line_text, text))
    }

    /// Runs `command` against the editor's cursor line.
    ///
    /// Returns the applied edit, or `None` if nothing was changed.
    ///
    /// # Errors
    ///
    /// Propagates host errors from reading or replacing the line.
    pub fn run_command<E: EditorHost>(
        &self,
        command: CommandId,
        editor: &mut E,
    ) -> Result<Option<LineEdit>> {
        let cursor = editor.cursor_line();
        let Some(edit) = self.on_command(command, cursor, editor.line(cursor)?) else {
            return Ok(None);
        };
        editor.replace_range(edit.line, edit.start, edit.end, &edit.text)?;
        Ok(Some(edit))
    }

    fn recount(&mut self, text: &str) -> usize {
        let count = count_checklist_items(text);
        self.render(count);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[derive(Debug, Default)]
    struct RecordingBar {
        writes: Vec<String>,
    }

    impl StatusBar for RecordingBar {
        fn set_text(&mut self, text: &str) {
            self.writes.push(text.to_string());
        }
    }

    #[test]
    fn initial_render_shows_zero() {
        let controller = Controller::new(RecordingBar::default());
        assert_eq!(controller.status_text(), "List Count: 0");
        assert_eq!(controller.status_bar().writes, vec!["List Count: 0"]);
    }

    #[test]
    fn custom_label() {
        let mut controller = Controller::with_label(RecordingBar::default(), "Tasks");
        controller.render(7);
        assert_eq!(controller.status_text(), "Tasks: 7");
    }

    #[test]
    fn last_event_wins() {
        let mut controller = Controller::new(RecordingBar::default());
        assert_eq!(controller.on_active_document_changed("- [ ] a\n- [ ] b"), 2);
        assert_eq!(controller.on_editor_content_changed("- [ ] a"), 1);
        assert_eq!(controller.status_text(), "List Count: 1");
        assert_eq!(controller.count(), 1);
        assert_eq!(
            controller.status_bar().writes,
            vec!["List Count: 0", "List Count: 2", "List Count: 1"]
        );
    }

    #[test]
    fn empty_document_counts_zero() {
        let mut controller = Controller::new(RecordingBar::default());
        controller.on_editor_content_changed("- [ ] a");
        assert_eq!(controller.on_editor_content_changed(""), 0);
        assert_eq!(controller.status_text(), "List Count: 0");
    }

    #[test]
    fn command_on_non_checklist_line_is_noop() {
        let controller = Controller::new(RecordingBar::default());
        for command in CommandId::ALL {
            assert!(controller.on_command(command, 0, "not a list item").is_none());
        }
    }

    #[derive(Clone, Default)]
    struct SharedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn command_on_non_checklist_line_is_silent() {
        let log = SharedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let controller = Controller::new(RecordingBar::default());
        tracing::subscriber::with_default(subscriber, || {
            for command in CommandId::ALL {
                assert!(controller.on_command(command, 4, "plain text").is_none());
            }
        });

        assert!(log.0.lock().unwrap().is_empty());
    }

    #[test]
    fn command_edit_covers_whole_line() {
        let controller = Controller::new(RecordingBar::default());
        let edit = controller
            .on_command(CommandId::MarkInProgress, 3, "  - [ ] a #todo")
            .expect("should edit");
        assert_eq!(edit.line, 3);
        assert_eq!(edit.start, 0);
        assert_eq!(edit.end, 15);
        assert_eq!(edit.text, "  - [/] a #todo/in-progress");
    }

    #[test]
    fn run_command_edits_cursor_line() {
        let controller = Controller::new(RecordingBar::default());
        let mut doc = Document::from_text("# List\n- [ ] one\n- [ ] two\n");
        doc.set_cursor(2).unwrap();

        let edit = controller
            .run_command(CommandId::MarkDone, &mut doc)
            .unwrap()
            .expect("should edit");
        assert_eq!(edit.line, 2);
        assert_eq!(doc.text(), "# List\n- [ ] one\n- [x] two\n");
    }

    #[test]
    fn run_command_without_match_leaves_document() {
        let controller = Controller::new(RecordingBar::default());
        let mut doc = Document::from_text("# List\n- [ ] one\n");

        let edit = controller.run_command(CommandId::MarkDone, &mut doc).unwrap();
        assert!(edit.is_none());
        assert!(!doc.is_dirty());
        assert_eq!(doc.text(), "# List\n- [ ] one\n");
    }
}
