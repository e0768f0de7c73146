//! In-memory document buffer acting as the editor host.
//!
//! A [`Document`] is an ordered list of lines plus a cursor. It implements
//! [`EditorHost`] so commands can run against a file outside of any editor.
//! Line terminators are stripped on load and restored per line on save, so
//! a trailing newline and any mix of LF and CRLF are written back as read.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::controller::EditorHost;
use crate::error::{MotionsError, Result};

/// Terminator that followed a line in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEnding {
    Lf,
    CrLf,
    /// Last line without a terminator.
    None,
}

impl LineEnding {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

/// A line-oriented text buffer with a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
    endings: Vec<LineEnding>,
    cursor: usize,
    dirty: bool,
}

impl Document {
    /// Builds a document from raw text with the cursor on line 0.
    ///
    /// Each line keeps its own terminator, so mixed LF/CRLF files survive
    /// an edit unchanged outside the edited line.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut endings = Vec::new();

        for raw in text.split_inclusive('\n') {
            let (line, ending) = if let Some(l) = raw.strip_suffix("\r\n") {
                (l, LineEnding::CrLf)
            } else if let Some(l) = raw.strip_suffix('\n') {
                (l, LineEnding::Lf)
            } else {
                (raw, LineEnding::None)
            };
            lines.push(line.to_string());
            endings.push(ending);
        }

        if lines.is_empty() {
            lines.push(String::new());
            endings.push(LineEnding::None);
        }

        Self {
            lines,
            endings,
            cursor: 0,
            dirty: false,
        }
    }

    /// Reads a document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "Loaded document");
        Ok(Self::from_text(&text))
    }

    /// Writes the document to disk and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        fs::write(path, self.text())?;
        self.dirty = false;
        debug!(path = %path.display(), "Saved document");
        Ok(())
    }

    /// Full text with original line endings.
    #[must_use]
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .zip(&self.endings)
            .fold(String::new(), |mut out, (line, ending)| {
                out.push_str(line);
                out.push_str(ending.as_str());
                out
            })
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Moves the cursor to `line`.
    ///
    /// # Errors
    ///
    /// Returns [`MotionsError::LineOutOfRange`] if `line` is past the end.
    pub fn set_cursor(&mut self, line: usize) -> Result<()> {
        self.check_line(line)?;
        self.cursor = line;
        Ok(())
    }

    /// Whether any edit has been applied since load or save.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn check_line(&self, line: usize) -> Result<()> {
        if line >= self.lines.len() {
            return Err(MotionsError::LineOutOfRange {
                line,
                total: self.lines.len(),
            });
        }
        Ok(())
    }
}

impl EditorHost for Document {
    fn cursor_line(&self) -> usize {
        self.cursor
    }

    fn line(&self, line: usize) -> Result<&str> {
        self.check_line(line)?;
        Ok(&self.lines[line])
    }

    fn replace_range(&mut self, line: usize, start: usize, end: usize, text: &str) -> Result<()> {
        self.check_line(line)?;
        let current = &self.lines[line];
        let len = current.chars().count();
        if start > end || end > len {
            return Err(MotionsError::RangeOutOfBounds {
                line,
                start,
                end,
                len,
            });
        }

        let byte_at = |ch: usize| {
            current
                .char_indices()
                .nth(ch)
                .map_or(current.len(), |(i, _)| i)
        };
        let (from, to) = (byte_at(start), byte_at(end));

        let mut replaced = String::with_capacity(current.len() + text.len());
        replaced.push_str(&current[..from]);
        replaced.push_str(text);
        replaced.push_str(&current[to..]);

        self.lines[line] = replaced;
        self.dirty = true;
        Ok(())
    }
}
