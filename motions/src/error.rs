//! Error types for List Motions.
//!
//! A line that is not a checklist item is never an error; these cover
//! document access and malformed command requests. Configuration and
//! watching report through [`ConfigError`](crate::config::ConfigError) and
//! [`WatcherError`](crate::watcher::WatcherError).

use thiserror::Error;

/// Errors raised by documents and command lookup.
#[derive(Error, Debug)]
pub enum MotionsError {
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A command id the host does not know.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// The cursor or requested line lies outside the document.
    #[error("line {line} out of range (document has {total} lines)")]
    LineOutOfRange { line: usize, total: usize },

    /// A character range that does not fit inside its line.
    #[error("range {start}..{end} out of bounds for line {line} ({len} characters)")]
    RangeOutOfBounds {
        line: usize,
        start: usize,
        end: usize,
        len: usize,
    },
}

/// A specialized `Result` type for List Motions operations.
pub type Result<T> = std::result::Result<T, MotionsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_conversion_keeps_source() {
        use std::error::Error;

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MotionsError = io_err.into();
        assert!(matches!(err, MotionsError::Io(_)));
        assert!(err.to_string().contains("I/O error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn line_out_of_range_display() {
        let err = MotionsError::LineOutOfRange { line: 9, total: 3 };
        assert_eq!(
            err.to_string(),
            "line 9 out of range (document has 3 lines)"
        );
    }

    #[test]
    fn range_out_of_bounds_display() {
        let err = MotionsError::RangeOutOfBounds {
            line: 2,
            start: 4,
            end: 12,
            len: 8,
        };
        assert_eq!(
            err.to_string(),
            "range 4..12 out of bounds for line 2 (8 characters)"
        );
    }

    #[test]
    fn unknown_command_display() {
        let err = MotionsError::UnknownCommand("toggle".to_string());
        assert_eq!(err.to_string(), "unknown command: toggle");
    }
}
