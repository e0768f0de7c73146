//! Shared types for checklist commands and line edits.
//!
//! Command ids are stable strings the host binds keys to. All types
//! serialize to kebab-case/camelCase JSON for the CLI's `--json` output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MotionsError;

/// Known status tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChecklistStatus {
    Open,
    InProgress,
    Done,
}

impl ChecklistStatus {
    /// The literal written between the brackets.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Open => " ",
            Self::InProgress => "/",
            Self::Done => "x",
        }
    }

    /// Reverse of [`token`](Self::token). Unknown tokens yield `None`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            " " => Some(Self::Open),
            "/" => Some(Self::InProgress),
            "x" => Some(Self::Done),
            _ => None,
        }
    }
}

/// The three commands exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandId {
    #[serde(rename = "list-motion-done")]
    MarkDone,
    #[serde(rename = "list-motion-open")]
    MarkOpen,
    #[serde(rename = "list-motion-in-progress")]
    MarkInProgress,
}

impl CommandId {
    /// Every command, in registration order.
    pub const ALL: [CommandId; 3] = [Self::MarkDone, Self::MarkOpen, Self::MarkInProgress];

    /// Stable identifier used for key bindings.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::MarkDone => "list-motion-done",
            Self::MarkOpen => "list-motion-open",
            Self::MarkInProgress => "list-motion-in-progress",
        }
    }

    /// Human-readable name shown in command listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MarkDone => "Mark List Instance as Done",
            Self::MarkOpen => "Mark List Instance as Open",
            Self::MarkInProgress => "Mark List Instance as In Progress",
        }
    }

    /// Status this command writes.
    #[must_use]
    pub const fn status(self) -> ChecklistStatus {
        match self {
            Self::MarkDone => ChecklistStatus::Done,
            Self::MarkOpen => ChecklistStatus::Open,
            Self::MarkInProgress => ChecklistStatus::InProgress,
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CommandId {
    type Err = MotionsError;

    /// Accepts the full id (`list-motion-done`) or its short form (`done`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let short = s.strip_prefix("list-motion-").unwrap_or(s);
        match short {
            "done" => Ok(Self::MarkDone),
            "open" => Ok(Self::MarkOpen),
            "in-progress" => Ok(Self::MarkInProgress),
            _ => Err(MotionsError::UnknownCommand(s.to_string())),
        }
    }
}

/// A whole-line replacement produced by a command.
///
/// Offsets are in characters: `start` is always 0 and `end` is the length
/// of the line being replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineEdit {
    /// Zero-based line number.
    pub line: usize,
    pub start: usize,
    pub end: usize,
    /// Replacement text for the range.
    pub text: String,
}

impl LineEdit {
    /// Builds an edit replacing all of `original` on `line` with `text`.
    #[must_use]
    pub fn replace_line(line: usize, original: &str, text: String) -> Self {
        Self {
            line,
            start: 0,
            end: original.chars().count(),
            text,
        }
    }
}
