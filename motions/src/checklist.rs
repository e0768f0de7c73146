//! Checklist line recognition and status rewriting.
//!
//! A checklist line is a markdown list item whose bullet is immediately
//! followed by a bracketed status token:
//!
//! ```text
//!   - [ ] open item
//!   * [/] item in progress #todo/in-progress
//!   + [x] done item
//! ```
//!
//! Every operation here is a pure string transform. A line that is not a
//! checklist line is not an error; callers get `None` from
//! [`match_checklist_line`] and are expected to leave the line alone.
//!
//! # Example
//!
//! ```
//! use list_motions::checklist::{count_checklist_items, mark_done, mark_in_progress};
//!
//! assert_eq!(mark_done("  - [ ] buy milk"), "  - [x] buy milk");
//! assert_eq!(
//!     mark_in_progress("- [ ] ship it #todo"),
//!     "- [/] ship it #todo/in-progress"
//! );
//! assert_eq!(count_checklist_items("- [ ] a\n- [x] b\ntext\n* [/] c"), 3);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ChecklistStatus;

/// Tag written by [`mark_in_progress`] in place of every `#todo` tag.
pub const IN_PROGRESS_TAG: &str = "#todo/in-progress";

/// Strict single-line matcher: the status token must be non-empty.
///
/// All three line patterns treat U+FEFF as indentation, so a byte order mark
/// at the start of a file does not hide the first item.
static CHECKLIST_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\s\x{FEFF}]*[-*+] \[([^\]]+)\]").expect("Invalid checklist regex")
});

/// Substitution pattern for the first bracket pair; permits an empty token.
static BRACKET_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\s\x{FEFF}]*[-*+] \[)[^\]]*\]").expect("Invalid bracket regex")
});

/// Loose multi-line counter: any bracketed token right after the bullet.
static COUNT_ITEMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[\s\x{FEFF}]*[-*+] \[.*?\]").expect("Invalid count regex")
});

/// `#todo` or `#todo/<suffix>`, terminated by whitespace or end of line.
///
/// The trailing group captures the terminator so it can be written back.
static TODO_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"#todo(?:/\S*)?(\s|$)").expect("Invalid tag regex"));

/// A successful match of [`match_checklist_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistMatch<'a> {
    /// The raw status token between the brackets.
    pub token: &'a str,
}

impl ChecklistMatch<'_> {
    /// Interprets the token as a known status, if it is one.
    #[must_use]
    pub fn status(&self) -> Option<ChecklistStatus> {
        ChecklistStatus::from_token(self.token)
    }
}

/// Recognizes a checklist line and captures its status token.
///
/// The first `]` after the opening bracket always closes the token, so
/// brackets never nest.
#[must_use]
pub fn match_checklist_line(line: &str) -> Option<ChecklistMatch<'_>> {
    let caps = CHECKLIST_LINE.captures(line)?;
    Some(ChecklistMatch {
        token: caps.get(1)?.as_str(),
    })
}

/// Replaces the content of the first bracket pair after the bullet.
///
/// Everything before the `[` and after the `]` is preserved byte for byte.
/// Lines without a bullet and bracket pair come back unchanged.
#[must_use]
pub fn set_status(line: &str, token: &str) -> String {
    let Some(caps) = BRACKET_CONTENT.captures(line) else {
        return line.to_string();
    };
    let (Some(prefix), Some(whole)) = (caps.get(1), caps.get(0)) else {
        return line.to_string();
    };

    // whole ends just past the closing bracket
    let close = whole.end() - 1;
    let mut out = String::with_capacity(line.len() + token.len());
    out.push_str(&line[..prefix.end()]);
    out.push_str(token);
    out.push_str(&line[close..]);
    out
}

/// Marks the item done (`[x]`).
#[must_use]
pub fn mark_done(line: &str) -> String {
    set_status(line, ChecklistStatus::Done.token())
}

/// Marks the item open (`[ ]`).
#[must_use]
pub fn mark_open(line: &str) -> String {
    set_status(line, ChecklistStatus::Open.token())
}

/// Marks the item in progress (`[/]`) and normalizes its `#todo` tags.
#[must_use]
pub fn mark_in_progress(line: &str) -> String {
    rewrite_todo_tags(&set_status(line, ChecklistStatus::InProgress.token()))
}

/// Rewrites every `#todo` and `#todo/<suffix>` tag to `#todo/in-progress`.
///
/// Existing suffixes are overwritten unconditionally, so `#todo/blocked`
/// becomes `#todo/in-progress` as well.
#[must_use]
pub fn rewrite_todo_tags(line: &str) -> String {
    TODO_TAG
        .replace_all(line, |caps: &regex::Captures<'_>| {
            let terminator = caps.get(1).map_or("", |m| m.as_str());
            format!("{IN_PROGRESS_TAG}{terminator}")
        })
        .into_owned()
}

/// Counts checklist items in a whole document.
///
/// Uses the loose pattern, so `- []` counts even though it is not a
/// commandable line.
#[must_use]
pub fn count_checklist_items(document: &str) -> usize {
    COUNT_ITEMS.find_iter(document).count()
}

/// Applies the transform associated with `status` to a line.
#[must_use]
pub fn apply_status(line: &str, status: ChecklistStatus) -> String {
    match status {
        ChecklistStatus::Done => mark_done(line),
        ChecklistStatus::Open => mark_open(line),
        ChecklistStatus::InProgress => mark_in_progress(line),
    }
}
