//! Checklist line recognition and task extraction.
//!
//! A task line is optional indentation, a `-` bullet, a bracketed status and
//! at least one character of task text:
//!
//! ```text
//!     - [/] Call client [[Client Notes]] 🔼
//! ```
//!
//! Anything else is ignored without error.

use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use super::markers::parse_markers;
use super::{StatusCode, Task, TaskId};
use crate::board::column_for_status;
use crate::store::DocumentHandle;

static TASK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)-\s+\[([^\]]+)\]\s+(.+)$").expect("task line regex compiles")
});

// ============================================================================
// Line Recognition
// ============================================================================

/// The three parts of a recognized checklist line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLine<'a> {
    pub indent: &'a str,
    /// Raw bracket contents, untrimmed
    pub status: &'a str,
    /// Everything after the bracket and its trailing whitespace
    pub text: &'a str,
}

/// Strip a trailing carriage return left over from CRLF line endings.
pub(crate) fn split_eol(line: &str) -> (&str, &str) {
    match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    }
}

/// Recognize a checklist line.
///
/// # Example
///
/// ```
/// use taskboard::task::parse_task_line;
///
/// let line = parse_task_line("  - [x] Ship it").unwrap();
/// assert_eq!(line.indent, "  ");
/// assert_eq!(line.status, "x");
/// assert_eq!(line.text, "Ship it");
///
/// assert!(parse_task_line("- [] empty bracket").is_none());
/// assert!(parse_task_line("* [ ] star bullet").is_none());
/// ```
#[must_use]
pub fn parse_task_line(line: &str) -> Option<TaskLine<'_>> {
    let (body, _) = split_eol(line);
    let caps = TASK_LINE_RE.captures(body)?;
    Some(TaskLine {
        indent: caps.get(1)?.as_str(),
        status: caps.get(2)?.as_str(),
        text: caps.get(3)?.as_str(),
    })
}

/// Short, stable hash of a line's content (CR excluded).
#[must_use]
pub fn line_fingerprint(line: &str) -> String {
    let (body, _) = split_eol(line);
    let digest = Sha256::digest(body.as_bytes());
    hex::encode(&digest[..8])
}

// ============================================================================
// Extraction
// ============================================================================

/// Build a task from one recognized line.
///
/// `None` if the bracket holds something that is not a valid status.
fn build_task(
    handle: &DocumentHandle,
    index: usize,
    raw: &str,
    line: TaskLine<'_>,
) -> Option<Task> {
    let status = StatusCode::parse(line.status).ok()?;
    let parsed = parse_markers(line.text);

    Some(Task {
        id: TaskId::new(handle.path.clone(), index),
        text: line.text.trim().to_string(),
        clean_text: parsed.clean_text,
        source_note: handle.name.clone(),
        column: column_for_status(status.as_str()),
        status,
        start_date: parsed.fields.start_date,
        scheduled_date: parsed.fields.scheduled_date,
        due_date: parsed.fields.due_date,
        tags: parsed.fields.tags,
        priority: parsed.fields.priority,
        linked_notes: parsed.fields.linked_notes,
        swimlane: None,
        indent: line.indent.to_string(),
        fingerprint: line_fingerprint(raw),
    })
}

/// Parse one line as the task at `index` of a document, if it is a task line.
#[must_use]
pub fn task_from_line(handle: &DocumentHandle, index: usize, raw: &str) -> Option<Task> {
    parse_task_line(raw).and_then(|line| build_task(handle, index, raw, line))
}

/// Extract every task from one document's full text, in line order.
///
/// Lines are split on `\n` so indices match the document exactly; a trailing
/// `\r` is ignored for matching.
///
/// # Example
///
/// ```
/// use taskboard::store::DocumentHandle;
/// use taskboard::task::extract_tasks;
///
/// let handle = DocumentHandle::new("inbox.md");
/// let tasks = extract_tasks(&handle, "# Inbox\n- [ ] Write report #work\nnotes\n- [x] Done thing");
/// assert_eq!(tasks.len(), 2);
/// assert_eq!(tasks[0].id.to_string(), "inbox.md:1");
/// assert_eq!(tasks[1].id.line, 3);
/// ```
#[must_use]
pub fn extract_tasks(handle: &DocumentHandle, text: &str) -> Vec<Task> {
    let tasks: Vec<Task> = text
        .split('\n')
        .enumerate()
        .filter_map(|(index, raw)| task_from_line(handle, index, raw))
        .collect();

    tracing::debug!(document = %handle.path, tasks = tasks.len(), "Extracted tasks");
    tasks
}
