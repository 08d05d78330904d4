//! Task records extracted from checklist lines.
//!
//! This module contains the data model and the text engine around it:
//! - [`markers`] - the inline marker vocabulary (tags, links, dates, priority)
//! - [`parsing`] - recognizing checklist lines and building [`Task`] records
//! - [`reconcile`] - writing an edited [`Task`] back into its source line
//!
//! A task is identified by `(document, line index)`. That identity is only
//! stable while line positions are unchanged; the document text is always
//! authoritative and tasks are rebuilt on every parse.

pub mod markers;
pub mod parsing;
pub mod reconcile;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::board::{column_for_status, Column, SwimlaneAssignment};
use crate::error::{BoardError, Result};

pub use markers::{
    clean_text, emit_task_text, parse_markers, scan_markers, Marker, MarkerFields, MarkerToken,
    ParsedText,
};
pub use parsing::{extract_tasks, line_fingerprint, parse_task_line, task_from_line, TaskLine};
pub use reconcile::{line_at, line_count, reconstruct_line, replace_line, rewrite_status};

// ============================================================================
// Task Identity
// ============================================================================

/// Identity of a task: the document it lives in and its zero-based line index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId {
    /// Vault-relative document path
    pub document: String,
    /// Zero-based line index within the document
    pub line: usize,
}

impl TaskId {
    /// Create a new task id.
    pub fn new(document: impl Into<String>, line: usize) -> Self {
        Self {
            document: document.into(),
            line,
        }
    }

    /// Parse a `document:line` string.
    ///
    /// Splits on the last `:` so document paths containing colons still parse.
    ///
    /// # Example
    ///
    /// ```
    /// use taskboard::task::TaskId;
    ///
    /// let id = TaskId::parse("projects/alpha.md:12").unwrap();
    /// assert_eq!(id.document, "projects/alpha.md");
    /// assert_eq!(id.line, 12);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidTaskId`] if there is no `:` separator,
    /// the document part is empty, or the line part is not a number.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || BoardError::InvalidTaskId { id: s.to_string() };
        let (document, line) = s.rsplit_once(':').ok_or_else(invalid)?;
        if document.is_empty() {
            return Err(invalid());
        }
        let line = line.trim().parse().map_err(|_| invalid())?;
        Ok(Self::new(document, line))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document, self.line)
    }
}

impl FromStr for TaskId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// Status Code
// ============================================================================

/// Contents of a checklist line's status bracket.
///
/// Stored trimmed; a bracket holding only whitespace normalizes to `" "` so
/// `- [ ]` and `- [  ]` both read as the Todo status. A status never contains
/// `]` or a line break, so it always fits back inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StatusCode(String);

impl StatusCode {
    /// Normalize raw bracket contents into a status code.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidField`] if `raw` contains `]`, `\n` or `\r`.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.contains([']', '\n', '\r']) {
            return Err(BoardError::invalid_field("status", raw));
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Ok(Self::todo())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn todo() -> Self {
        Self(" ".to_string())
    }

    #[must_use]
    pub fn in_progress() -> Self {
        Self("/".to_string())
    }

    #[must_use]
    pub fn done() -> Self {
        Self("x".to_string())
    }

    #[must_use]
    pub fn cancelled() -> Self {
        Self("-".to_string())
    }

    #[must_use]
    pub fn waiting() -> Self {
        Self("?".to_string())
    }

    /// The status text as written between the brackets.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StatusCode {
    fn default() -> Self {
        Self::todo()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StatusCode {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StatusCode {
    type Error = BoardError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<StatusCode> for String {
    fn from(status: StatusCode) -> Self {
        status.0
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Task priority, written inline as a single symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Inline symbol for this priority.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Priority::High => "🔺",
            Priority::Medium => "🔼",
            Priority::Low => "🔽",
        }
    }

    /// Label word, also accepted right after the symbol (`🔺 High`).
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Higher rank means more urgent.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(trimmed) || p.symbol() == trimmed)
            .ok_or_else(|| BoardError::invalid_field("priority", s))
    }
}

// ============================================================================
// Date Fields
// ============================================================================

/// The three dated fields a task can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateField {
    Start,
    Scheduled,
    Due,
}

impl DateField {
    /// Inline symbol that introduces this date.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            DateField::Start => "🛫",
            DateField::Scheduled => "⏰",
            DateField::Due => "📅",
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DateField::Start => "start",
            DateField::Scheduled => "scheduled",
            DateField::Due => "due",
        }
    }
}

/// Parse a strict `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`BoardError::InvalidField`] if the text is not a real date in that shape.
pub fn parse_date(field: DateField, value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    let shape_ok = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(BoardError::invalid_field(field.name(), value));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| BoardError::invalid_field(field.name(), value))
}

// ============================================================================
// Task
// ============================================================================

/// One checklist line, parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Task text after the status bracket, trimmed, markers included
    pub text: String,
    /// Description with every recognized marker removed
    pub clean_text: String,
    /// Display name of the source document
    pub source_note: String,
    pub status: StatusCode,
    pub column: Column,
    pub start_date: Option<NaiveDate>,
    pub scheduled_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub priority: Option<Priority>,
    pub linked_notes: Vec<String>,
    pub swimlane: Option<SwimlaneAssignment>,
    /// Leading whitespace of the line when it was parsed
    #[serde(skip)]
    pub indent: String,
    /// Short hash of the raw line when it was parsed
    #[serde(skip)]
    pub fingerprint: String,
}

impl Task {
    /// Change the status and re-derive the column from it.
    pub fn set_status(&mut self, status: StatusCode) {
        self.column = column_for_status(status.as_str());
        self.status = status;
    }

    /// Value of one of the dated fields.
    #[must_use]
    pub fn date(&self, field: DateField) -> Option<NaiveDate> {
        match field {
            DateField::Start => self.start_date,
            DateField::Scheduled => self.scheduled_date,
            DateField::Due => self.due_date,
        }
    }

    /// Set one of the dated fields.
    pub fn set_date(&mut self, field: DateField, value: Option<NaiveDate>) {
        match field {
            DateField::Start => self.start_date = value,
            DateField::Scheduled => self.scheduled_date = value,
            DateField::Due => self.due_date = value,
        }
    }

    /// True if the task carries at least one of `tags`.
    #[must_use]
    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|t| self.tags.contains(t))
    }

    /// The marker-carrying fields, as used for emission.
    #[must_use]
    pub fn marker_fields(&self) -> MarkerFields {
        MarkerFields {
            tags: self.tags.clone(),
            linked_notes: self.linked_notes.clone(),
            start_date: self.start_date,
            scheduled_date: self.scheduled_date,
            due_date: self.due_date,
            priority: self.priority,
        }
    }

    /// Task text as it would be written back for the current field values.
    #[must_use]
    pub fn emitted_text(&self) -> String {
        emit_task_text(&self.clean_text, &self.marker_fields())
    }
}
