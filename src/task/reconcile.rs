//! Writing edited tasks back into document text.
//!
//! Reconciliation touches exactly one line. Inside that line only the status
//! bracket contents and the text after the bracket change; bullet, indentation
//! and the whitespace around the bracket are kept verbatim.

use std::sync::LazyLock;

use regex::Regex;

use super::parsing::split_eol;
use super::{StatusCode, Task};

static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*-\s+\[)([^\]]+)(\]\s+)(.+)$").expect("bracket regex compiles")
});

/// Rebuild a task line from an edited record and the line's current text.
///
/// `current_line` must be read fresh from the document just before writing.
/// If it still has checklist structure, the bracket contents become the
/// edited status and everything after the bracket becomes the emitted task
/// text. Otherwise a standard line is synthesized from the indentation seen at
/// parse time.
///
/// # Example
///
/// ```
/// use taskboard::store::DocumentHandle;
/// use taskboard::task::{extract_tasks, reconstruct_line, StatusCode};
///
/// let line = "  - [ ] Write report #work";
/// let mut task = extract_tasks(&DocumentHandle::new("a.md"), line).remove(0);
/// task.set_status(StatusCode::done());
/// task.tags.push("q1".into());
/// assert_eq!(reconstruct_line(&task, line), "  - [x] Write report #work #q1");
/// ```
#[must_use]
pub fn reconstruct_line(task: &Task, current_line: &str) -> String {
    let (body, eol) = split_eol(current_line);
    let text = task.emitted_text();

    let line = match BRACKET_RE.captures(body) {
        Some(caps) => format!("{}{}{}{}", &caps[1], task.status, &caps[3], text),
        None => format!("{}- [{}] {}", task.indent, task.status, text),
    };
    format!("{}{}", line, eol)
}

/// Replace only the status bracket contents of a checklist line.
///
/// Returns `None` if the line no longer has checklist structure.
///
/// # Example
///
/// ```
/// use taskboard::task::{rewrite_status, StatusCode};
///
/// let line = "- [ ] Write report #work 📅 2024-03-01";
/// assert_eq!(
///     rewrite_status(line, &StatusCode::done()).unwrap(),
///     "- [x] Write report #work 📅 2024-03-01"
/// );
/// ```
#[must_use]
pub fn rewrite_status(current_line: &str, status: &StatusCode) -> Option<String> {
    let (body, eol) = split_eol(current_line);
    let caps = BRACKET_RE.captures(body)?;
    Some(format!(
        "{}{}{}{}{}",
        &caps[1], status, &caps[3], &caps[4], eol
    ))
}

/// Number of lines in a document, counted the way indices are assigned.
#[must_use]
pub fn line_count(document: &str) -> usize {
    document.split('\n').count()
}

/// The line at `index`, or `None` past the end of the document.
#[must_use]
pub fn line_at(document: &str, index: usize) -> Option<&str> {
    document.split('\n').nth(index)
}

/// Replace the line at `index`, leaving every other byte untouched.
///
/// Returns `None` if `index` is past the end of the document.
///
/// # Example
///
/// ```
/// use taskboard::task::replace_line;
///
/// let doc = "a\n- [ ] b\nc\n";
/// assert_eq!(replace_line(doc, 1, "- [x] b").unwrap(), "a\n- [x] b\nc\n");
/// assert!(replace_line(doc, 9, "x").is_none());
/// ```
#[must_use]
pub fn replace_line(document: &str, index: usize, new_line: &str) -> Option<String> {
    let mut lines: Vec<&str> = document.split('\n').collect();
    let slot = lines.get_mut(index)?;
    *slot = new_line;
    Some(lines.join("\n"))
}
