//! Custom assertions for board-specific testing.

use crate::board::{Column, SwimlaneAssignment};
use crate::task::{Task, TaskId};

/// Assert that two tasks carry the same parsed content.
///
/// Compares status, clean text, dates, priority, tags and linked notes;
/// ignores identity, raw text, column and swimlane.
///
/// # Panics
///
/// Panics with both records if any compared field differs.
pub fn assert_same_record(actual: &Task, expected: &Task) {
    assert!(
        actual.status == expected.status
            && actual.clean_text == expected.clean_text
            && actual.marker_fields() == expected.marker_fields(),
        "Expected task records to match.\nActual:   {:?}\nExpected: {:?}",
        actual,
        expected
    );
}

/// Assert that tasks appear in exactly this id order.
///
/// # Panics
///
/// Panics if the order differs.
///
/// # Example
///
/// ```rust,ignore
/// assert_task_order(&tasks, &["a.md:1", "b.md:0"]);
/// ```
pub fn assert_task_order(tasks: &[Task], expected: &[&str]) {
    let actual: Vec<String> = tasks.iter().map(|t| t.id.to_string()).collect();
    assert_eq!(
        actual, expected,
        "Expected tasks in order {:?}, but got {:?}",
        expected, actual
    );
}

/// Assert that a task exists and sits in `column`.
///
/// # Panics
///
/// Panics if the task is missing or in another column.
pub fn assert_in_column(tasks: &[Task], id: &TaskId, column: &Column) {
    let task = tasks
        .iter()
        .find(|t| t.id == *id)
        .unwrap_or_else(|| panic!("Expected task {} to exist, but it was not found", id));
    assert_eq!(
        &task.column, column,
        "Expected task {} in column '{}', but it is in '{}'",
        id, column, task.column
    );
}

/// Assert that every task is assigned to `lane`.
///
/// # Panics
///
/// Panics naming the first task in another lane.
pub fn assert_all_in_lane(tasks: &[Task], lane: &SwimlaneAssignment) {
    if let Some(task) = tasks.iter().find(|t| t.swimlane.as_ref() != Some(lane)) {
        panic!(
            "Expected every task in swimlane '{}', but {} is in {:?}",
            lane, task.id, task.swimlane
        );
    }
}

/// Assert that every task carries at least one tag from `allowed`.
///
/// # Panics
///
/// Panics naming the first task that shares no tag with `allowed`.
pub fn assert_tagged_with_any(tasks: &[Task], allowed: &[String]) {
    if let Some(task) = tasks.iter().find(|t| !t.has_any_tag(allowed)) {
        panic!(
            "Expected every task to carry one of {:?}, but {} has {:?}",
            allowed, task.id, task.tags
        );
    }
}
