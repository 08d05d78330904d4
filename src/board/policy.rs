//! Collection policies applied to a freshly extracted task list.
//!
//! The pipeline order is fixed: tag filter, swimlane assignment, due-date
//! sort, column-order sort. Both sorts are stable, so when both are enabled the
//! column order dominates and due dates order tasks within a column.

use super::swimlane::{assign_swimlane, Swimlane, SwimlaneAssignment};
use super::Column;
use crate::config::BoardConfig;
use crate::task::Task;

/// Run every policy the board enables, in pipeline order.
///
/// # Example
///
/// ```
/// use taskboard::board::apply_board_policy;
/// use taskboard::config::BoardConfig;
/// use taskboard::store::DocumentHandle;
/// use taskboard::task::extract_tasks;
///
/// let text = "- [ ] b #work 📅 2024-05-02\n- [ ] a #work 📅 2024-05-01\n- [ ] c #home";
/// let tasks = extract_tasks(&DocumentHandle::new("n.md"), text);
///
/// let mut board = BoardConfig::new("Work");
/// board.tag_filters = vec!["work".into()];
/// board.sort_by_due_date = true;
///
/// let shown = apply_board_policy(tasks, &board);
/// let names: Vec<_> = shown.iter().map(|t| t.clean_text.as_str()).collect();
/// assert_eq!(names, ["a", "b"]);
/// ```
#[must_use]
pub fn apply_board_policy(tasks: Vec<Task>, board: &BoardConfig) -> Vec<Task> {
    let mut tasks = filter_by_tags(tasks, &board.tag_filters);
    assign_swimlanes(&mut tasks, board.swimlanes_enabled, &board.swimlanes);

    if board.sort_by_due_date {
        sort_by_due_date(&mut tasks);
    }
    if !board.column_sort_order.is_empty() {
        sort_by_column_order(&mut tasks, &board.column_sort_order);
    }

    tracing::debug!(board = %board.id, tasks = tasks.len(), "Applied board policy");
    tasks
}

/// Keep tasks carrying at least one of `filters`. An empty filter keeps all.
#[must_use]
pub fn filter_by_tags(tasks: Vec<Task>, filters: &[String]) -> Vec<Task> {
    if filters.is_empty() {
        return tasks;
    }
    tasks.into_iter().filter(|t| t.has_any_tag(filters)).collect()
}

/// Assign every task a swimlane, or clear assignments when lanes are off.
pub fn assign_swimlanes(tasks: &mut [Task], enabled: bool, swimlanes: &[Swimlane]) {
    for task in tasks.iter_mut() {
        task.swimlane = enabled.then(|| assign_swimlane(&task.tags, swimlanes));
    }
}

/// Stable sort by due date, earliest first; undated tasks go last.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by_key(|t| (t.due_date.is_none(), t.due_date));
}

/// Stable sort by each task's column position in `order`.
///
/// Columns missing from `order` sort after every listed column.
pub fn sort_by_column_order(tasks: &mut [Task], order: &[Column]) {
    tasks.sort_by_key(|t| {
        order
            .iter()
            .position(|c| *c == t.column)
            .unwrap_or(order.len())
    });
}

/// Partition tasks by swimlane, keeping lane order of first appearance and
/// task order within each lane. Unassigned tasks land in `Other`.
#[must_use]
pub fn group_by_swimlane(tasks: &[Task]) -> Vec<(SwimlaneAssignment, Vec<&Task>)> {
    let mut groups: Vec<(SwimlaneAssignment, Vec<&Task>)> = Vec::new();
    for task in tasks {
        let lane = task.swimlane.clone().unwrap_or(SwimlaneAssignment::Other);
        match groups.iter_mut().find(|(l, _)| *l == lane) {
            Some((_, members)) => members.push(task),
            None => groups.push((lane, vec![task])),
        }
    }
    groups
}

/// Keep at most `max` Done tasks (the first ones in order); others untouched.
#[must_use]
pub fn limit_completed(tasks: Vec<Task>, max: usize) -> Vec<Task> {
    let mut done = 0;
    tasks
        .into_iter()
        .filter(|t| {
            if t.column != Column::Done {
                return true;
            }
            done += 1;
            done <= max
        })
        .collect()
}
