//! Board layout and orchestration.
//!
//! - [`column`] - status <-> column mapping
//! - [`swimlane`] - tag-matched swimlanes and the `Other` sentinel
//! - [`policy`] - filter, assign and sort a task list for one board
//! - [`service`] - load tasks from a store and write edits back

pub mod column;
pub mod policy;
pub mod service;
pub mod swimlane;

pub use column::{column_for_status, status_for_column, Column};
pub use policy::{
    apply_board_policy, assign_swimlanes, filter_by_tags, group_by_swimlane, limit_completed,
    sort_by_column_order, sort_by_due_date,
};
pub use service::{collect_tasks, load_board, resolve_linked_note, BoardState};
pub use swimlane::{assign_swimlane, lanes_for, Swimlane, SwimlaneAssignment, OTHER_SWIMLANE};
