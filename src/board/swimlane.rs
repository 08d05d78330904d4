//! Swimlanes: tag-matched horizontal groupings, orthogonal to columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the implicit catch-all lane.
pub const OTHER_SWIMLANE: &str = "Other";

/// A configured swimlane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swimlane {
    pub name: String,
    /// A task matches when it carries any of these tags
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Swimlane {
    pub fn new(name: impl Into<String>, tags: &[&str]) -> Self {
        Self {
            name: name.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            enabled: true,
        }
    }

    /// True if this lane is enabled and shares a tag with `task_tags`.
    #[must_use]
    pub fn matches(&self, task_tags: &[String]) -> bool {
        self.enabled && self.tags.iter().any(|t| task_tags.contains(t))
    }
}

/// The lane a task was placed in.
///
/// `Other` is a sentinel, not a configured lane, so it cannot be renamed,
/// deleted or persisted as part of a board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SwimlaneAssignment {
    Named(String),
    Other,
}

impl SwimlaneAssignment {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SwimlaneAssignment::Named(name) => name,
            SwimlaneAssignment::Other => OTHER_SWIMLANE,
        }
    }
}

impl fmt::Display for SwimlaneAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for SwimlaneAssignment {
    fn from(name: String) -> Self {
        if name == OTHER_SWIMLANE {
            SwimlaneAssignment::Other
        } else {
            SwimlaneAssignment::Named(name)
        }
    }
}

impl From<SwimlaneAssignment> for String {
    fn from(lane: SwimlaneAssignment) -> Self {
        match lane {
            SwimlaneAssignment::Named(name) => name,
            SwimlaneAssignment::Other => OTHER_SWIMLANE.to_string(),
        }
    }
}

/// First enabled lane (in configured order) sharing a tag with the task.
///
/// First match, not best match: a task matching several lanes goes to the
/// earliest one. No match yields [`SwimlaneAssignment::Other`].
///
/// # Example
///
/// ```
/// use taskboard::board::{assign_swimlane, Swimlane, SwimlaneAssignment};
///
/// let lanes = vec![Swimlane::new("A", &["x"]), Swimlane::new("B", &["x", "y"])];
/// let tags = vec!["x".to_string()];
/// assert_eq!(assign_swimlane(&tags, &lanes), SwimlaneAssignment::Named("A".into()));
/// assert_eq!(assign_swimlane(&[], &lanes), SwimlaneAssignment::Other);
/// ```
#[must_use]
pub fn assign_swimlane(task_tags: &[String], swimlanes: &[Swimlane]) -> SwimlaneAssignment {
    swimlanes
        .iter()
        .find(|lane| lane.matches(task_tags))
        .map(|lane| SwimlaneAssignment::Named(lane.name.clone()))
        .unwrap_or(SwimlaneAssignment::Other)
}

/// Rows of a swimlane layout: enabled lanes in order, then `Other`.
#[must_use]
pub fn lanes_for(swimlanes: &[Swimlane]) -> Vec<SwimlaneAssignment> {
    swimlanes
        .iter()
        .filter(|lane| lane.enabled)
        .map(|lane| SwimlaneAssignment::Named(lane.name.clone()))
        .chain(std::iter::once(SwimlaneAssignment::Other))
        .collect()
}
