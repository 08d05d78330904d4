//! Board columns and the status <-> column mapping.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::task::StatusCode;

/// A board column. The five workflow columns map to and from a status code;
/// any other configured name is a [`Column::Custom`] column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Column {
    Todo,
    InProgress,
    Done,
    Cancelled,
    WaitingOnFeedback,
    Custom(String),
}

impl Column {
    /// The workflow columns, in workflow order.
    pub const BUILTIN: [Column; 5] = [
        Column::Todo,
        Column::InProgress,
        Column::Done,
        Column::Cancelled,
        Column::WaitingOnFeedback,
    ];

    /// Display name, also used in settings files.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Column::Todo => "Todo",
            Column::InProgress => "In Progress",
            Column::Done => "Done",
            Column::Cancelled => "Cancelled",
            Column::WaitingOnFeedback => "Waiting on Feedback",
            Column::Custom(name) => name,
        }
    }

    /// Column for a display name. Unknown names become custom columns.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Column::BUILTIN
            .into_iter()
            .find(|c| c.name() == name)
            .unwrap_or_else(|| Column::Custom(name.to_string()))
    }

    #[must_use]
    pub fn is_custom(&self) -> bool {
        matches!(self, Column::Custom(_))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::from_name(&name)
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::from_name(name)
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        match column {
            Column::Custom(name) => name,
            other => other.name().to_string(),
        }
    }
}

impl FromStr for Column {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Column::from_name(s))
    }
}

/// Column a status code belongs in.
///
/// Total: any status outside `' '`, `/`, `x`, `X`, `-`, `?` lands in Todo.
///
/// # Example
///
/// ```
/// use taskboard::board::{column_for_status, Column};
///
/// assert_eq!(column_for_status("/"), Column::InProgress);
/// assert_eq!(column_for_status("X"), Column::Done);
/// assert_eq!(column_for_status(">"), Column::Todo);
/// ```
#[must_use]
pub fn column_for_status(status: &str) -> Column {
    match status {
        " " | "" => Column::Todo,
        "/" => Column::InProgress,
        "x" | "X" => Column::Done,
        "-" => Column::Cancelled,
        "?" => Column::WaitingOnFeedback,
        _ => Column::Todo,
    }
}

/// Status code written when a task is placed in `column`.
///
/// Custom columns have no status of their own and write Todo's `' '`.
#[must_use]
pub fn status_for_column(column: &Column) -> StatusCode {
    match column {
        Column::Todo => StatusCode::todo(),
        Column::InProgress => StatusCode::in_progress(),
        Column::Done => StatusCode::done(),
        Column::Cancelled => StatusCode::cancelled(),
        Column::WaitingOnFeedback => StatusCode::waiting(),
        Column::Custom(_) => StatusCode::todo(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_columns_roundtrip_through_status() {
        for column in Column::BUILTIN {
            let status = status_for_column(&column);
            assert_eq!(column_for_status(status.as_str()), column);
        }
    }

    #[test]
    fn test_unknown_statuses_collapse_to_todo() {
        for status in [">", "!", "*", "done", "  "] {
            let column = column_for_status(status);
            assert_eq!(column, Column::Todo);
            assert_eq!(status_for_column(&column).as_str(), " ");
        }
    }

    #[test]
    fn test_custom_column_writes_todo_status() {
        let column = Column::from_name("Blocked");
        assert!(column.is_custom());
        assert_eq!(status_for_column(&column), StatusCode::todo());
    }

    #[test]
    fn test_names_roundtrip() {
        for column in Column::BUILTIN {
            assert_eq!(Column::from_name(column.name()), column);
        }
        assert_eq!(
            Column::from_name("Someday"),
            Column::Custom("Someday".into())
        );
    }

    #[test]
    fn test_serde_as_display_name() {
        let json = serde_json::to_string(&vec![Column::WaitingOnFeedback, Column::from("Later")])
            .unwrap();
        assert_eq!(json, r#"["Waiting on Feedback","Later"]"#);
        let back: Vec<Column> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0], Column::WaitingOnFeedback);
        assert!(back[1].is_custom());
    }
}
