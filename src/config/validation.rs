//! Settings validation.
//!
//! Validation never fails outright: every problem is collected into a
//! [`ValidationReport`] as an error (the settings are unusable as written) or a
//! warning (they work, but probably not as intended).
//!
//! # Example
//!
//! ```rust,ignore
//! use taskboard::config::{ConfigLocations, ConfigValidator};
//!
//! let report = ConfigValidator::new(ConfigLocations::new(vault)).validate();
//! if !report.is_valid() {
//!     eprintln!("{}", report.verbose_report());
//!     std::process::exit(report.exit_code());
//! }
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use globset::Glob;

use super::{BoardConfig, ConfigLocations, Settings};
use crate::board::OTHER_SWIMLANE;

/// Errors and warnings found in a settings file.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems that make the settings unusable.
    pub errors: Vec<String>,
    /// Problems that do not prevent loading.
    pub warnings: Vec<String>,
    /// Files that were read.
    pub files_checked: Vec<PathBuf>,
}

impl ValidationReport {
    /// An empty (valid) report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True if there are no errors. Warnings do not affect validity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// 0 if valid, 1 otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.is_valid() {
            0
        } else {
            1
        }
    }

    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_valid() {
            if self.warnings.is_empty() {
                "Settings are valid.".to_string()
            } else {
                format!("Settings are valid with {} warning(s).", self.warnings.len())
            }
        } else {
            format!("Settings are invalid with {} error(s).", self.errors.len())
        }
    }

    /// Full report: files checked, each error and warning, then the summary.
    #[must_use]
    pub fn verbose_report(&self) -> String {
        let mut lines = vec![
            "Settings Validation Report".to_string(),
            "\u{2500}".repeat(50),
        ];

        if self.files_checked.is_empty() {
            lines.push(String::new());
            lines.push("No settings file found, using defaults.".to_string());
        } else {
            lines.push(String::new());
            lines.push(format!("Files checked ({}):", self.files_checked.len()));
            for file in &self.files_checked {
                lines.push(format!("  - {}", file.display()));
            }
        }

        if !self.errors.is_empty() {
            lines.push(String::new());
            lines.push(format!("Errors ({}):", self.errors.len()));
            for error in &self.errors {
                lines.push(format!("  \u{2717} {}", error));
            }
        }

        if !self.warnings.is_empty() {
            lines.push(String::new());
            lines.push(format!("Warnings ({}):", self.warnings.len()));
            for warning in &self.warnings {
                lines.push(format!("  \u{26a0} {}", warning));
            }
        }

        lines.push(String::new());
        lines.push(format!("Status: {}", self.summary()));
        lines.join("\n")
    }

    fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.files_checked.extend(other.files_checked);
    }
}

/// Check loaded settings for structural problems.
///
/// # Example
///
/// ```
/// use taskboard::config::{validate_settings, Settings};
///
/// let mut settings = Settings::default();
/// assert!(validate_settings(&settings).is_valid());
///
/// settings.boards.clear();
/// assert!(!validate_settings(&settings).is_valid());
/// ```
#[must_use]
pub fn validate_settings(settings: &Settings) -> ValidationReport {
    let mut report = ValidationReport::new();

    if settings.boards.is_empty() {
        report.errors.push("No boards configured".to_string());
    }

    let mut ids = HashSet::new();
    for board in &settings.boards {
        if board.id.trim().is_empty() {
            report
                .errors
                .push(format!("Board '{}' has an empty id", board.name));
        } else if !ids.insert(board.id.as_str()) {
            report
                .errors
                .push(format!("Duplicate board id '{}'", board.id));
        }
        validate_board(board, &mut report);
    }

    for pattern in &settings.exclude {
        if let Err(e) = Glob::new(pattern) {
            report
                .errors
                .push(format!("Invalid exclude pattern '{}': {}", pattern, e));
        }
    }

    report
}

fn validate_board(board: &BoardConfig, report: &mut ValidationReport) {
    let label = if board.name.is_empty() {
        board.id.clone()
    } else {
        board.name.clone()
    };

    if board.columns.is_empty() {
        report
            .errors
            .push(format!("Board '{}' has no columns", label));
    }

    let mut seen = HashSet::new();
    for column in &board.columns {
        if column.name().trim().is_empty() {
            report
                .errors
                .push(format!("Board '{}' has an unnamed column", label));
        } else if !seen.insert(column.name()) {
            report.errors.push(format!(
                "Board '{}' lists column '{}' more than once",
                label, column
            ));
        }
    }

    for lane in &board.swimlanes {
        let name = lane.name.trim();
        if name.is_empty() {
            report
                .errors
                .push(format!("Board '{}' has a swimlane with no name", label));
        } else if name == OTHER_SWIMLANE {
            report.errors.push(format!(
                "Board '{}': '{}' is reserved for unmatched tasks and cannot be a swimlane",
                label, OTHER_SWIMLANE
            ));
        }
        if lane.enabled && lane.tags.is_empty() {
            report.warnings.push(format!(
                "Board '{}': swimlane '{}' has no tags and will never match",
                label, lane.name
            ));
        }
    }

    for column in &board.column_sort_order {
        if !board.columns.contains(column) {
            report.warnings.push(format!(
                "Board '{}': sort order names column '{}' which is not on the board",
                label, column
            ));
        }
    }

    for tag in &board.tag_filters {
        if tag.starts_with('#') {
            report.warnings.push(format!(
                "Board '{}': tag filter '{}' should be written without '#'",
                label, tag
            ));
        }
    }
}

/// Validates the settings file a vault would load.
#[derive(Debug, Clone)]
pub struct ConfigValidator {
    locations: ConfigLocations,
}

impl ConfigValidator {
    #[must_use]
    pub fn new(locations: ConfigLocations) -> Self {
        Self { locations }
    }

    /// Read the active settings file as written and validate it.
    ///
    /// Legacy settings are migrated in memory first, since that is what
    /// loading does; a file with an empty board list is reported rather than
    /// silently given the default board.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        let Some(path) = self.locations.active_path() else {
            report.merge(validate_settings(&Settings::default()));
            return report;
        };
        report.files_checked.push(path.to_path_buf());

        match Settings::read_raw(path) {
            Ok(mut settings) => {
                if settings.migrate_legacy() {
                    report
                        .warnings
                        .push("Legacy single-board settings will be migrated on save".to_string());
                }
                report.merge(validate_settings(&settings));
            }
            Err(e) => report.errors.push(e.to_string()),
        }

        report
    }
}
