//! Board settings: loading, saving, legacy migration and the board registry.
//!
//! Settings live in `<vault>/.taskboard/settings.json`, falling back to
//! `<config_dir>/taskboard/settings.json` when the vault has none. A missing
//! file means defaults: a single built-in board.
//!
//! # Example settings.json
//!
//! ```json
//! {
//!   "boards": [
//!     {
//!       "id": "work",
//!       "name": "Work",
//!       "columns": ["Todo", "In Progress", "Waiting on Feedback", "Done"],
//!       "tagFilters": ["work"],
//!       "swimlanesEnabled": true,
//!       "swimlanes": [{ "name": "Clients", "tags": ["client"], "enabled": true }],
//!       "sortByDueDate": true,
//!       "columnSortOrder": ["In Progress", "Todo"],
//!       "maxCompletedItems": 20
//!     }
//!   ],
//!   "exclude": ["templates/**"]
//! }
//! ```

pub mod manager;
pub mod validation;

pub use manager::{SettingsManager, SubscriptionId};
pub use validation::{validate_settings, ConfigValidator, ValidationReport};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::board::{Column, Swimlane};
use crate::error::{BoardError, Result};

/// Directory inside the vault holding taskboard files
pub const SETTINGS_DIR: &str = ".taskboard";
/// Settings file name, in the vault and in the user config directory
pub const SETTINGS_FILE: &str = "settings.json";
/// Id of the built-in board
pub const DEFAULT_BOARD_ID: &str = "default";

const TMP_SUFFIX: &str = ".tmp";

static DEFAULT_BOARD: LazyLock<BoardConfig> = LazyLock::new(|| BoardConfig {
    id: DEFAULT_BOARD_ID.to_string(),
    name: default_board_name(),
    columns: default_columns(),
    tag_filters: Vec::new(),
    swimlanes_enabled: false,
    swimlanes: vec![
        Swimlane::new("Work Tasks", &["work"]),
        Swimlane::new("Personal Tasks", &["personal"]),
    ],
    sort_by_due_date: true,
    column_sort_order: default_columns(),
    max_completed_items: default_max_completed_items(),
});

fn default_board_name() -> String {
    "Default Board".to_string()
}

fn default_columns() -> Vec<Column> {
    vec![Column::Todo, Column::InProgress, Column::Done]
}

fn default_max_completed_items() -> usize {
    50
}

// ============================================================================
// Board Configuration
// ============================================================================

/// One board: which columns to show, which tasks to include and how to order them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardConfig {
    #[serde(default)]
    pub id: String,

    #[serde(default = "default_board_name")]
    pub name: String,

    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,

    /// Keep only tasks carrying at least one of these tags (empty keeps all)
    #[serde(default)]
    pub tag_filters: Vec<String>,

    #[serde(default)]
    pub swimlanes_enabled: bool,

    #[serde(default)]
    pub swimlanes: Vec<Swimlane>,

    #[serde(default)]
    pub sort_by_due_date: bool,

    /// Display order override; columns not listed sort last
    #[serde(default)]
    pub column_sort_order: Vec<Column>,

    #[serde(default = "default_max_completed_items")]
    pub max_completed_items: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        DEFAULT_BOARD.clone()
    }
}

impl BoardConfig {
    /// A fresh board with the standard columns and no lanes or sorting.
    ///
    /// The id is left empty; [`Settings::add_board`] assigns one.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            columns: default_columns(),
            tag_filters: Vec::new(),
            swimlanes_enabled: false,
            swimlanes: Vec::new(),
            sort_by_due_date: false,
            column_sort_order: default_columns(),
            max_completed_items: default_max_completed_items(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Flat single-board settings written by old versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_columns: Option<Vec<Column>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status_mapping: Option<BTreeMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimlanes_enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swimlanes: Option<Vec<Swimlane>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by_due_date: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_board_id: Option<String>,
}

impl LegacySettings {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything persisted in `settings.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub boards: Vec<BoardConfig>,

    /// Vault-relative globs of documents to skip
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,

    #[serde(flatten)]
    pub legacy: LegacySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            boards: vec![DEFAULT_BOARD.clone()],
            exclude: Vec::new(),
            legacy: LegacySettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from a file, or defaults if it does not exist.
    ///
    /// Legacy single-board files are migrated, and a file with no boards
    /// gets the built-in default board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let mut settings = Self::read_raw(path)?;
        if settings.migrate_legacy() {
            tracing::info!(path = %path.display(), "Migrated legacy settings to a board list");
        }
        if settings.boards.is_empty() {
            settings.boards.push(DEFAULT_BOARD.clone());
        }
        Ok(settings)
    }

    /// Load from the first existing location: vault, then user config.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] if the chosen file is unreadable or invalid.
    pub fn load_from(locations: &ConfigLocations) -> Result<Self> {
        match locations.active_path() {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a settings file exactly as written, without migration or defaults.
    pub(crate) fn read_raw(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BoardError::config_with_path(format!("Cannot read settings: {}", e), path.to_path_buf())
        })?;
        serde_json::from_str(&content).map_err(|e| {
            BoardError::config_with_path(format!("Invalid settings: {}", e), path.to_path_buf())
        })
    }

    /// Write settings as pretty JSON, atomically.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Io`] if the directory or file cannot be written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_path = path.as_os_str().to_owned();
        tmp_path.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_path);

        let json = serde_json::to_string_pretty(self)?;
        let mut tmp_file = fs::File::create(&tmp_path)?;
        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        fs::rename(&tmp_path, path)?;

        tracing::debug!(path = %path.display(), boards = self.boards.len(), "Saved settings");
        Ok(())
    }

    /// Turn legacy flat settings into a single `default` board.
    ///
    /// Only applies when legacy columns are present and no boards exist.
    /// Returns true if a migration happened, in which case the legacy keys
    /// are dropped.
    pub fn migrate_legacy(&mut self) -> bool {
        let Some(columns) = self.legacy.default_columns.clone() else {
            return false;
        };
        if !self.boards.is_empty() {
            return false;
        }

        let legacy = std::mem::take(&mut self.legacy);
        self.boards.push(BoardConfig {
            id: DEFAULT_BOARD_ID.to_string(),
            name: default_board_name(),
            column_sort_order: columns.clone(),
            columns,
            tag_filters: Vec::new(),
            swimlanes_enabled: legacy.swimlanes_enabled.unwrap_or(false),
            swimlanes: legacy.swimlanes.unwrap_or_default(),
            sort_by_due_date: legacy.sort_by_due_date.unwrap_or(false),
            max_completed_items: default_max_completed_items(),
        });
        true
    }

    // =========================================================================
    // Board registry
    // =========================================================================

    /// The first configured board, or the built-in default if there are none.
    #[must_use]
    pub fn default_board(&self) -> &BoardConfig {
        self.boards.first().unwrap_or(&*DEFAULT_BOARD)
    }

    #[must_use]
    pub fn board_by_id(&self, id: &str) -> Option<&BoardConfig> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// The board with `id`, or the default board when no id is given.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownBoard`] if `id` names no board.
    pub fn resolve_board(&self, id: Option<&str>) -> Result<&BoardConfig> {
        match id {
            Some(id) => self
                .board_by_id(id)
                .ok_or_else(|| BoardError::UnknownBoard { id: id.to_string() }),
            None => Ok(self.default_board()),
        }
    }

    /// Append a board, generating an id if it has none. Returns the id.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidConfig`] if the id is already taken.
    pub fn add_board(&mut self, mut board: BoardConfig) -> Result<String> {
        if board.id.trim().is_empty() {
            board.id = uuid::Uuid::new_v4().to_string();
        }
        if self.board_by_id(&board.id).is_some() {
            return Err(BoardError::InvalidConfig {
                field: "boards.id".to_string(),
                reason: format!("board id '{}' already exists", board.id),
            });
        }
        let id = board.id.clone();
        self.boards.push(board);
        Ok(id)
    }

    /// Replace the board with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownBoard`] if no board has that id.
    pub fn update_board(&mut self, board: BoardConfig) -> Result<()> {
        let slot = self
            .boards
            .iter_mut()
            .find(|b| b.id == board.id)
            .ok_or_else(|| BoardError::UnknownBoard {
                id: board.id.clone(),
            })?;
        *slot = board;
        Ok(())
    }

    /// Remove a board and return it.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownBoard`] for an unknown id and
    /// [`BoardError::LastBoard`] if it is the only board left.
    pub fn delete_board(&mut self, id: &str) -> Result<BoardConfig> {
        let index = self
            .boards
            .iter()
            .position(|b| b.id == id)
            .ok_or_else(|| BoardError::UnknownBoard { id: id.to_string() })?;
        if self.boards.len() <= 1 {
            return Err(BoardError::LastBoard { id: id.to_string() });
        }
        Ok(self.boards.remove(index))
    }
}

// ============================================================================
// Locations
// ============================================================================

/// Where settings are looked up: the vault first, then the user config dir.
#[derive(Debug, Clone)]
pub struct ConfigLocations {
    project: PathBuf,
    user: Option<PathBuf>,
}

impl ConfigLocations {
    /// Default locations for a vault.
    #[must_use]
    pub fn new(vault: &Path) -> Self {
        Self {
            project: Self::project_path_for(vault),
            user: Self::default_user_path(),
        }
    }

    /// `<vault>/.taskboard/settings.json`
    #[must_use]
    pub fn project_path_for(vault: &Path) -> PathBuf {
        vault.join(SETTINGS_DIR).join(SETTINGS_FILE)
    }

    /// `<config_dir>/taskboard/settings.json`, if the platform has a config dir.
    #[must_use]
    pub fn default_user_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("taskboard").join(SETTINGS_FILE))
    }

    /// Override the user-level path (`None` disables the fallback).
    #[must_use]
    pub fn with_user_path(mut self, path: Option<PathBuf>) -> Self {
        self.user = path;
        self
    }

    /// Path settings are saved to.
    #[must_use]
    pub fn project_path(&self) -> &Path {
        &self.project
    }

    #[must_use]
    pub fn user_path(&self) -> Option<&Path> {
        self.user.as_deref()
    }

    /// The file settings are read from, if any exists.
    #[must_use]
    pub fn active_path(&self) -> Option<&Path> {
        if self.project.exists() {
            return Some(&self.project);
        }
        self.user.as_deref().filter(|p| p.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_settings(dir: &TempDir, json: &str) -> PathBuf {
        let path = ConfigLocations::project_path_for(dir.path());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn test_default_board_values() {
        let settings = Settings::default();
        let board = settings.default_board();
        assert_eq!(board.id, "default");
        assert_eq!(board.name, "Default Board");
        assert_eq!(board.columns, default_columns());
        assert!(!board.swimlanes_enabled);
        assert_eq!(board.swimlanes.len(), 2);
        assert_eq!(board.swimlanes[0].tags, vec!["work"]);
        assert!(board.sort_by_due_date);
        assert_eq!(board.max_completed_items, 50);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_camel_case_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(
            &dir,
            r#"{"boards": [{"id": "w", "name": "Work", "tagFilters": ["work"],
                "columns": ["Todo", "Blocked", "Done"], "sortByDueDate": true}]}"#,
        );
        let settings = Settings::load(&path).unwrap();
        let board = settings.board_by_id("w").unwrap();
        assert_eq!(board.tag_filters, vec!["work"]);
        assert_eq!(board.columns[1], Column::Custom("Blocked".into()));
        assert!(board.sort_by_due_date);
        assert!(board.column_sort_order.is_empty());
        assert_eq!(board.max_completed_items, 50);
    }

    #[test]
    fn test_load_invalid_json_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(&dir, "{ not json");
        let err = Settings::load(&path).unwrap_err();
        assert!(matches!(err, BoardError::Config { path: Some(_), .. }));
    }

    #[test]
    fn test_empty_board_list_gets_default_board() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(&dir, r#"{"boards": []}"#);
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.boards.len(), 1);
        assert_eq!(settings.boards[0].id, "default");
    }

    #[test]
    fn test_migrate_legacy_settings() {
        let dir = TempDir::new().unwrap();
        let path = write_settings(
            &dir,
            r#"{"defaultColumns": ["Todo", "Doing", "Done"],
                "taskStatusMapping": {"x": "Done"},
                "swimlanesEnabled": true,
                "swimlanes": [{"name": "Work", "tags": ["work"], "enabled": true}],
                "sortByDueDate": true,
                "currentBoardId": "old"}"#,
        );
        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.boards.len(), 1);
        let board = &settings.boards[0];
        assert_eq!(board.id, "default");
        assert_eq!(board.columns[1], Column::Custom("Doing".into()));
        assert_eq!(board.column_sort_order, board.columns);
        assert!(board.swimlanes_enabled);
        assert_eq!(board.swimlanes[0].name, "Work");
        assert!(board.sort_by_due_date);
        assert!(board.tag_filters.is_empty());
        assert!(settings.legacy.is_empty());

        // Legacy keys are gone once saved
        settings.save(&path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("defaultColumns"));
        assert!(!raw.contains("currentBoardId"));
    }

    #[test]
    fn test_migrate_skipped_when_boards_exist() {
        let mut settings = Settings::default();
        settings.legacy.default_columns = Some(vec![Column::Todo]);
        assert!(!settings.migrate_legacy());
        assert_eq!(settings.boards[0].columns.len(), 3);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = ConfigLocations::project_path_for(dir.path());
        let mut settings = Settings::default();
        settings.exclude.push("templates/**".into());
        settings.add_board(BoardConfig::new("Second")).unwrap();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_add_board_generates_id() {
        let mut settings = Settings::default();
        let id = settings.add_board(BoardConfig::new("Side project")).unwrap();
        assert!(!id.is_empty());
        assert_eq!(settings.board_by_id(&id).unwrap().name, "Side project");
    }

    #[test]
    fn test_add_board_rejects_duplicate_id() {
        let mut settings = Settings::default();
        let mut board = BoardConfig::new("Clash");
        board.id = "default".into();
        assert!(settings.add_board(board).is_err());
    }

    #[test]
    fn test_update_board() {
        let mut settings = Settings::default();
        let mut board = settings.default_board().clone();
        board.name = "Renamed".into();
        settings.update_board(board).unwrap();
        assert_eq!(settings.default_board().name, "Renamed");

        let err = settings.update_board(BoardConfig::new("ghost")).unwrap_err();
        assert!(matches!(err, BoardError::UnknownBoard { .. }));
    }

    #[test]
    fn test_delete_board_keeps_last() {
        let mut settings = Settings::default();
        let err = settings.delete_board("default").unwrap_err();
        assert!(matches!(err, BoardError::LastBoard { .. }));

        let id = settings.add_board(BoardConfig::new("Temp")).unwrap();
        settings.delete_board("default").unwrap();
        assert_eq!(settings.default_board().id, id);
        assert!(matches!(
            settings.delete_board("missing"),
            Err(BoardError::UnknownBoard { .. })
        ));
    }

    #[test]
    fn test_resolve_board() {
        let settings = Settings::default();
        assert_eq!(settings.resolve_board(None).unwrap().id, "default");
        assert_eq!(settings.resolve_board(Some("default")).unwrap().id, "default");
        assert!(settings.resolve_board(Some("nope")).is_err());
    }

    #[test]
    fn test_locations_prefer_project_then_user() {
        let dir = TempDir::new().unwrap();
        let user = dir.path().join("user.json");
        let locations =
            ConfigLocations::new(&dir.path().join("vault")).with_user_path(Some(user.clone()));
        assert!(locations.active_path().is_none());

        fs::write(&user, "{}").unwrap();
        assert_eq!(locations.active_path(), Some(user.as_path()));

        let project = locations.project_path().to_path_buf();
        fs::create_dir_all(project.parent().unwrap()).unwrap();
        fs::write(&project, "{}").unwrap();
        assert_eq!(locations.active_path(), Some(project.as_path()));
    }
}
