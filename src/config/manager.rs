//! Settings ownership with change notification.
//!
//! Anything that depends on settings (a board view, a cached policy) registers
//! a listener instead of reading shared global state. Every successful save
//! calls all current listeners with the new settings.

use std::fmt;
use std::path::{Path, PathBuf};

use super::{BoardConfig, ConfigLocations, Settings};
use crate::error::Result;

/// Handle returned by [`SettingsManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&Settings) + Send + Sync>;

/// Owns the current settings and the file they are saved to.
pub struct SettingsManager {
    settings: Settings,
    path: PathBuf,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl fmt::Debug for SettingsManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsManager")
            .field("settings", &self.settings)
            .field("path", &self.path)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SettingsManager {
    /// Wrap already-loaded settings that save to `path`.
    pub fn new(settings: Settings, path: impl Into<PathBuf>) -> Self {
        Self {
            settings,
            path: path.into(),
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Load from the active location and save to the vault location.
    ///
    /// A legacy file that gets migrated on load is written back immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file is invalid, or if a migrated
    /// file cannot be written back.
    pub fn load(locations: &ConfigLocations) -> Result<Self> {
        let needs_migration = match locations.active_path() {
            Some(path) => {
                let raw = Settings::read_raw(path)?;
                raw.legacy.default_columns.is_some() && raw.boards.is_empty()
            }
            None => false,
        };

        let mut manager = Self::new(
            Settings::load_from(locations)?,
            locations.project_path(),
        );
        if needs_migration {
            manager.save()?;
        }
        Ok(manager)
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a listener called after every successful save.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&Settings) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Persist the current settings and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written; listeners are not
    /// called in that case.
    pub fn save(&mut self) -> Result<()> {
        self.settings.save(&self.path)?;
        self.notify();
        Ok(())
    }

    /// Apply a change, save it and notify listeners.
    ///
    /// The change is made on a copy; if it or the save fails, the current
    /// settings are left as they were.
    ///
    /// # Errors
    ///
    /// Returns the error from `change` or from saving.
    pub fn update<T>(&mut self, change: impl FnOnce(&mut Settings) -> Result<T>) -> Result<T> {
        let mut next = self.settings.clone();
        let value = change(&mut next)?;
        next.save(&self.path)?;
        self.settings = next;
        self.notify();
        Ok(value)
    }

    /// Add a board and save. Returns the board's id.
    ///
    /// # Errors
    ///
    /// See [`Settings::add_board`].
    pub fn add_board(&mut self, board: BoardConfig) -> Result<String> {
        self.update(|s| s.add_board(board))
    }

    /// Replace a board and save.
    ///
    /// # Errors
    ///
    /// See [`Settings::update_board`].
    pub fn update_board(&mut self, board: BoardConfig) -> Result<()> {
        self.update(|s| s.update_board(board))
    }

    /// Delete a board and save.
    ///
    /// # Errors
    ///
    /// See [`Settings::delete_board`].
    pub fn delete_board(&mut self, id: &str) -> Result<BoardConfig> {
        self.update(|s| s.delete_board(id))
    }

    fn notify(&self) {
        tracing::debug!(listeners = self.listeners.len(), "Settings changed");
        for (_, listener) in &self.listeners {
            listener(&self.settings);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardError;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn manager_in(dir: &TempDir) -> SettingsManager {
        let locations = ConfigLocations::new(dir.path()).with_user_path(None);
        SettingsManager::load(&locations).unwrap()
    }

    #[test]
    fn test_save_notifies_subscribers() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        manager.subscribe(move |settings| {
            assert!(!settings.boards.is_empty());
            seen.fetch_add(1, Ordering::SeqCst);
        });

        manager.save().unwrap();
        manager.add_board(BoardConfig::new("Second")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(manager.path().exists());
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = manager.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(manager.unsubscribe(id));
        assert!(!manager.unsubscribe(id));
        manager.save().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(manager.listener_count(), 0);
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        manager.subscribe(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let err = manager.delete_board("default").unwrap_err();
        assert!(matches!(err, BoardError::LastBoard { .. }));
        assert_eq!(manager.settings().boards.len(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!manager.path().exists());
    }

    #[test]
    fn test_legacy_file_is_migrated_and_saved() {
        let dir = TempDir::new().unwrap();
        let locations = ConfigLocations::new(dir.path()).with_user_path(None);
        fs::create_dir_all(locations.project_path().parent().unwrap()).unwrap();
        fs::write(
            locations.project_path(),
            r#"{"defaultColumns": ["Todo", "Done"], "sortByDueDate": true}"#,
        )
        .unwrap();

        let manager = SettingsManager::load(&locations).unwrap();
        assert_eq!(manager.settings().boards[0].columns.len(), 2);

        let raw = fs::read_to_string(locations.project_path()).unwrap();
        assert!(raw.contains("\"boards\""));
        assert!(!raw.contains("defaultColumns"));
    }

    #[test]
    fn test_update_returns_value() {
        let dir = TempDir::new().unwrap();
        let mut manager = manager_in(&dir);
        let count = manager
            .update(|s| {
                s.exclude.push("archive/**".into());
                Ok(s.exclude.len())
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(manager.settings().exclude, vec!["archive/**"]);
    }
}
