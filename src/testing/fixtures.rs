//! Test fixtures for creating reproducible vaults.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{ConfigLocations, Settings};

/// A temporary vault directory.
///
/// Automatically cleans up when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let vault = TestVault::sample();
/// let store = VaultStore::new(vault.path());
/// ```
pub struct TestVault {
    temp_dir: TempDir,
}

impl TestVault {
    /// Create an empty vault.
    ///
    /// # Panics
    ///
    /// Panics if temporary directory creation fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Create a vault with a few notes covering every marker kind.
    ///
    /// # Panics
    ///
    /// Panics if file creation fails.
    #[must_use]
    pub fn sample() -> Self {
        Self::empty()
            .with_note("Inbox.md", Self::inbox_content())
            .with_note("projects/Client Notes.md", Self::client_content())
            .with_note("templates/Daily.md", "- [ ] Template task #template\n")
    }

    /// Add a note at a vault-relative path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn with_note(self, path: &str, content: &str) -> Self {
        let full = self.temp_dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create note directory");
        }
        std::fs::write(&full, content).expect("Failed to write note");
        self
    }

    /// Save settings into the vault.
    ///
    /// # Panics
    ///
    /// Panics if the settings cannot be written.
    #[must_use]
    pub fn with_settings(self, settings: &Settings) -> Self {
        settings
            .save(&self.settings_path())
            .expect("Failed to write settings");
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        ConfigLocations::project_path_for(self.path())
    }

    /// Settings locations for this vault with the user fallback disabled.
    #[must_use]
    pub fn locations(&self) -> ConfigLocations {
        ConfigLocations::new(self.path()).with_user_path(None)
    }

    /// Read a note back.
    ///
    /// # Panics
    ///
    /// Panics if the note cannot be read.
    #[must_use]
    pub fn read_note(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read note")
    }

    fn inbox_content() -> &'static str {
        r#"# Inbox

- [ ] Write report #work 📅 2024-03-01
- [/] Review budget #work #finance 🔼
- [x] Buy groceries #home
  - [?] Ask about the delivery slot ⏰ 2024-02-20
Some prose that mentions #work but is not a task.
"#
    }

    fn client_content() -> &'static str {
        r#"# Client Notes

- [ ] Call client [[Client Notes|notes]] 🔺 🛫 2024-02-01 #work
- [-] Old proposal #work
"#
    }
}
