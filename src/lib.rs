//! Taskboard - a kanban board over markdown checklists
//!
//! Tasks are read straight out of checklist lines in a vault of markdown
//! notes, laid out on a board of columns and swimlanes, and edited in place
//! so that only the intended part of the source line changes.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`task`] - Task records, the inline marker codec and line reconciliation
//! - [`board`] - Columns, swimlanes, collection policies and the board service
//! - [`store`] - Document store abstraction and the on-disk vault
//! - [`config`] - Settings loading, migration, validation and change notification
//! - [`error`] - Custom error types and handling
//! - [`testing`] - Testing infrastructure (mocks, fixtures, assertions)
//!
//! # Example
//!
//! ```rust,ignore
//! use taskboard::{BoardState, ConfigLocations, Settings, VaultStore, Column, TaskId};
//!
//! let settings = Settings::load_from(&ConfigLocations::new(vault))?;
//! let store = VaultStore::new(vault).with_excludes(&settings.exclude)?;
//! let mut state = BoardState::new(store, settings.default_board().clone());
//!
//! state.refresh().await?;
//! state.move_task(&TaskId::parse("Inbox.md:2")?, Column::Done, None).await?;
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod store;
pub mod task;
pub mod testing;

// Re-export commonly used types
pub use error::{BoardError, IntoBoardError, Result};

// Re-export task types
pub use task::{
    extract_tasks, reconstruct_line, DateField, Priority, StatusCode, Task, TaskId,
};

// Re-export board types
pub use board::{
    apply_board_policy, column_for_status, status_for_column, BoardState, Column, Swimlane,
    SwimlaneAssignment,
};

// Re-export store types
pub use store::{DocumentHandle, DocumentStore, VaultStore};

// Re-export config types
pub use config::{
    BoardConfig, ConfigLocations, ConfigValidator, Settings, SettingsManager, ValidationReport,
};

// TestVault is only available in test builds
#[cfg(test)]
pub use testing::TestVault;
