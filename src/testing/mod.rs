//! Testing infrastructure for taskboard.
//!
//! - **Mocks**: an in-memory [`crate::store::DocumentStore`] with injectable failures
//! - **Fixtures**: temporary vaults on disk (test-only)
//! - **Assertions**: board-specific assertions with descriptive panics
//!
//! # Example
//!
//! ```rust,ignore
//! use taskboard::testing::{assert_task_order, MockDocumentStore};
//!
//! let store = MockDocumentStore::new().with_document("a.md", "- [ ] one");
//! let tasks = collect_tasks(&store).await?;
//! assert_task_order(&tasks, &["a.md:0"]);
//! ```

pub mod assertions;
#[cfg(test)]
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
#[cfg(test)]
pub use fixtures::*;
pub use mocks::*;
