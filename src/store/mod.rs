//! Document storage abstraction.
//!
//! The board never touches the filesystem directly. Everything goes through a
//! [`DocumentStore`], which lists markdown documents, reads their full text and
//! replaces their full text. [`VaultStore`] is the on-disk implementation; tests
//! use [`crate::testing::MockDocumentStore`].

pub mod vault;

pub use vault::VaultStore;

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A document known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentHandle {
    /// Vault-relative path with `/` separators, e.g. `projects/alpha.md`
    pub path: String,
    /// Display name: the file name without its extension
    pub name: String,
}

impl DocumentHandle {
    /// Create a handle, deriving the display name from the path.
    ///
    /// # Example
    ///
    /// ```
    /// use taskboard::store::DocumentHandle;
    ///
    /// let handle = DocumentHandle::new("projects/Client Notes.md");
    /// assert_eq!(handle.name, "Client Notes");
    /// ```
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = Path::new(&path)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());
        Self { path, name }
    }
}

/// Source of markdown documents.
///
/// Implementations must be safe to share between tasks; the board service
/// holds one behind a shared reference.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Enumerate every markdown document, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself cannot be listed.
    async fn list_documents(&self) -> Result<Vec<DocumentHandle>>;

    /// Read a document's full text.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BoardError::DocumentNotFound`] if the document is gone,
    /// or [`crate::BoardError::ReadFailed`] for any other failure.
    async fn read_document(&self, path: &str) -> Result<String>;

    /// Replace a document's full text.
    ///
    /// Only existing documents can be written.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BoardError::WriteFailed`] if the write did not happen.
    async fn write_document(&self, path: &str, text: &str) -> Result<()>;
}
