//! Mock implementations for testing.
//!
//! These provide controllable test doubles for the document store, enabling
//! deterministic tests of the board service without touching the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use anyhow::anyhow;
use async_trait::async_trait;

use crate::error::{BoardError, Result};
use crate::store::{DocumentHandle, DocumentStore};

/// In-memory document store.
///
/// Documents are listed in path order. Reads and writes can be made to fail,
/// and every successful write is counted.
///
/// # Example
///
/// ```rust,ignore
/// let store = MockDocumentStore::new()
///     .with_document("inbox.md", "- [ ] Write report #work")
///     .with_read_error("broken.md");
///
/// store.fail_writes("disk full");
/// assert!(store.write_document("inbox.md", "").await.is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockDocumentStore {
    documents: Mutex<BTreeMap<String, String>>,
    read_errors: BTreeSet<String>,
    write_error: Mutex<Option<String>>,
    list_error: Option<String>,
    writes: AtomicU32,
}

impl MockDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document.
    #[must_use]
    pub fn with_document(self, path: &str, text: &str) -> Self {
        self.set_document(path, text);
        self
    }

    /// Make reads of `path` fail. The document still shows up in listings.
    #[must_use]
    pub fn with_read_error(mut self, path: &str) -> Self {
        self.read_errors.insert(path.to_string());
        self.documents
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .entry(path.to_string())
            .or_default();
        self
    }

    /// Make listing documents fail.
    #[must_use]
    pub fn with_list_error(mut self, error: &str) -> Self {
        self.list_error = Some(error.to_string());
        self
    }

    /// Make every following write fail with `error`.
    pub fn fail_writes(&self, error: &str) {
        *self.write_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(error.to_string());
    }

    /// Let writes succeed again.
    pub fn allow_writes(&self) {
        *self.write_error.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Replace a document's text as an outside editor would. Not counted as a write.
    pub fn set_document(&self, path: &str, text: &str) {
        self.docs().insert(path.to_string(), text.to_string());
    }

    /// Current text of a document.
    #[must_use]
    pub fn document(&self, path: &str) -> Option<String> {
        self.docs().get(path).cloned()
    }

    /// Number of successful writes through the store interface.
    #[must_use]
    pub fn write_count(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }

    fn docs(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DocumentStore for MockDocumentStore {
    async fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        if let Some(error) = &self.list_error {
            return Err(BoardError::Other(anyhow!("{}", error)));
        }
        Ok(self.docs().keys().cloned().map(DocumentHandle::new).collect())
    }

    async fn read_document(&self, path: &str) -> Result<String> {
        if self.read_errors.contains(path) {
            return Err(BoardError::read_failed(path, "injected read failure"));
        }
        self.document(path)
            .ok_or_else(|| BoardError::DocumentNotFound {
                path: path.to_string(),
            })
    }

    async fn write_document(&self, path: &str, text: &str) -> Result<()> {
        if let Some(error) = self
            .write_error
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(BoardError::write_failed(path, error));
        }

        let mut docs = self.docs();
        match docs.get_mut(path) {
            Some(slot) => {
                *slot = text.to_string();
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            None => Err(BoardError::write_failed(path, "document does not exist")),
        }
    }
}
