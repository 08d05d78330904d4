//! On-disk vault: a directory tree of markdown files.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use super::{DocumentHandle, DocumentStore};
use crate::error::{BoardError, Result};

const MARKDOWN_EXTENSION: &str = "md";
const TMP_SUFFIX: &str = ".taskboard.tmp";

/// Document store backed by a directory.
///
/// Every `*.md` file under the root is a document, except files in hidden
/// directories, hidden files, and paths matching an exclude glob.
///
/// # Example
///
/// ```rust,ignore
/// let store = VaultStore::new("/home/me/notes")
///     .with_excludes(&["templates/**".to_string()])?;
/// let docs = store.list_documents().await?;
/// ```
#[derive(Debug, Clone)]
pub struct VaultStore {
    root: PathBuf,
    excludes: GlobSet,
}

impl VaultStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            excludes: GlobSet::empty(),
        }
    }

    /// Skip documents whose vault-relative path matches any of `patterns`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::InvalidConfig`] if a pattern is not a valid glob.
    pub fn with_excludes(mut self, patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|e| BoardError::InvalidConfig {
                field: "exclude".to_string(),
                reason: format!("'{}': {}", pattern, e),
            })?;
            builder.add(glob);
        }
        self.excludes = builder.build().map_err(|e| BoardError::InvalidConfig {
            field: "exclude".to_string(),
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a vault-relative path onto the filesystem.
    ///
    /// Absolute paths and `..` components are rejected so a document path can
    /// never escape the vault.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if path.is_empty() || escapes {
            return Err(BoardError::DocumentNotFound {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn walk(root: &Path, excludes: &GlobSet) -> Vec<DocumentHandle> {
        let mut handles: Vec<DocumentHandle> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                // The root itself may be a dot-directory.
                e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.')
            })
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(MARKDOWN_EXTENSION))
            })
            .filter_map(|e| relative_path(root, e.path()))
            .filter(|rel| !excludes.is_match(rel))
            .map(DocumentHandle::new)
            .collect();

        handles.sort();
        handles
    }
}

/// Vault-relative path with `/` separators.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[async_trait]
impl DocumentStore for VaultStore {
    async fn list_documents(&self) -> Result<Vec<DocumentHandle>> {
        if !self.root.is_dir() {
            return Err(BoardError::config_with_path(
                "Vault directory does not exist",
                self.root.clone(),
            ));
        }

        let root = self.root.clone();
        let excludes = self.excludes.clone();
        let handles = tokio::task::spawn_blocking(move || Self::walk(&root, &excludes))
            .await
            .map_err(anyhow::Error::from)?;

        tracing::debug!(root = %self.root.display(), documents = handles.len(), "Listed vault");
        Ok(handles)
    }

    async fn read_document(&self, path: &str) -> Result<String> {
        let full = self.resolve(path)?;
        match tokio::fs::read_to_string(&full).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BoardError::DocumentNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(BoardError::read_failed(path, e.to_string())),
        }
    }

    async fn write_document(&self, path: &str, text: &str) -> Result<()> {
        let full = self.resolve(path)?;
        if !tokio::fs::try_exists(&full).await.unwrap_or(false) {
            return Err(BoardError::write_failed(path, "document does not exist"));
        }

        let file_name = full
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp_path = full.with_file_name(format!(".{}{}", file_name, TMP_SUFFIX));

        if let Err(e) = tokio::fs::write(&tmp_path, text).await {
            return Err(BoardError::write_failed(path, e.to_string()));
        }
        if let Err(e) = tokio::fs::rename(&tmp_path, &full).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(BoardError::write_failed(path, e.to_string()));
        }

        tracing::debug!(document = path, bytes = text.len(), "Wrote document");
        Ok(())
    }
}
