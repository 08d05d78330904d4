//! Board orchestration: collecting tasks from a store and writing edits back.
//!
//! The document text is always authoritative. [`BoardState`] only caches the
//! task list of the most recent refresh; every write-back re-reads the
//! document, replaces exactly one line, and writes the whole text back.

use super::{assign_swimlane, apply_board_policy, status_for_column, Column, SwimlaneAssignment};
use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::store::{DocumentHandle, DocumentStore};
use crate::task::{
    extract_tasks, line_at, line_count, line_fingerprint, reconstruct_line, replace_line,
    rewrite_status, task_from_line, Task, TaskId,
};

/// Every task in the store, in document-then-line order.
///
/// A document that cannot be read is logged and skipped; the rest of the
/// batch still loads.
///
/// # Errors
///
/// Returns an error only if the store cannot list its documents.
pub async fn collect_tasks<S>(store: &S) -> Result<Vec<Task>>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.list_documents().await?;
    let mut tasks = Vec::new();

    for handle in &documents {
        match store.read_document(&handle.path).await {
            Ok(text) => tasks.extend(extract_tasks(handle, &text)),
            Err(e) => {
                tracing::warn!(document = %handle.path, error = %e, "Skipping unreadable document");
            }
        }
    }

    tracing::debug!(
        documents = documents.len(),
        tasks = tasks.len(),
        "Collected tasks"
    );
    Ok(tasks)
}

/// Collect every task and apply the board's policies.
///
/// # Errors
///
/// See [`collect_tasks`].
pub async fn load_board<S>(store: &S, board: &BoardConfig) -> Result<Vec<Task>>
where
    S: DocumentStore + ?Sized,
{
    let tasks = collect_tasks(store).await?;
    Ok(apply_board_policy(tasks, board))
}

/// Find the document a `[[name]]` link points at.
///
/// An exact `<name>.md` path wins; otherwise the first document whose display
/// name is `name`.
///
/// # Errors
///
/// Returns an error only if the store cannot list its documents.
pub async fn resolve_linked_note<S>(store: &S, name: &str) -> Result<Option<DocumentHandle>>
where
    S: DocumentStore + ?Sized,
{
    let documents = store.list_documents().await?;
    let exact = format!("{}.md", name);

    let found = documents
        .iter()
        .find(|d| d.path == exact)
        .or_else(|| documents.iter().find(|d| d.name == name))
        .cloned();
    Ok(found)
}

/// A board bound to a store, with the task list of its last refresh.
#[derive(Debug)]
pub struct BoardState<S> {
    store: S,
    board: BoardConfig,
    tasks: Vec<Task>,
}

impl<S: DocumentStore> BoardState<S> {
    /// Create an empty state; call [`BoardState::refresh`] to load tasks.
    pub fn new(store: S, board: BoardConfig) -> Self {
        Self {
            store,
            board,
            tasks: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Switch boards. The task list is stale until the next refresh.
    pub fn set_board(&mut self, board: BoardConfig) {
        self.board = board;
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == *id)
    }

    /// Re-read every document and rebuild the task list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed; the previous task list
    /// is kept in that case.
    pub async fn refresh(&mut self) -> Result<&[Task]> {
        self.tasks = load_board(&self.store, &self.board).await?;
        Ok(&self.tasks)
    }

    /// Move a task to another column by rewriting only its status bracket.
    ///
    /// `swimlane`, if given, changes where the task is shown until the next
    /// refresh; it is not written to the document.
    ///
    /// # Errors
    ///
    /// - [`BoardError::TaskNotFound`] if the id is not in the current list
    /// - [`BoardError::LineOutOfRange`] if the document got shorter
    /// - [`BoardError::NotATaskLine`] if the line lost its checklist structure
    /// - any read or write error from the store
    ///
    /// The task list is unchanged on error.
    pub async fn move_task(
        &mut self,
        id: &TaskId,
        column: Column,
        swimlane: Option<SwimlaneAssignment>,
    ) -> Result<Task> {
        let index = self.position(id)?;
        let status = status_for_column(&column);

        let text = self.store.read_document(&id.document).await?;
        let current = self.current_line(&text, &self.tasks[index])?;
        let new_line = rewrite_status(current, &status).ok_or_else(|| BoardError::NotATaskLine {
            document: id.document.clone(),
            line: id.line,
        })?;

        self.write_line(id, &text, &new_line).await?;

        let handle = DocumentHandle::new(id.document.clone());
        let previous = &self.tasks[index];
        let mut moved = task_from_line(&handle, id.line, &new_line).unwrap_or_else(|| {
            let mut task = previous.clone();
            task.set_status(status.clone());
            task
        });
        moved.column = column;
        moved.swimlane = swimlane.or_else(|| previous.swimlane.clone());

        tracing::info!(task = %id, column = %moved.column, "Moved task");
        self.tasks[index] = moved.clone();
        Ok(moved)
    }

    /// Write an edited task back to its line.
    ///
    /// The bracket gets the edited status and the text after it is rebuilt
    /// from the edited fields; the in-memory task is replaced with the record
    /// the new line parses to.
    ///
    /// # Errors
    ///
    /// Same as [`BoardState::move_task`], except that a line which lost its
    /// structure is rewritten as a standard checklist line rather than
    /// rejected. The task list is unchanged on error.
    pub async fn update_task(&mut self, edited: Task) -> Result<Task> {
        let id = edited.id.clone();
        let index = self.position(&id)?;

        let text = self.store.read_document(&id.document).await?;
        let current = self.current_line(&text, &self.tasks[index])?;
        let new_line = reconstruct_line(&edited, current);

        self.write_line(&id, &text, &new_line).await?;

        let handle = DocumentHandle::new(id.document.clone());
        let mut updated = task_from_line(&handle, id.line, &new_line).unwrap_or_else(|| {
            let mut task = edited.clone();
            task.set_status(edited.status.clone());
            task.fingerprint = line_fingerprint(&new_line);
            task
        });
        updated.swimlane = if self.board.swimlanes_enabled {
            Some(assign_swimlane(&updated.tags, &self.board.swimlanes))
        } else {
            None
        };

        tracing::info!(task = %id, "Updated task");
        self.tasks[index] = updated.clone();
        Ok(updated)
    }

    fn position(&self, id: &TaskId) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == *id)
            .ok_or_else(|| BoardError::task_not_found(id.to_string()))
    }

    /// The task's line as it is on disk now.
    fn current_line<'a>(&self, text: &'a str, task: &Task) -> Result<&'a str> {
        let line = line_at(text, task.id.line).ok_or_else(|| BoardError::LineOutOfRange {
            document: task.id.document.clone(),
            line: task.id.line,
            len: line_count(text),
        })?;
        if line_fingerprint(line) != task.fingerprint {
            tracing::warn!(
                task = %task.id,
                "Line changed since the last refresh; writing over the current text"
            );
        }
        Ok(line)
    }

    async fn write_line(&self, id: &TaskId, text: &str, new_line: &str) -> Result<()> {
        let new_text = replace_line(text, id.line, new_line).ok_or_else(|| {
            BoardError::LineOutOfRange {
                document: id.document.clone(),
                line: id.line,
                len: line_count(text),
            }
        })?;
        if new_text == text {
            tracing::debug!(task = %id, "Line unchanged, skipping write");
            return Ok(());
        }
        self.store.write_document(&id.document, &new_text).await
    }
}
