//! Task storage with pluggable backends.
//!
//! Supports:
//! - `file`: JSON file-based storage, rewritten whole after every mutation
//! - `memory`: in-memory storage (non-persistent, for tests)
//!
//! Both backends share the operation logic in this module, so add/complete
//! semantics are identical regardless of persistence. Completion does NOT
//! check dependency state; gating a completion on its pending dependencies is
//! the caller's job, via [`TaskStore::pending_dependencies`].

mod file;
mod memory;

pub use file::FileTaskStore;
pub use memory::InMemoryTaskStore;

use std::path::PathBuf;

use chrono::{DateTime, Local};
use indexmap::IndexMap;

use crate::task::{recurrence, Task, ValidationError};

/// Title -> task mapping, in insertion order.
pub(crate) type TaskMap = IndexMap<String, Task>;

/// Task store contract exposed to the presentation layer.
pub trait TaskStore {
    /// Whether this store persists data across invocations.
    fn is_persistent(&self) -> bool;

    /// All tasks, in insertion order.
    fn list(&self) -> Vec<&Task>;

    /// Look up a single task by title.
    fn get(&self, title: &str) -> Option<&Task>;

    /// Insert a new task.
    ///
    /// # Errors
    /// [`StoreError::DuplicateTitle`] if the title is already present,
    /// [`StoreError::UnknownDependency`] if any listed dependency is absent.
    /// On error nothing is mutated or written.
    fn add(&mut self, task: Task) -> Result<(), StoreError>;

    /// Mark a task completed, spawning a recurring successor if applicable.
    ///
    /// The state is persisted even when successor synthesis is skipped or
    /// fails; a failed synthesis surfaces as a non-fatal
    /// [`Completion::Completed`] warning.
    ///
    /// # Errors
    /// [`StoreError::NotFound`] if no task has this title.
    fn complete(&mut self, title: &str) -> Result<Completion, StoreError>;

    /// Titles from the task's dependency list that are not yet completed.
    ///
    /// A query helper, not a validator: an unknown `title` yields an empty
    /// list. A dependency title missing from the store counts as pending,
    /// since its completion cannot be verified.
    fn pending_dependencies(&self, title: &str) -> Vec<String>;
}

/// Outcome of a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The task was open and is now completed.
    Completed {
        /// Title of the recurring successor, if one was created.
        successor: Option<String>,
        /// Why a successor could not be created, if synthesis failed.
        warning: Option<RecurrenceWarning>,
    },
    /// The task had already been completed; nothing changed.
    AlreadyCompleted,
}

/// A recurring successor could not be created. Non-fatal: the original
/// completion stands either way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecurrenceWarning {
    #[error("successor failed validation: {0}")]
    Validation(#[from] ValidationError),

    #[error("successor was rejected by the store: {0}")]
    Rejected(String),
}

/// Store operation failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("a task titled '{0}' already exists")]
    DuplicateTitle(String),

    #[error("dependency '{dependency}' of task '{title}' does not exist")]
    UnknownDependency { title: String, dependency: String },

    #[error("no task titled '{0}'")]
    NotFound(String),

    #[error("failed to access task file {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("task file {} is not a valid task document", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode task file {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Insert `task`, refusing duplicates and unresolved dependencies.
pub(crate) fn add_task(tasks: &mut TaskMap, task: Task) -> Result<(), StoreError> {
    if tasks.contains_key(task.title()) {
        return Err(StoreError::DuplicateTitle(task.title().to_string()));
    }
    if let Some(dependency) = task
        .dependencies()
        .iter()
        .find(|dependency| !tasks.contains_key(*dependency))
    {
        return Err(StoreError::UnknownDependency {
            title: task.title().to_string(),
            dependency: dependency.clone(),
        });
    }
    tasks.insert(task.title().to_string(), task);
    Ok(())
}

/// Flip a task to completed and, for recurring tasks, try to spawn its
/// successor. Synthesis failures are downgraded to a warning; the completion
/// itself succeeds.
pub(crate) fn complete_task(
    tasks: &mut TaskMap,
    title: &str,
    now: DateTime<Local>,
) -> Result<Completion, StoreError> {
    let task = tasks
        .get_mut(title)
        .ok_or_else(|| StoreError::NotFound(title.to_string()))?;
    if task.is_completed() {
        return Ok(Completion::AlreadyCompleted);
    }
    task.mark_completed();
    let completed = task.clone();

    if !completed.is_recurring() {
        return Ok(Completion::Completed {
            successor: None,
            warning: None,
        });
    }

    let outcome = match recurrence::successor(&completed, |t| tasks.contains_key(t), now) {
        Ok(next) => {
            let next_title = next.title().to_string();
            match add_task(tasks, next) {
                Ok(()) => Completion::Completed {
                    successor: Some(next_title),
                    warning: None,
                },
                Err(err) => Completion::Completed {
                    successor: None,
                    warning: Some(RecurrenceWarning::Rejected(err.to_string())),
                },
            }
        }
        Err(err) => Completion::Completed {
            successor: None,
            warning: Some(RecurrenceWarning::Validation(err)),
        },
    };

    if let Completion::Completed {
        warning: Some(warning),
        ..
    } = &outcome
    {
        tracing::warn!(
            "could not create recurring successor of '{}': {}",
            title,
            warning
        );
    }

    Ok(outcome)
}

/// Dependencies of `title` that are not completed; unknown titles yield none.
pub(crate) fn pending_dependencies(tasks: &TaskMap, title: &str) -> Vec<String> {
    let Some(task) = tasks.get(title) else {
        return Vec::new();
    };
    task.dependencies()
        .iter()
        .filter(|dependency| {
            tasks
                .get(*dependency)
                .map_or(true, |dep| !dep.is_completed())
        })
        .cloned()
        .collect()
}
