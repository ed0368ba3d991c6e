//! JSON file-based task store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;

use super::{Completion, StoreError, TaskMap, TaskStore};
use crate::task::Task;

/// Task store backed by a single JSON document mapping title -> task.
///
/// The whole map is loaded at open and rewritten after every successful
/// mutation; the file handle is held only for the duration of each read or
/// write. Writes go through a sibling temp file and a rename, so the caller
/// never observes a half-written document.
pub struct FileTaskStore {
    path: PathBuf,
    tasks: TaskMap,
}

impl FileTaskStore {
    /// Open the store at `path`, loading any existing tasks.
    ///
    /// A missing file is an empty store. An unreadable or unparseable file is
    /// an error: silently starting empty would clobber the user's tasks on
    /// the next mutation.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let tasks = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => TaskMap::new(),
            Err(source) => {
                return Err(StoreError::Io { path, source });
            }
        };
        Ok(Self { path, tasks })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), StoreError> {
        let data =
            serde_json::to_vec_pretty(&self.tasks).map_err(|source| StoreError::Encode {
                path: self.path.clone(),
                source,
            })?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl TaskStore for FileTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    fn list(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    fn get(&self, title: &str) -> Option<&Task> {
        self.tasks.get(title)
    }

    fn add(&mut self, task: Task) -> Result<(), StoreError> {
        super::add_task(&mut self.tasks, task)?;
        self.persist()
    }

    fn complete(&mut self, title: &str) -> Result<Completion, StoreError> {
        let outcome = super::complete_task(&mut self.tasks, title, Local::now())?;
        // An already-completed task was not mutated, so there is nothing to
        // write; every other outcome is persisted, successor or not.
        if outcome != Completion::AlreadyCompleted {
            self.persist()?;
        }
        Ok(outcome)
    }

    fn pending_dependencies(&self, title: &str) -> Vec<String> {
        super::pending_dependencies(&self.tasks, title)
    }
}
