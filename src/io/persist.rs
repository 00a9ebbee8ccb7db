use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::io::kv_store::KvStore;
use crate::io::recovery::{RecoveryCategory, RecoveryEntry, log_recovery};
use crate::model::task::Task;
use crate::ops::store::CommitHook;
use crate::ops::task_ops::Command;

/// Load the task collection stored under `key`.
///
/// Never fails: a missing key, `null`, an unreadable store or malformed JSON
/// all give an empty collection. Malformed data and dropped duplicates are
/// copied to the recovery log when `recovery_dir` is set.
pub fn hydrate<S: KvStore>(store: &S, key: &str, recovery_dir: Option<&Path>) -> Vec<Task> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read task store, starting empty");
            if let Some(dir) = recovery_dir {
                log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Load, "task store unreadable")
                        .field("Key", key)
                        .field("Error", e.to_string()),
                );
            }
            return Vec::new();
        }
    };

    let tasks = match serde_json::from_str::<Option<Vec<Task>>>(&raw) {
        Ok(tasks) => tasks.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(error = %e, key, "stored tasks are not valid, starting empty");
            if let Some(dir) = recovery_dir {
                log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Load, "stored tasks could not be parsed")
                        .field("Key", key)
                        .field("Error", e.to_string())
                        .body(raw),
                );
            }
            return Vec::new();
        }
    };

    let (tasks, dropped) = dedup_ids(tasks);
    if !dropped.is_empty() {
        tracing::warn!(count = dropped.len(), "dropped tasks with duplicate ids");
        if let Some(dir) = recovery_dir {
            let body = serde_json::to_string_pretty(&dropped).unwrap_or_default();
            log_recovery(
                dir,
                RecoveryEntry::new(RecoveryCategory::Load, "duplicate task ids")
                    .field("Key", key)
                    .body(body),
            );
        }
    }
    tasks
}

/// Keep the first task for each ID. Returns (kept, dropped).
fn dedup_ids(tasks: Vec<Task>) -> (Vec<Task>, Vec<Task>) {
    let mut seen = HashSet::new();
    tasks.into_iter().partition(|t| seen.insert(t.id.clone()))
}

/// Commit hook that writes the whole collection to a [`KvStore`] after
/// every change.
///
/// Write failures are logged and the payload goes to the recovery log; the
/// command that triggered the write is not affected.
pub struct Persist<S: KvStore> {
    store: S,
    key: String,
    recovery_dir: Option<PathBuf>,
    failed_writes: usize,
}

impl<S: KvStore> Persist<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Persist {
            store,
            key: key.into(),
            recovery_dir: None,
            failed_writes: 0,
        }
    }

    /// Where to put payloads that could not be written
    pub fn with_recovery_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.recovery_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of writes that failed since this hook was created
    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    /// Load the collection this hook writes to.
    pub fn hydrate(&self) -> Vec<Task> {
        hydrate(&self.store, &self.key, self.recovery_dir.as_deref())
    }
}

impl<S: KvStore> CommitHook for Persist<S> {
    fn after_commit(&mut self, command: &Command, tasks: &[Task]) {
        let payload = match serde_json::to_string(tasks) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "could not serialize tasks");
                self.failed_writes += 1;
                return;
            }
        };
        if let Err(e) = self.store.set(&self.key, &payload) {
            self.failed_writes += 1;
            tracing::warn!(error = %e, command = command.kind(), "could not persist tasks");
            if let Some(ref dir) = self.recovery_dir {
                log_recovery(
                    dir,
                    RecoveryEntry::new(RecoveryCategory::Write, "could not persist tasks")
                        .field("Key", self.key.as_str())
                        .field("Command", command.kind())
                        .field("Error", e.to_string())
                        .body(payload),
                );
            }
        }
    }
}
