use crate::ops::store::{CommitHook, TaskStore};
use crate::parse::parse_numbered_list;

/// Question asked before staged titles become tasks
pub const CONFIRM_PROMPT: &str = "Are you sure you want to import tasks from this file?";

/// Error type for import operations
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("nothing is staged for import")]
    NothingStaged,
}

/// Candidate titles parsed from an import file, awaiting confirmation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingImportBatch {
    pub titles: Vec<String>,
}

impl PendingImportBatch {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportState {
    #[default]
    Idle,
    Staged(PendingImportBatch),
}

/// Two-step import: stage parsed titles, then confirm or cancel.
///
/// Nothing touches the task store until [`ImportSession::confirm`].
#[derive(Debug, Default)]
pub struct ImportSession {
    state: ImportState,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ImportState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingImportBatch> {
        match &self.state {
            ImportState::Staged(batch) => Some(batch),
            ImportState::Idle => None,
        }
    }

    /// Parse file content and stage the result, returning the number of
    /// candidates. Replaces any batch already staged.
    pub fn stage(&mut self, text: &str) -> usize {
        let batch = PendingImportBatch {
            titles: parse_numbered_list(text),
        };
        if self.pending().is_some() {
            tracing::debug!("replacing staged import batch");
        }
        let count = batch.len();
        tracing::debug!(count, "staged import");
        self.state = ImportState::Staged(batch);
        count
    }

    /// Add every staged title to the store, in order, and return to idle.
    /// Titles are not length-checked here. Returns the new task IDs.
    pub fn confirm<H: CommitHook>(
        &mut self,
        store: &mut TaskStore<H>,
    ) -> Result<Vec<String>, ImportError> {
        let batch = match std::mem::take(&mut self.state) {
            ImportState::Staged(batch) => batch,
            ImportState::Idle => return Err(ImportError::NothingStaged),
        };
        let ids = batch
            .titles
            .into_iter()
            .map(|title| store.add(title))
            .collect();
        Ok(ids)
    }

    /// Drop the staged batch (if any) and return to idle.
    pub fn cancel(&mut self) -> Option<PendingImportBatch> {
        match std::mem::take(&mut self.state) {
            ImportState::Staged(batch) => Some(batch),
            ImportState::Idle => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use crate::ops::store::tests::Recorder;
    use crate::ops::task_ops::Command;

    fn existing_store() -> TaskStore<Recorder> {
        let tasks = vec![Task {
            id: "T-001".into(),
            title: "Existing".into(),
            done: true,
        }];
        TaskStore::with_hook(tasks, "T", Recorder::default())
    }

    #[test]
    fn test_stage_parses_titles() {
        let mut session = ImportSession::new();
        assert_eq!(session.stage("1. Clean\n\n3 . Cook\n"), 2);
        assert_eq!(session.pending().unwrap().titles, vec!["Clean", "Cook"]);
    }

    #[test]
    fn test_stage_does_not_touch_store() {
        let store = existing_store();
        let before = store.tasks().to_vec();
        let mut session = ImportSession::new();
        session.stage("1 . Buy milk\n");
        assert_eq!(store.tasks(), &before[..]);
        assert!(store.hook().commits.is_empty());
    }

    #[test]
    fn test_confirm_adds_each_title_in_order() {
        let mut store = existing_store();
        let mut session = ImportSession::new();
        session.stage("1 . Buy milk\n2 . Walk dog\n3 . ab\n");

        let ids = session.confirm(&mut store).unwrap();
        assert_eq!(ids, vec!["T-002", "T-003", "T-004"]);
        assert_eq!(*session.state(), ImportState::Idle);

        let commands: Vec<&Command> = store.hook().commits.iter().map(|(c, _)| c).collect();
        assert_eq!(
            commands,
            vec![
                &Command::Add { title: "Buy milk".into() },
                &Command::Add { title: "Walk dog".into() },
                // too short for the input gate, imported anyway
                &Command::Add { title: "ab".into() },
            ]
        );
        assert_eq!(store.tasks().len(), 4);
    }

    #[test]
    fn test_confirm_allows_duplicates_of_existing() {
        let mut store = existing_store();
        let mut session = ImportSession::new();
        session.stage("Existing\n");
        session.confirm(&mut store).unwrap();
        assert_eq!(store.tasks().len(), 2);
        assert_ne!(store.tasks()[0].id, store.tasks()[1].id);
    }

    #[test]
    fn test_cancel_leaves_store_identical() {
        let mut store = existing_store();
        let before = serde_json::to_string(store.tasks()).unwrap();

        let mut session = ImportSession::new();
        session.stage("1 . Buy milk\n");
        let dropped = session.cancel().unwrap();
        assert_eq!(dropped.titles, vec!["Buy milk"]);
        assert_eq!(*session.state(), ImportState::Idle);

        assert_eq!(serde_json::to_string(store.tasks()).unwrap(), before);
        assert!(store.hook().commits.is_empty());
        assert!(matches!(
            session.confirm(&mut store),
            Err(ImportError::NothingStaged)
        ));
    }

    #[test]
    fn test_restage_replaces_batch() {
        let mut store = existing_store();
        let mut session = ImportSession::new();
        session.stage("1 . First file\n");
        session.stage("1 . Second file\n2 . More\n");
        assert_eq!(session.pending().unwrap().len(), 2);

        session.confirm(&mut store).unwrap();
        let titles: Vec<&str> = store.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Existing", "Second file", "More"]);
    }

    #[test]
    fn test_session_reusable_after_confirm() {
        let mut store = existing_store();
        let mut session = ImportSession::new();
        session.stage("One task\n");
        session.confirm(&mut store).unwrap();
        session.stage("Another task\n");
        session.confirm(&mut store).unwrap();
        assert_eq!(store.tasks().len(), 3);
    }

    #[test]
    fn test_confirm_empty_batch_adds_nothing() {
        let mut store = existing_store();
        let mut session = ImportSession::new();
        assert_eq!(session.stage("\n\n"), 0);
        assert!(session.confirm(&mut store).unwrap().is_empty());
        assert!(store.hook().commits.is_empty());
    }
}
