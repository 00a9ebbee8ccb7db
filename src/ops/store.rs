use crate::model::task::Task;
use crate::ops::task_ops::{self, Command};

/// Called by [`TaskStore`] after a command has changed the collection.
///
/// Not called for commands that leave the collection as it was (lookup
/// misses, unknown commands). Implementations must not fail the command;
/// errors are theirs to report.
pub trait CommitHook {
    fn after_commit(&mut self, command: &Command, tasks: &[Task]);
}

/// No-op hook for stores that don't persist anywhere.
impl CommitHook for () {
    fn after_commit(&mut self, _command: &Command, _tasks: &[Task]) {}
}

/// Owner of the task collection. All changes go through [`TaskStore::dispatch`].
pub struct TaskStore<H: CommitHook = ()> {
    tasks: Vec<Task>,
    id_prefix: String,
    hook: H,
}

impl TaskStore<()> {
    /// A store with no commit hook
    pub fn new(tasks: Vec<Task>, id_prefix: impl Into<String>) -> Self {
        TaskStore::with_hook(tasks, id_prefix, ())
    }
}

impl<H: CommitHook> TaskStore<H> {
    pub fn with_hook(tasks: Vec<Task>, id_prefix: impl Into<String>, hook: H) -> Self {
        TaskStore {
            tasks,
            id_prefix: id_prefix.into(),
            hook,
        }
    }

    /// The collection in storage (insertion) order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The collection in display order: open first, done last
    pub fn display(&self) -> Vec<&Task> {
        task_ops::display_order(&self.tasks)
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn into_hook(self) -> H {
        self.hook
    }

    /// Apply a command. Returns whether the collection changed; the commit
    /// hook runs only when it did.
    pub fn dispatch(&mut self, command: Command) -> bool {
        let next = task_ops::apply(&self.tasks, &command, &self.id_prefix);
        if next == self.tasks {
            tracing::debug!(command = command.kind(), "command left the task list unchanged");
            return false;
        }
        self.tasks = next;
        tracing::debug!(command = command.kind(), count = self.tasks.len(), "committed");
        self.hook.after_commit(&command, &self.tasks);
        true
    }

    /// Add a task and return its ID.
    pub fn add(&mut self, title: impl Into<String>) -> String {
        self.dispatch(Command::Add {
            title: title.into(),
        });
        // add always appends, so the new task is last
        self.tasks
            .last()
            .map(|t| t.id.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Records every commit, for asserting on the command stream.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub commits: Vec<(Command, Vec<Task>)>,
    }

    impl CommitHook for Recorder {
        fn after_commit(&mut self, command: &Command, tasks: &[Task]) {
            self.commits.push((command.clone(), tasks.to_vec()));
        }
    }

    fn recording_store() -> TaskStore<Recorder> {
        TaskStore::with_hook(Vec::new(), "T", Recorder::default())
    }

    #[test]
    fn test_add_returns_new_id() {
        let mut store = TaskStore::new(Vec::new(), "T");
        assert_eq!(store.add("Buy milk"), "T-001");
        assert_eq!(store.add("Walk dog"), "T-002");
        assert_eq!(store.tasks().len(), 2);
        assert!(store.tasks().iter().all(|t| !t.done));
    }

    #[test]
    fn test_commit_hook_sees_each_change() {
        let mut store = recording_store();
        let id = store.add("Buy milk");
        store.dispatch(Command::Toggle { id: id.clone() });

        let commits = &store.hook().commits;
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].0.kind(), "add");
        assert_eq!(commits[1].0, Command::Toggle { id });
        assert!(commits[1].1[0].done);
    }

    #[test]
    fn test_noop_commands_skip_hook() {
        let mut store = recording_store();
        store.add("Buy milk");
        assert!(!store.dispatch(Command::Delete { id: "T-404".into() }));
        assert!(!store.dispatch(Command::Unknown("archive".into())));
        assert_eq!(store.hook().commits.len(), 1);
    }

    #[test]
    fn test_display_projection() {
        let mut store = TaskStore::new(Vec::new(), "T");
        let a = store.add("Task A");
        let b = store.add("Task B");
        let c = store.add("Task C");
        store.dispatch(Command::Toggle { id: b.clone() });

        let ids: Vec<&str> = store.display().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec![a.as_str(), c.as_str(), b.as_str()]);
        // storage order is untouched
        assert_eq!(store.tasks()[1].id, b);
    }
}
