use serde::Deserialize;

use crate::model::task::Task;

/// Error type for decoding commands from their JSON form
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid command JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("command '{kind}' is missing its payload")]
    MissingPayload { kind: String },
}

/// A command for the task list. Every mutation goes through one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String },
    Toggle { id: String },
    Delete { id: String },
    Edit { id: String, title: String },
    /// A command type this version does not know about. Applying it is a no-op.
    Unknown(String),
}

#[derive(Deserialize)]
struct RawCommand {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct TitlePayload {
    title: String,
}

#[derive(Deserialize)]
struct IdPayload {
    id: String,
}

#[derive(Deserialize)]
struct EditPayload {
    id: String,
    title: String,
}

impl Command {
    /// Decode a `{"type": ..., "payload": {...}}` object.
    ///
    /// Unknown types decode to `Command::Unknown` regardless of payload;
    /// known types with a missing or malformed payload are errors.
    pub fn from_json(text: &str) -> Result<Command, CommandError> {
        let raw: RawCommand = serde_json::from_str(text)?;
        let payload = |kind: &str| {
            raw.payload.clone().ok_or_else(|| CommandError::MissingPayload {
                kind: kind.to_string(),
            })
        };

        let command = match raw.kind.as_str() {
            "add" => {
                let p: TitlePayload = serde_json::from_value(payload("add")?)?;
                Command::Add { title: p.title }
            }
            "toggle" => {
                let p: IdPayload = serde_json::from_value(payload("toggle")?)?;
                Command::Toggle { id: p.id }
            }
            "delete" => {
                let p: IdPayload = serde_json::from_value(payload("delete")?)?;
                Command::Delete { id: p.id }
            }
            "edit" => {
                let p: EditPayload = serde_json::from_value(payload("edit")?)?;
                Command::Edit {
                    id: p.id,
                    title: p.title,
                }
            }
            other => Command::Unknown(other.to_string()),
        };
        Ok(command)
    }

    /// Short name used in logs
    pub fn kind(&self) -> &str {
        match self {
            Command::Add { .. } => "add",
            Command::Toggle { .. } => "toggle",
            Command::Delete { .. } => "delete",
            Command::Edit { .. } => "edit",
            Command::Unknown(kind) => kind,
        }
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Apply a command to a collection, producing the next collection.
///
/// Pure: the result depends only on `tasks`, `command` and `prefix`.
/// Lookup misses and unknown commands return an unchanged copy.
pub fn apply(tasks: &[Task], command: &Command, prefix: &str) -> Vec<Task> {
    match command {
        Command::Add { title } => {
            let mut next = tasks.to_vec();
            next.push(Task::new(next_id(tasks, prefix), title.clone()));
            next
        }
        Command::Toggle { id } => tasks
            .iter()
            .map(|t| {
                if t.id == *id {
                    Task {
                        done: !t.done,
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect(),
        Command::Delete { id } => tasks.iter().filter(|t| t.id != *id).cloned().collect(),
        Command::Edit { id, title } => tasks
            .iter()
            .map(|t| {
                if t.id == *id {
                    Task {
                        title: title.clone(),
                        ..t.clone()
                    }
                } else {
                    t.clone()
                }
            })
            .collect(),
        Command::Unknown(_) => tasks.to_vec(),
    }
}

/// Find a task by ID
pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Display projection
// ---------------------------------------------------------------------------

/// Open tasks first, then done tasks. Insertion order is kept within
/// each group (`sort_by_key` is stable).
pub fn display_order(tasks: &[Task]) -> Vec<&Task> {
    let mut view: Vec<&Task> = tasks.iter().collect();
    view.sort_by_key(|t| t.done);
    view
}

// ---------------------------------------------------------------------------
// ID allocation
// ---------------------------------------------------------------------------

/// Next ID for the collection: `<prefix>-<max + 1>`, zero-padded to 3.
///
/// If the highest stored number is `usize::MAX`, falls back to the lowest
/// number whose ID is not taken.
pub fn next_id(tasks: &[Task], prefix: &str) -> String {
    let prefix_dash = format!("{}-", prefix);
    match find_max_id(tasks, &prefix_dash).checked_add(1) {
        Some(n) => format!("{}-{:03}", prefix, n),
        None => first_free_id(tasks, prefix),
    }
}

fn first_free_id(tasks: &[Task], prefix: &str) -> String {
    (1..=tasks.len() + 1)
        .map(|n| format!("{}-{:03}", prefix, n))
        .find(|id| find_task(tasks, id).is_none())
        .unwrap_or_default()
}

/// Highest ID number among tasks whose ID starts with `prefix_dash`.
/// IDs that don't follow the scheme (e.g. older timestamp IDs) are ignored.
pub fn find_max_id(tasks: &[Task], prefix_dash: &str) -> usize {
    tasks
        .iter()
        .filter_map(|t| t.id.strip_prefix(prefix_dash))
        .filter_map(|num| num.parse::<usize>().ok())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, done: bool) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            done,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("T-001", "Buy milk", false),
            task("T-002", "Walk dog", true),
            task("T-003", "Cook dinner", false),
        ]
    }

    fn add(title: &str) -> Command {
        Command::Add {
            title: title.into(),
        }
    }

    // --- add ---

    #[test]
    fn test_add_appends_open_task() {
        let tasks = sample();
        let next = apply(&tasks, &add("Water plants"), "T");
        assert_eq!(next.len(), tasks.len() + 1);
        let added = next.last().unwrap();
        assert_eq!(added.title, "Water plants");
        assert_eq!(added.id, "T-004");
        assert!(!added.done);
        assert_eq!(&next[..3], &tasks[..]);
    }

    #[test]
    fn test_add_does_not_validate() {
        let next = apply(&[], &add(""), "T");
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].title, "");
    }

    #[test]
    fn test_add_identical_titles_get_distinct_ids() {
        let once = apply(&[], &add("Same"), "T");
        let twice = apply(&once, &add("Same"), "T");
        assert_eq!(twice.len(), 2);
        assert_ne!(twice[0].id, twice[1].id);
    }

    // --- toggle ---

    #[test]
    fn test_toggle_flips_only_target() {
        let tasks = sample();
        let next = apply(&tasks, &Command::Toggle { id: "T-001".into() }, "T");
        assert!(next[0].done);
        assert_eq!(next[1], tasks[1]);
        assert_eq!(next[2], tasks[2]);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let tasks = sample();
        let cmd = Command::Toggle { id: "T-002".into() };
        let once = apply(&tasks, &cmd, "T");
        assert!(!once[1].done);
        let twice = apply(&once, &cmd, "T");
        assert_eq!(twice, tasks);
    }

    #[test]
    fn test_toggle_missing_id_is_noop() {
        let tasks = sample();
        let next = apply(&tasks, &Command::Toggle { id: "T-999".into() }, "T");
        assert_eq!(next, tasks);
    }

    // --- delete ---

    #[test]
    fn test_delete_removes_target() {
        let tasks = sample();
        let next = apply(&tasks, &Command::Delete { id: "T-002".into() }, "T");
        assert_eq!(next.len(), 2);
        assert!(find_task(&next, "T-002").is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let cmd = Command::Delete { id: "T-001".into() };
        let once = apply(&sample(), &cmd, "T");
        let twice = apply(&once, &cmd, "T");
        assert_eq!(once, twice);
    }

    // --- edit ---

    #[test]
    fn test_edit_replaces_title_only() {
        let tasks = sample();
        let next = apply(
            &tasks,
            &Command::Edit {
                id: "T-002".into(),
                title: "Walk the dog".into(),
            },
            "T",
        );
        assert_eq!(next[1].title, "Walk the dog");
        assert_eq!(next[1].id, "T-002");
        assert!(next[1].done);
    }

    #[test]
    fn test_edit_missing_id_is_noop() {
        let tasks = sample();
        let next = apply(
            &tasks,
            &Command::Edit {
                id: "nope".into(),
                title: "Whatever".into(),
            },
            "T",
        );
        assert_eq!(next, tasks);
    }

    #[test]
    fn test_unknown_command_is_noop() {
        let tasks = sample();
        let next = apply(&tasks, &Command::Unknown("archive".into()), "T");
        assert_eq!(next, tasks);
    }

    // --- projection ---

    #[test]
    fn test_display_order_is_stable_done_last() {
        let tasks = vec![
            task("A", "Task A", false),
            task("B", "Task B", true),
            task("C", "Task C", false),
        ];
        let ids: Vec<&str> = display_order(&tasks).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_display_order_does_not_touch_storage_order() {
        let tasks = sample();
        let _ = display_order(&tasks);
        assert_eq!(tasks[1].id, "T-002");
    }

    // --- ids ---

    #[test]
    fn test_next_id_continues_from_max() {
        let tasks = vec![task("T-007", "x", false), task("T-003", "y", false)];
        assert_eq!(next_id(&tasks, "T"), "T-008");
    }

    #[test]
    fn test_next_id_ignores_foreign_ids() {
        let tasks = vec![
            task("1697040000000-Buy milk", "Buy milk", false),
            task("X-050", "other prefix", false),
        ];
        assert_eq!(next_id(&tasks, "T"), "T-001");
    }

    #[test]
    fn test_next_id_at_usize_max_takes_free_number() {
        let max_id = format!("T-{}", usize::MAX);
        let tasks = vec![
            task(&max_id, "Huge", false),
            task("T-001", "Buy milk", false),
            task("T-003", "Cook", false),
        ];
        assert_eq!(next_id(&tasks, "T"), "T-002");

        let next = apply(&tasks, &add("Walk dog"), "T");
        assert_eq!(next.len(), 4);
        assert_eq!(next[3].id, "T-002");
    }

    // --- decoding ---

    #[test]
    fn test_command_from_json() {
        assert_eq!(
            Command::from_json(r#"{"type":"add","payload":{"title":"Clean"}}"#).unwrap(),
            add("Clean")
        );
        assert_eq!(
            Command::from_json(r#"{"type":"edit","payload":{"id":"T-001","title":"Cook"}}"#)
                .unwrap(),
            Command::Edit {
                id: "T-001".into(),
                title: "Cook".into()
            }
        );
    }

    #[test]
    fn test_command_from_json_unknown_type() {
        let cmd = Command::from_json(r#"{"type":"archive","payload":{"x":1}}"#).unwrap();
        assert_eq!(cmd, Command::Unknown("archive".into()));
        assert_eq!(cmd.kind(), "archive");
    }

    #[test]
    fn test_command_from_json_missing_payload() {
        let err = Command::from_json(r#"{"type":"toggle"}"#).unwrap_err();
        assert!(matches!(err, CommandError::MissingPayload { .. }));
    }

    #[test]
    fn test_command_from_json_malformed() {
        assert!(Command::from_json("not json").is_err());
        assert!(Command::from_json(r#"{"type":"delete","payload":{"title":"x"}}"#).is_err());
    }
}
