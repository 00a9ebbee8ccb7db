use serde::Serialize;

use crate::model::task::Task;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based position in display order
    pub position: usize,
    pub id: String,
    pub title: String,
    pub done: bool,
}

#[derive(Serialize)]
pub struct ImportJson {
    pub candidates: Vec<String>,
    pub imported: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
}

#[derive(Serialize)]
pub struct ApplyJson {
    pub applied: usize,
    pub changed: usize,
}

/// Tasks already in display order
pub fn tasks_to_json(tasks: &[&Task]) -> Vec<TaskJson> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| TaskJson {
            position: i + 1,
            id: t.id.clone(),
            title: t.title.clone(),
            done: t.done,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `1 . [ ] T-001 Buy milk`
pub fn format_task_line(position: usize, task: &Task) -> String {
    format!(
        "{} . [{}] {} {}",
        position,
        task.checkbox_char(),
        task.id,
        task.title
    )
}

/// Tasks already in display order, one line each
pub fn format_task_list(tasks: &[&Task]) -> Vec<String> {
    tasks
        .iter()
        .enumerate()
        .map(|(i, t)| format_task_line(i + 1, t))
        .collect()
}
