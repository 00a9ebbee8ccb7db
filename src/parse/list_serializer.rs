use crate::model::task::Task;
use crate::ops::task_ops::display_order;

/// MIME type of the exported text resource
pub const EXPORT_MIME: &str = "text/plain;charset=utf-8";

/// Serialize tasks as a numbered list, one `<n> . <title>\n` line per task,
/// in display order (open first, done last). `number` renders the 1-based
/// position.
pub fn serialize_numbered_list_with<F>(tasks: &[Task], number: F) -> String
where
    F: Fn(usize) -> String,
{
    display_order(tasks)
        .iter()
        .enumerate()
        .map(|(i, task)| format!("{} . {}\n", number(i + 1), task.title))
        .collect()
}

/// Serialize with plain decimal numbering.
pub fn serialize_numbered_list(tasks: &[Task]) -> String {
    serialize_numbered_list_with(tasks, |n| n.to_string())
}
