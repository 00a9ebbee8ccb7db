use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// The serialized form (`{"id", "title", "done"}`) is the persisted
/// representation; field names must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within the owning collection
    pub id: String,
    /// Task title text, stored exactly as submitted
    pub title: String,
    /// Completion flag
    #[serde(default)]
    pub done: bool,
}

impl Task {
    /// Create a new, not-yet-done task
    pub fn new(id: String, title: String) -> Self {
        Task {
            id,
            title,
            done: false,
        }
    }

    /// The checkbox marker used in list output
    pub fn checkbox_char(&self) -> char {
        if self.done { 'x' } else { ' ' }
    }
}
