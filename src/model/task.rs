use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A task in the tree. Top-level tasks own a `subtasks` collection;
/// subtasks never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque identifier, unique across the whole tree
    pub id: String,
    /// Trimmed, non-empty label
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    /// Present on top-level tasks, absent on subtasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Task>>,
}

impl Task {
    /// Create a top-level task with an empty subtask collection.
    pub fn top_level(id: String, text: String) -> Self {
        Task {
            id,
            text,
            completed: false,
            subtasks: Some(Vec::new()),
        }
    }

    /// Create a subtask (no subtask collection of its own).
    pub fn subtask(id: String, text: String) -> Self {
        Task {
            id,
            text,
            completed: false,
            subtasks: None,
        }
    }

    /// Subtasks in display order (empty for subtasks and bare records)
    pub fn subtasks(&self) -> &[Task] {
        self.subtasks.as_deref().unwrap_or(&[])
    }

    /// Number of tasks this record accounts for, itself included
    pub fn weight(&self) -> usize {
        1 + self.subtasks().len()
    }
}

/// Identity of a task as addressed by the UI: `(id, is_sub, parent_id)`.
///
/// A subtask is found by id inside its parent's subtask list; everything
/// else is found by id in the top-level list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRef {
    pub id: String,
    pub is_sub: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl TaskRef {
    pub fn top_level(id: impl Into<String>) -> Self {
        TaskRef {
            id: id.into(),
            is_sub: false,
            parent_id: None,
        }
    }

    pub fn subtask(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        TaskRef {
            id: id.into(),
            is_sub: true,
            parent_id: Some(parent_id.into()),
        }
    }

    /// The parent to search in, or `None` for a top-level lookup.
    /// A subtask ref without a parent falls back to the top level.
    pub fn parent(&self) -> Option<&str> {
        if self.is_sub {
            self.parent_id.as_deref()
        } else {
            None
        }
    }

    /// True when both refs name the same row (same id at the same level)
    pub fn same_row(&self, other: &TaskRef) -> bool {
        self.id == other.id && self.is_sub == other.is_sub
    }
}

/// Generate a fresh task id of the form `id-<millis>-<7 chars>`.
pub fn generate_id() -> String {
    let nonce = Uuid::new_v4().simple().to_string();
    format!("id-{}-{}", Utc::now().timestamp_millis(), &nonce[..7])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtask_records_omit_subtasks_field() {
        let sub = Task::subtask("id-1".into(), "Sub".into());
        let json = serde_json::to_string(&sub).unwrap();
        assert!(!json.contains("subtasks"));

        let top = Task::top_level("id-2".into(), "Top".into());
        let json = serde_json::to_string(&top).unwrap();
        assert!(json.contains("\"subtasks\":[]"));
    }

    #[test]
    fn missing_completed_defaults_to_false() {
        let task: Task = serde_json::from_str(r#"{"id":"a","text":"A"}"#).unwrap();
        assert!(!task.completed);
        assert!(task.subtasks.is_none());
        assert_eq!(task.weight(), 1);
    }

    #[test]
    fn generated_ids_have_expected_shape() {
        let a = generate_id();
        let b = generate_id();
        assert!(a.starts_with("id-"));
        assert_eq!(a.rsplit('-').next().unwrap().len(), 7);
        assert_ne!(a, b);
    }

    #[test]
    fn subtask_ref_without_parent_looks_up_top_level() {
        let r = TaskRef {
            id: "x".into(),
            is_sub: true,
            parent_id: None,
        };
        assert_eq!(r.parent(), None);
        assert_eq!(TaskRef::subtask("x", "p").parent(), Some("p"));
        assert_eq!(TaskRef::top_level("x").parent(), None);
    }

    #[test]
    fn same_row_compares_id_and_level() {
        let a = TaskRef::top_level("x");
        assert!(a.same_row(&TaskRef::top_level("x")));
        assert!(!a.same_row(&TaskRef::subtask("x", "p")));
        assert!(!a.same_row(&TaskRef::top_level("y")));
    }
}
