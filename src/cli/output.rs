use serde::Serialize;

use crate::model::filter::FilterMode;
use crate::ops::projection::{Counts, Entry};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct EntryJson {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub is_subtask: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Serialize)]
pub struct ListJson {
    pub filter: FilterMode,
    pub counts: Counts,
    pub entries: Vec<EntryJson>,
}

#[derive(Serialize)]
pub struct CreatedJson {
    /// `None` when the input was rejected
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Serialize)]
pub struct ChangedJson {
    pub changed: bool,
}

#[derive(Serialize)]
pub struct FilterJson {
    pub filter: FilterMode,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn entry_to_json(entry: &Entry<'_>) -> EntryJson {
    EntryJson {
        id: entry.task.id.clone(),
        text: entry.task.text.clone(),
        completed: entry.task.completed,
        is_subtask: entry.is_subtask,
        parent_id: entry.parent.map(|p| p.id.clone()),
    }
}

pub fn list_to_json(entries: &[Entry<'_>], counts: Counts, filter: FilterMode) -> ListJson {
    ListJson {
        filter,
        counts,
        entries: entries.iter().map(entry_to_json).collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

pub fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

/// One row: checkbox, text and id, subtasks indented
pub fn format_entry_line(entry: &Entry<'_>) -> String {
    let indent = if entry.is_subtask { "  " } else { "" };
    format!(
        "{}{} {}  ({})",
        indent,
        checkbox(entry.task.completed),
        entry.task.text,
        entry.task.id
    )
}

/// Summary line printed under a listing
pub fn format_footer(counts: Counts, filter: FilterMode) -> String {
    let noun = if counts.total == 1 { "task" } else { "tasks" };
    format!(
        "{} {}, {} active, {} completed (filter: {})",
        counts.total, noun, counts.active, counts.completed, filter
    )
}
