use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::io::recovery::{RecoveryCategory, RecoveryEntry, atomic_write, log_recovery};
use crate::model::task::Task;

/// Error type for saving the task list
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize task list: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Durable home of the serialized task list.
///
/// `load` never fails: a missing, empty, non-array or otherwise corrupt
/// payload yields an empty list.
pub trait StorageAdapter {
    fn load(&self) -> Vec<Task>;
    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Serialize a task list to its stored JSON form.
pub fn encode_tasks(tasks: &[Task]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(tasks)
}

/// Decode a stored payload. Returns `None` when the bytes are not a JSON
/// array of task records. A decoded tree is brought back within one level of
/// nesting and unique ids (see [`normalize_tree`]).
pub fn decode_tasks(bytes: &[u8]) -> Option<Vec<Task>> {
    let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value).ok().map(normalize_tree)
}

/// Repair a tree read from storage.
///
/// Subtasks nested below a subtask are lifted into the same group right after
/// their owner, in order. A record whose id was already seen earlier in the
/// tree is dropped; for a top-level record its subtasks go with it.
pub fn normalize_tree(tasks: Vec<Task>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let mut dropped = 0usize;
    let mut lifted = 0usize;
    let mut out = Vec::with_capacity(tasks.len());

    for mut task in tasks {
        if !seen.insert(task.id.clone()) {
            dropped += task.weight();
            continue;
        }
        if let Some(subs) = task.subtasks.take() {
            let mut group = Vec::with_capacity(subs.len());
            for sub in subs {
                flatten_into(sub, &mut group, &mut seen, &mut dropped, &mut lifted);
            }
            task.subtasks = Some(group);
        }
        out.push(task);
    }

    if dropped > 0 || lifted > 0 {
        tracing::warn!(dropped, lifted, "repaired stored task list");
    }
    out
}

fn flatten_into(
    mut task: Task,
    group: &mut Vec<Task>,
    seen: &mut HashSet<String>,
    dropped: &mut usize,
    lifted: &mut usize,
) {
    let nested = task.subtasks.take();
    if seen.insert(task.id.clone()) {
        group.push(task);
    } else {
        *dropped += 1;
    }
    for child in nested.into_iter().flatten() {
        *lifted += 1;
        flatten_into(child, group, seen, dropped, lifted);
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Key-value store rooted at a directory: key `k` lives in `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    key: String,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        FileStorage {
            dir: dir.into(),
            key: key.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding this store's key
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}

impl StorageAdapter for FileStorage {
    fn load(&self) -> Vec<Task> {
        let path = self.path();
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "could not read task list");
                return Vec::new();
            }
        };
        if is_blank(&bytes) {
            return Vec::new();
        }
        match decode_tasks(&bytes) {
            Some(tasks) => tasks,
            None => {
                tracing::warn!(path = %path.display(), "stored task list is corrupt, starting empty");
                log_recovery(
                    &self.dir,
                    RecoveryEntry::now(RecoveryCategory::Corrupt, "unreadable task list")
                        .field("Key", self.key.clone())
                        .body(String::from_utf8_lossy(&bytes)),
                );
                Vec::new()
            }
        }
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let path = self.path();
        let content = encode_tasks(tasks)?;
        if let Err(e) = atomic_write(&path, &content) {
            log_recovery(
                &self.dir,
                RecoveryEntry::now(RecoveryCategory::Write, "task list write failed")
                    .field("Key", self.key.clone())
                    .field("Error", e.to_string())
                    .body(String::from_utf8_lossy(&content)),
            );
            return Err(StorageError::WriteError { path, source: e });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Raw byte map standing in for a key-value store.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    key: String,
    entries: HashMap<String, Vec<u8>>,
    save_count: usize,
}

impl MemoryStorage {
    pub fn new(key: impl Into<String>) -> Self {
        MemoryStorage {
            key: key.into(),
            entries: HashMap::new(),
            save_count: 0,
        }
    }

    /// Seed the store with raw bytes under its key
    pub fn with_raw(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.insert(self.key.clone(), bytes.into());
        self
    }

    pub fn raw(&self) -> Option<&[u8]> {
        self.entries.get(&self.key).map(Vec::as_slice)
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        MemoryStorage::new(crate::model::config::DEFAULT_STORAGE_KEY)
    }
}

impl StorageAdapter for MemoryStorage {
    fn load(&self) -> Vec<Task> {
        match self.raw() {
            Some(bytes) if !is_blank(bytes) => decode_tasks(bytes).unwrap_or_else(|| {
                tracing::warn!(key = %self.key, "stored task list is corrupt, starting empty");
                Vec::new()
            }),
            _ => Vec::new(),
        }
    }

    fn save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let content = encode_tasks(tasks)?;
        self.entries.insert(self.key.clone(), content);
        self.save_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::recovery::recovery_log_path;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_tree() -> Vec<Task> {
        let mut a = Task::top_level("id-a".into(), "Buy milk".into());
        let mut a1 = Task::subtask("id-a1".into(), "Check fridge".into());
        a1.completed = true;
        a.subtasks = Some(vec![a1, Task::subtask("id-a2".into(), "Go".into())]);
        let mut b = Task::top_level("id-b".into(), "Call mom".into());
        b.completed = true;
        vec![a, b]
    }

    #[test]
    fn file_round_trip_preserves_tree() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(tmp.path(), "todo-app-data");
        let tree = sample_tree();
        storage.save(&tree).unwrap();
        assert!(tmp.path().join("todo-app-data.json").exists());
        assert_eq!(storage.load(), tree);
    }

    #[test]
    fn memory_round_trip_preserves_tree() {
        let mut storage = MemoryStorage::default();
        let tree = sample_tree();
        storage.save(&tree).unwrap();
        assert_eq!(storage.load(), tree);
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn persisted_format_field_names() {
        let bytes = encode_tasks(&sample_tree()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], "id-a");
        assert_eq!(first["text"], "Buy milk");
        assert_eq!(first["completed"], false);
        assert!(first["subtasks"].is_array());
        assert!(first["subtasks"][0].get("subtasks").is_none());
    }

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = FileStorage::new(tmp.path(), "nothing-here");
        assert!(storage.load().is_empty());
        assert!(!recovery_log_path(tmp.path()).exists());
    }

    #[test]
    fn corrupt_file_loads_empty_and_is_preserved() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("todo-app-data.json"), "{{ not json").unwrap();
        let storage = FileStorage::new(tmp.path(), "todo-app-data");
        assert!(storage.load().is_empty());

        let log = fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert!(log.contains("{{ not json"));
    }

    #[test]
    fn non_array_payloads_load_empty() {
        for payload in [r#"{"id":"a"}"#, "42", "null", r#""text""#] {
            let storage = MemoryStorage::default().with_raw(payload);
            assert!(storage.load().is_empty(), "payload {payload} should load empty");
        }
    }

    #[test]
    fn malformed_records_load_empty() {
        let storage = MemoryStorage::default().with_raw(r#"[{"text":"no id"}]"#);
        assert!(storage.load().is_empty());
    }

    #[test]
    fn nested_subtasks_are_lifted_on_load() {
        let payload = r#"[{"id":"A","text":"A","completed":false,"subtasks":[
            {"id":"A1","text":"A1","completed":false,"subtasks":[
                {"id":"G","text":"G","completed":true,"subtasks":[
                    {"id":"GG","text":"GG","completed":false}]}]},
            {"id":"A2","text":"A2","completed":false}]}]"#;
        let tasks = MemoryStorage::default().with_raw(payload).load();

        assert_eq!(tasks.len(), 1);
        let ids: Vec<&str> = tasks[0].subtasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["A1", "G", "GG", "A2"]);
        assert!(tasks[0].subtasks().iter().all(|t| t.subtasks.is_none()));
        assert!(tasks[0].subtasks()[1].completed);
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let payload = r#"[
            {"id":"A","text":"first","completed":false,"subtasks":[{"id":"A1","text":"A1"}]},
            {"id":"A","text":"dup","completed":false,"subtasks":[{"id":"X","text":"X"}]},
            {"id":"B","text":"B","completed":false,"subtasks":[{"id":"A1","text":"again"},{"id":"B1","text":"B1"}]}
        ]"#;
        let tasks = MemoryStorage::default().with_raw(payload).load();

        let top: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(top, ["first", "B"]);
        let b_subs: Vec<&str> = tasks[1].subtasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(b_subs, ["B1"]);
    }

    #[test]
    fn well_formed_tree_is_untouched_by_normalize() {
        let tree = sample_tree();
        assert_eq!(normalize_tree(tree.clone()), tree);
    }

    #[test]
    fn blank_payload_loads_empty() {
        let storage = MemoryStorage::default().with_raw("  \n");
        assert!(storage.load().is_empty());
    }

    #[test]
    fn save_into_missing_dir_reports_error() {
        let tmp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(tmp.path().join("gone"), "todo-app-data");
        let err = storage.save(&sample_tree()).unwrap_err();
        assert!(matches!(err, StorageError::WriteError { .. }));
    }
}
