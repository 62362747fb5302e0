use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- twig recovery log: task data that could not be loaded or saved.
     Entries are appended, never rewritten. Safe to delete once reviewed. -->

---
";

/// Category of a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// Stored payload could not be decoded and was treated as empty
    Corrupt,
    /// A save failed; the body holds the payload that was not written
    Write,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Corrupt => write!(f, "corrupt"),
            RecoveryCategory::Write => write!(f, "write"),
        }
    }
}

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

impl RecoveryEntry {
    pub fn now(category: RecoveryCategory, description: impl Into<String>) -> Self {
        RecoveryEntry {
            timestamp: Utc::now(),
            category,
            description: description.into(),
            fields: Vec::new(),
            body: String::new(),
        }
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Format this entry as a markdown block for the recovery log.
    fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );

        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }

        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }

        out.push_str("\n---\n");
        out
    }
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Append a recovery entry to the log. Failures are logged and swallowed.
pub fn log_recovery(data_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = log_recovery_inner(data_dir, &entry) {
        tracing::warn!(error = %e, "could not write to recovery log");
    }
}

fn log_recovery_inner(data_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(data_dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data.json");
        atomic_write(&path, b"[1]").unwrap();
        atomic_write(&path, b"[2]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[2]");
    }

    #[test]
    fn test_entry_formatting() {
        let entry = RecoveryEntry::now(RecoveryCategory::Corrupt, "unreadable task list")
            .field("Key", "todo-app-data")
            .body("{not json");
        let md = entry.to_markdown();
        assert!(md.starts_with("## "));
        assert!(md.contains("corrupt: unreadable task list"));
        assert!(md.contains("Key: todo-app-data\n"));
        assert!(md.contains("```text\n{not json\n```\n"));
        assert!(md.ends_with("---\n"));
    }

    #[test]
    fn test_header_written_once() {
        let tmp = TempDir::new().unwrap();
        log_recovery(
            tmp.path(),
            RecoveryEntry::now(RecoveryCategory::Write, "first"),
        );
        log_recovery(
            tmp.path(),
            RecoveryEntry::now(RecoveryCategory::Write, "second"),
        );
        let content = std::fs::read_to_string(recovery_log_path(tmp.path())).unwrap();
        assert_eq!(content.matches("twig recovery log").count(), 1);
        assert!(content.contains("write: first"));
        assert!(content.contains("write: second"));
    }

    #[test]
    fn test_empty_body_has_no_code_block() {
        let md = RecoveryEntry::now(RecoveryCategory::Write, "x").to_markdown();
        assert!(!md.contains("```"));
    }
}
