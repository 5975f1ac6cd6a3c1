//! JSONL file writer for chat exchange records.
//!
//! Each [`ChatRecord`] is serialized as a single JSON line with the user,
//! both sides of the exchange, and a UTC timestamp, appended via a
//! buffered writer.

use parley_application::ports::chat_log::{ChatLog, ChatRecord};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL chat log that writes one JSON object per exchange.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on every record and
/// on `Drop`; persistence failures are swallowed so the conversation flow
/// never depends on the log.
pub struct JsonlChatLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlChatLog {
    /// Create a log appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("could not create chat log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("could not open chat log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChatLog for JsonlChatLog {
    fn save(&self, record: ChatRecord) {
        let line = serde_json::json!({
            "user_id": record.user_id,
            "message": record.message,
            "response": record.response,
            "timestamp": record
                .timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        });

        let Ok(line) = serde_json::to_string(&line) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlChatLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_one_json_line_each() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chats.jsonl");

        let log = JsonlChatLog::new(&path).unwrap();
        log.save(ChatRecord::new("u1", "hello", "hi there"));
        log.save(ChatRecord::new("u2", "next", "reply"));
        drop(log);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["user_id"], "u1");
        assert_eq!(first["message"], "hello");
        assert_eq!(first["response"], "hi there");
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn appends_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chats.jsonl");

        JsonlChatLog::new(&path)
            .unwrap()
            .save(ChatRecord::new("u1", "first", "r1"));
        JsonlChatLog::new(&path)
            .unwrap()
            .save(ChatRecord::new("u1", "second", "r2"));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn parent_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("chats.jsonl");
        assert!(JsonlChatLog::new(&path).is_some());
        assert!(path.exists());
    }
}
