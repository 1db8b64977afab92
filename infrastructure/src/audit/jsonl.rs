//! JSONL file writer for audit events.
//!
//! Each [`AuditEvent`] is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use atrium_application::ports::audit_logger::{AuditEvent, AuditLogger};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL audit logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlAuditLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!("Could not create audit log directory {}: {}", parent.display(), e);
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create audit log file {}: {}", path.display(), e);
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

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, event: AuditEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert(
                "type".to_string(),
                serde_json::Value::String(event.event_type),
            );
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp),
            );
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "data": event.payload,
            })
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Flush each record; the audit trail is append-only
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlAuditLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_writes_valid_jsonl_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlAuditLogger::new(&path).unwrap();

        logger.log(AuditEvent::new(
            "agent_decision",
            serde_json::json!({"agent_id": "security_agent", "room_id": 3}),
        ));
        logger.log(AuditEvent::new(
            "execution_finished",
            serde_json::json!({"plan_id": "safety_first_101010", "status": "completed"}),
        ));

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();

        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "agent_decision");
        assert_eq!(first["agent_id"], "security_agent");
        assert!(first["timestamp"].is_string());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["type"], "execution_finished");
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlAuditLogger::new(&path).unwrap();

        logger.log(AuditEvent::new("note", serde_json::json!("plain string")));

        let mut content = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        let record: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(record["data"], "plain string");
    }
}
