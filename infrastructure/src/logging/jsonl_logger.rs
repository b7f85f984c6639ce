//! JSONL transcript writer.
//!
//! Every [`ConversationEvent`] becomes one line: a header of `seq`, `type`
//! and `timestamp` merged over the event's object payload. Scalar and array
//! payloads sit under `data`.

use mrce_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::warn;

/// Build the transcript line for one event. Header fields win over payload
/// keys of the same name.
fn transcript_record(seq: u64, event: ConversationEvent, timestamp: String) -> Value {
    let mut record = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => Map::from_iter([("data".to_string(), other)]),
    };
    record.insert("seq".to_string(), Value::from(seq));
    record.insert("type".to_string(), Value::from(event.event_type));
    record.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(record)
}

/// Transcript logger that appends one JSON object per line.
///
/// Each line is flushed as soon as it is written, so a crashed session
/// still leaves every completed exchange on disk.
pub struct JsonlTranscriptLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    next_seq: AtomicU64,
    write_failed: AtomicBool,
}

impl JsonlTranscriptLogger {
    /// Open (or create) the transcript at `path` in append mode.
    ///
    /// Returns `None` if the file cannot be opened; the session then runs
    /// without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            next_seq: AtomicU64::new(1),
            write_failed: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, record: &Value) -> std::io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| std::io::Error::other("transcript writer poisoned"))?;
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl ConversationLogger for JsonlTranscriptLogger {
    fn log(&self, event: ConversationEvent) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = transcript_record(seq, event, timestamp);

        // Warn once; a broken transcript never interrupts the session.
        if let Err(e) = self.append(&record)
            && !self.write_failed.swap(true, Ordering::Relaxed)
        {
            warn!("Transcript {} is no longer written: {}", self.path.display(), e);
        }
    }
}
