//! JSONL file-backed conversation store.
//!
//! One file per conversation (`<dir>/<id>.jsonl`). Each line is one appended
//! batch with a `timestamp` and its `messages`, so a batch is written with a
//! single `write_all` and is either wholly present or wholly absent. A line
//! without its trailing newline is the remains of an interrupted write: it
//! is ignored on load and cut off before the next append.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use taskpilot_application::{ConversationStore, StoreError};
use taskpilot_domain::{ConversationId, Message};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct BatchRecord {
    timestamp: String,
    messages: Vec<Message>,
}

pub struct JsonlConversationStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlConversationStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a conversation. Ids are restricted to `[A-Za-z0-9_-]`,
    /// so they are safe to use as file names.
    pub fn path_for(&self, id: &ConversationId) -> PathBuf {
        self.dir.join(format!("{}.jsonl", id.as_str()))
    }
}

/// Length of the prefix made of complete lines
fn complete_prefix_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1)
}

#[async_trait]
impl ConversationStore for JsonlConversationStore {
    async fn load(&self, id: &ConversationId) -> Result<Vec<Message>, StoreError> {
        let path = self.path_for(id);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let prefix = complete_prefix_len(&bytes);
        let complete = std::str::from_utf8(&bytes[..prefix]).map_err(|e| StoreError::Corrupt {
            id: id.to_string(),
            reason: e.to_string(),
        })?;
        if prefix < bytes.len() {
            warn!(
                conversation_id = %id,
                "Ignoring incomplete trailing record in {}",
                path.display()
            );
        }

        let mut messages = Vec::new();
        for (index, line) in complete.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: BatchRecord =
                serde_json::from_str(line).map_err(|e| StoreError::Corrupt {
                    id: id.to_string(),
                    reason: format!("line {}: {}", index + 1, e),
                })?;
            messages.extend(record.messages);
        }

        debug!(conversation_id = %id, messages = messages.len(), "Loaded conversation");
        Ok(messages)
    }

    async fn append(&self, id: &ConversationId, messages: &[Message]) -> Result<(), StoreError> {
        if messages.is_empty() {
            return Ok(());
        }

        let record = BatchRecord {
            timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            messages: messages.to_vec(),
        };
        let mut line = serde_json::to_string(&record)
            .map_err(|e| StoreError::Other(format!("Failed to serialize batch: {}", e)))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let path = self.path_for(id);

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .await?;

        let len = file.metadata().await?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                let keep = complete_prefix_len(&tokio::fs::read(&path).await?) as u64;
                warn!(
                    conversation_id = %id,
                    dropped_bytes = len - keep,
                    "Truncating incomplete trailing record in {}",
                    path.display()
                );
                file.set_len(keep).await?;
            }
        }

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        file.sync_data().await?;

        debug!(conversation_id = %id, messages = messages.len(), "Appended batch");
        Ok(())
    }
}
