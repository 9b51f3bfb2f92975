//! Durable scan log: line-delimited JSON file alongside the in-memory log.
//!
//! Each accepted event is serialized to one JSON line and flushed before
//! the append is acknowledged. The in-memory log serves the newest-first
//! queries; the file is the durable history operators archive.

use crate::memory::InMemoryScanLog;
use cs_01_chip_verify::ports::outbound::{AuditError, ScanEventSink};
use shared_types::{ChipId, NewScanEvent, ScanEvent};
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::info;

/// Scan log backed by an append-only JSONL file.
pub struct JsonlScanLog {
    memory: InMemoryScanLog,
    file: Mutex<File>,
}

impl JsonlScanLog {
    /// Open (creating if needed) the log file in append mode.
    ///
    /// # Errors
    /// * `AuditError::Unavailable` - the file could not be opened
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| AuditError::Unavailable(format!("{}: {e}", path.display())))?;
        info!(path = %path.display(), "scan log file opened");
        Ok(Self {
            memory: InMemoryScanLog::new(),
            file: Mutex::new(file),
        })
    }

    async fn append_line(&self, event: &ScanEvent) -> Result<(), AuditError> {
        let mut line = serde_json::to_string(event)
            .map_err(|e| AuditError::Append(format!("serialize: {e}")))?;
        line.push('\n');

        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| AuditError::Append(format!("write: {e}")))?;
        file.flush()
            .await
            .map_err(|e| AuditError::Append(format!("flush: {e}")))
    }
}

#[async_trait::async_trait]
impl ScanEventSink for JsonlScanLog {
    async fn record_scan(&self, event: NewScanEvent) -> Result<ScanEvent, AuditError> {
        let recorded = self.memory.record_scan(event).await?;
        self.append_line(&recorded).await?;
        Ok(recorded)
    }

    async fn recent_scans(
        &self,
        chip_id: ChipId,
        limit: usize,
    ) -> Result<Vec<ScanEvent>, AuditError> {
        self.memory.recent_scans(chip_id, limit).await
    }
}
