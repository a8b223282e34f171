//! Append-only JSONL history file.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};

use nm_api_models::HistoryRecord;
use nm_engine::HistorySink;

pub struct JsonlHistory {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonlHistory {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening history file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }
}

impl HistorySink for JsonlHistory {
    fn record(&self, record: &HistoryRecord) {
        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(target: "pipeline", error = %e, "history record not serializable");
                return;
            }
        };
        let mut file = match self.file.lock() {
            Ok(file) => file,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(file, "{line}") {
            tracing::warn!(
                target: "pipeline",
                path = %self.path.display(),
                error = %e,
                "history write failed"
            );
        }
    }
}
