//! Write-only solve history.
//!
//! The engine reports one [`HistoryRecord`] per pipeline run and never reads
//! history back. Persistence belongs to the caller.

use std::sync::Mutex;

use nm_api_models::HistoryRecord;

pub trait HistorySink: Send + Sync {
    fn record(&self, record: &HistoryRecord);
}

/// In-memory sink, mostly for tests and the REPL.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<HistoryRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl HistorySink for MemoryHistory {
    fn record(&self, record: &HistoryRecord) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(record.clone());
    }
}

impl<T: HistorySink + ?Sized> HistorySink for std::sync::Arc<T> {
    fn record(&self, record: &HistoryRecord) {
        (**self).record(record)
    }
}
