//! In-memory storage engine for testing.
//!
//! The "backend" is a snapshot of records held next to the working table.
//! `push` copies the table into the snapshot and `pull` copies it back, which
//! gives tests the full pull/push lifecycle without touching disk.

use tracing::debug;

use crate::error::Result;
use crate::storage::table::{RecordTable, Records};
use crate::storage::StorageEngine;

/// In-memory storage engine.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    /// Working table.
    table: RecordTable,
    /// Last pushed state, standing in for durable storage.
    backend: Records,
}

impl MemoryEngine {
    /// Create an engine with an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose backend already holds `records`, then pull.
    pub fn with_records(records: Records) -> Self {
        Self {
            table: RecordTable::from(records.clone()),
            backend: records,
        }
    }

    /// Current backend snapshot.
    pub fn backend(&self) -> &Records {
        &self.backend
    }
}

impl StorageEngine for MemoryEngine {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn table(&self) -> &RecordTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    fn pull(&mut self) -> Result<()> {
        self.table.replace(self.backend.clone());
        debug!(records = self.table.len(), "pulled memory backend");
        Ok(())
    }

    fn push(&mut self) -> Result<()> {
        self.backend = self.table.read_all();
        debug!(records = self.backend.len(), "pushed memory backend");
        Ok(())
    }
}
