//! File-based storage engine for foodbot.
//!
//! The whole table is stored as a single JSON document of the form
//! `{"key": {"field": "value"}}`. Pushes are written via temp file + rename.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FoodbotError, Result};
use crate::storage::table::{RecordTable, Records};
use crate::storage::StorageEngine;

/// File-backed storage engine.
#[derive(Debug, Clone)]
pub struct FileEngine {
    /// Path of the JSON document.
    path: PathBuf,
    /// Working table.
    table: RecordTable,
}

impl FileEngine {
    /// Create an engine for `path` and pull its current content.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut engine = Self {
            path: path.into(),
            table: RecordTable::new(),
        };
        engine.pull()?;
        Ok(engine)
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the path for a temp file used during atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "table.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", name))
    }

    /// Read and parse the backing document, if there is one.
    fn load(&self) -> Result<Records> {
        if !self.path.exists() {
            return Ok(Records::new());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| FoodbotError::storage(&self.path, e))?;
        let records: Records = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Write the table atomically using temp file + rename.
    fn atomic_write(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| FoodbotError::storage(parent, e))?;
            }
        }

        let temp_path = self.temp_path();
        let json = serde_json::to_string_pretty(&self.table.read_all())?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| FoodbotError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| FoodbotError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| FoodbotError::storage(&temp_path, e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| FoodbotError::storage(&self.path, e))?;

        Ok(())
    }
}

impl StorageEngine for FileEngine {
    fn name(&self) -> &'static str {
        "file"
    }

    fn table(&self) -> &RecordTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    fn pull(&mut self) -> Result<()> {
        let records = self.load()?;
        debug!(path = %self.path.display(), records = records.len(), "pulled file backend");
        self.table.replace(records);
        Ok(())
    }

    fn push(&mut self) -> Result<()> {
        self.atomic_write()?;
        debug!(path = %self.path.display(), records = self.table.len(), "pushed file backend");
        Ok(())
    }
}
