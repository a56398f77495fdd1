//! Migrate command for foodbot.
//!
//! Copies every record from one backend into another and pushes the target,
//! replacing whatever it held.

use serde::Serialize;

use crate::error::Result;
use crate::storage::StorageEngine;

/// Output format for the migrate command.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateOutput {
    /// Whether the target was pushed.
    pub success: bool,
    /// Source backend name.
    pub from: String,
    /// Target backend name.
    pub to: String,
    /// Number of records copied.
    pub records: usize,
    /// Error message if the command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MigrateOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        match &self.error {
            None => format!(
                "Copied {} records from {} to {}.",
                self.records, self.from, self.to
            ),
            Some(error) => format!(
                "Migration from {} to {} failed: {}",
                self.from, self.to, error
            ),
        }
    }
}

/// The migrate command implementation.
pub struct MigrateCommand<S: StorageEngine, T: StorageEngine> {
    source: S,
    target: T,
}

impl<S: StorageEngine, T: StorageEngine> MigrateCommand<S, T> {
    /// Create a new migrate command. Both engines must already be pulled.
    pub fn new(source: S, target: T) -> Self {
        Self { source, target }
    }

    /// Run the migration.
    pub fn run(&mut self) -> MigrateOutput {
        let records = self.source.table().len();
        let result = self.copy();
        MigrateOutput {
            success: result.is_ok(),
            from: self.source.name().to_string(),
            to: self.target.name().to_string(),
            records,
            error: result.err().map(|e| e.to_string()),
        }
    }

    fn copy(&mut self) -> Result<()> {
        let records = self.source.read_all();
        self.target.table_mut().replace(records);
        self.target.push()
    }

    /// The target engine.
    pub fn target(&self) -> &T {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{MemoryWorksheet, SheetEngine, Worksheet};
    use crate::storage::table::fields;
    use crate::storage::{FileEngine, MemoryEngine, Records};
    use tempfile::TempDir;

    fn source() -> MemoryEngine {
        let mut records = Records::new();
        records.insert("7".to_string(), fields([("2024-01-05", "True")]));
        records.insert("8".to_string(), fields([("eating_default", "False")]));
        MemoryEngine::with_records(records)
    }

    #[test]
    fn test_migrate_to_sheet() {
        let target = SheetEngine::open(MemoryWorksheet::new()).unwrap();
        let mut cmd = MigrateCommand::new(source(), target);

        let output = cmd.run();
        assert!(output.success);
        assert_eq!(output.records, 2);
        assert_eq!(output.to, "sheet");

        let values = cmd.target().worksheet().get_all_values().unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[0], vec!["__key__", "2024-01-05", "eating_default"]);
    }

    #[test]
    fn test_migrate_replaces_target_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table.json");

        let mut stale = FileEngine::open(&path).unwrap();
        stale.update("old", fields([("a", "1")]));
        stale.push().unwrap();

        let target = FileEngine::open(&path).unwrap();
        let mut cmd = MigrateCommand::new(source(), target);
        assert!(cmd.run().success);

        let reopened = FileEngine::open(&path).unwrap();
        assert_eq!(reopened.read("old"), None);
        assert_eq!(reopened.table().len(), 2);
    }

    #[test]
    fn test_migrate_failure_reported() {
        let mut source = MemoryEngine::new();
        source.update("1", fields([("__key__", "clash")]));
        source.push().unwrap();

        let target = SheetEngine::open(MemoryWorksheet::new()).unwrap();
        let output = MigrateCommand::new(source, target).run();
        assert!(!output.success);
        assert!(output.format_text().contains("failed"));
    }
}
