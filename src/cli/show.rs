//! Show command for foodbot.
//!
//! Dumps the record table as pulled from the configured backend.

use serde::Serialize;

use crate::storage::{Records, StorageEngine};

/// Options for the show command.
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the show command.
#[derive(Debug, Clone, Serialize)]
pub struct ShowOutput {
    /// Backend the records came from.
    pub backend: String,
    /// Total number of records.
    pub count: usize,
    /// Every record, by key.
    pub records: Records,
}

impl ShowOutput {
    /// Format as human-readable text.
    pub fn format_text(&self) -> String {
        if self.records.is_empty() {
            return format!("No records in {} backend.", self.backend);
        }

        let mut lines = vec![format!(
            "Records in {} backend ({} found):",
            self.backend, self.count
        )];
        for (key, fields) in &self.records {
            lines.push(String::new());
            lines.push(key.clone());
            if fields.is_empty() {
                lines.push("  (no fields)".to_string());
            }
            for (name, value) in fields {
                let shown = if value.is_empty() { "-" } else { value.as_str() };
                lines.push(format!("  {:<16}  {}", name, shown));
            }
        }

        lines.join("\n")
    }
}

/// The show command implementation.
pub struct ShowCommand<'a, E: StorageEngine> {
    engine: &'a E,
}

impl<'a, E: StorageEngine> ShowCommand<'a, E> {
    /// Create a new show command.
    pub fn new(engine: &'a E) -> Self {
        Self { engine }
    }

    /// Run the show command.
    pub fn run(&self) -> ShowOutput {
        let records = self.engine.read_all();
        ShowOutput {
            backend: self.engine.name().to_string(),
            count: records.len(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::table::fields;
    use crate::storage::MemoryEngine;

    #[test]
    fn test_show_empty() {
        let engine = MemoryEngine::new();
        let output = ShowCommand::new(&engine).run();

        assert_eq!(output.count, 0);
        assert!(output.format_text().contains("No records"));
    }

    #[test]
    fn test_show_records() {
        let mut engine = MemoryEngine::new();
        engine.update("7", fields([("2024-01-05", "True"), ("2024-01-06", "")]));

        let output = ShowCommand::new(&engine).run();
        assert_eq!(output.count, 1);
        assert_eq!(output.backend, "memory");

        let text = output.format_text();
        assert!(text.contains("2024-01-05"));
        assert!(text.contains("True"));
    }

    #[test]
    fn test_show_json() {
        let mut engine = MemoryEngine::new();
        engine.update("7", fields([("a", "1")]));

        let output = ShowCommand::new(&engine).run();
        let json: serde_json::Value = serde_json::to_value(&output).unwrap();
        assert_eq!(json["records"]["7"]["a"], "1");
    }
}
