//! Storage engine trait for foodbot.
//!
//! An engine owns a [`RecordTable`] and synchronizes it with one backend.
//! Table operations are purely in-memory; `pull` and `push` are the only
//! calls that touch the backend.

use crate::error::Result;
use crate::storage::table::{Fields, RecordTable, Records};

/// Trait for record store backends.
///
/// `pull` and `push` block until the backend call finishes, so any follow-up
/// work simply runs after they return.
pub trait StorageEngine {
    /// Backend name for logging and CLI output.
    fn name(&self) -> &'static str;

    /// The in-memory table.
    fn table(&self) -> &RecordTable;

    /// Mutable access to the in-memory table.
    fn table_mut(&mut self) -> &mut RecordTable;

    /// Replace the whole in-memory table with the backend's content.
    ///
    /// A backend with no persisted data yields an empty table. On failure the
    /// in-memory table is left as it was.
    fn pull(&mut self) -> Result<()>;

    /// Write the whole in-memory table to the backend, replacing whatever
    /// the backend held before.
    fn push(&mut self) -> Result<()>;

    /// Copy of the record for `key`.
    fn read(&self, key: &str) -> Option<Fields> {
        self.table().read(key)
    }

    /// Copy of every record.
    fn read_all(&self) -> Records {
        self.table().read_all()
    }

    /// Replace the record for `key`.
    fn write(&mut self, key: &str, fields: Fields) {
        self.table_mut().write(key, fields);
    }

    /// Merge `fields` into the record for `key`, creating it if needed.
    fn update(&mut self, key: &str, fields: Fields) {
        self.table_mut().update(key, fields);
    }

    /// Remove the record for `key`; fails if the key is unknown.
    fn delete(&mut self, key: &str) -> Result<Fields> {
        self.table_mut().delete(key)
    }
}

/// Blanket implementation for boxed trait objects.
///
/// This allows an engine chosen from config at runtime to be used wherever
/// a `StorageEngine` is expected.
impl StorageEngine for Box<dyn StorageEngine> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn table(&self) -> &RecordTable {
        (**self).table()
    }

    fn table_mut(&mut self) -> &mut RecordTable {
        (**self).table_mut()
    }

    fn pull(&mut self) -> Result<()> {
        (**self).pull()
    }

    fn push(&mut self) -> Result<()> {
        (**self).push()
    }
}

/// Test utilities for StorageEngine implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::storage::table::fields;

    /// Exercise the pull/mutate/push lifecycle shared by every engine.
    ///
    /// The engine must start out pointing at an empty backend.
    pub fn test_engine_lifecycle<E: StorageEngine>(engine: &mut E) {
        // Empty backend pulls to an empty table
        engine.pull().unwrap();
        assert!(engine.read_all().is_empty());

        // Mutations stay in memory until pushed
        engine.write("1", fields([("eating_default", "True")]));
        engine.update("2", fields([("2024-01-05", "False")]));
        engine.update("2", fields([("2024-01-06", "True")]));
        assert_eq!(engine.table().len(), 2);

        engine.pull().unwrap();
        assert!(engine.read_all().is_empty(), "pull must discard unpushed state");

        // Push then pull reproduces the table
        engine.write("1", fields([("eating_default", "True")]));
        engine.update("2", fields([("2024-01-05", "False")]));
        engine.update("2", fields([("2024-01-06", "True")]));
        let before = engine.read_all();
        engine.push().unwrap();
        engine.pull().unwrap();
        assert_eq!(engine.read_all(), before);

        // Push replaces backend content wholesale
        engine.delete("1").unwrap();
        engine.push().unwrap();
        engine.pull().unwrap();
        assert_eq!(engine.read("1"), None);
        assert_eq!(
            engine.read("2"),
            Some(fields([("2024-01-05", "False"), ("2024-01-06", "True")]))
        );

        // Deleting an unknown key is an error
        assert!(engine.delete("1").is_err());
    }
}
