//! Record storage for foodbot.
//!
//! This module provides the in-memory record table, the engine trait that
//! synchronizes it with a backend, and the file and in-memory engines. The
//! spreadsheet engine lives in [`crate::sheet`].

pub mod file;
pub mod memory;
pub mod table;
pub mod traits;

pub use file::FileEngine;
pub use memory::MemoryEngine;
pub use table::{Fields, RecordTable, Records};
pub use traits::StorageEngine;

use tracing::info;

use crate::config::{BackendKind, StorageConfig};
use crate::error::{FoodbotError, Result};
use crate::sheet::{GoogleWorksheet, SheetEngine};

/// Open the engine for `kind` as described by `config`, pulling its content.
pub fn open_engine(kind: BackendKind, config: &StorageConfig) -> Result<Box<dyn StorageEngine>> {
    match kind {
        BackendKind::File => {
            let path = config.file.resolved_path()?;
            info!(path = %path.display(), "opening file backend");
            Ok(Box::new(FileEngine::open(path)?))
        }
        BackendKind::Sheet => {
            let sheet = &config.sheet;
            if sheet.spreadsheet_id.is_empty() {
                return Err(FoodbotError::config(
                    "storage.sheet.spreadsheet_id is not set",
                ));
            }
            let worksheet =
                GoogleWorksheet::new(&sheet.spreadsheet_id, &sheet.worksheet, sheet.token()?);
            info!(
                spreadsheet = %sheet.spreadsheet_id,
                worksheet = %sheet.worksheet,
                "opening sheet backend"
            );
            Ok(Box::new(SheetEngine::open(worksheet)?))
        }
    }
}

/// Open the configured backend.
pub fn open_configured(config: &StorageConfig) -> Result<Box<dyn StorageEngine>> {
    open_engine(config.backend, config)
}
