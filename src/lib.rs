//! Foodbot - eating preferences over a pluggable record store
//!
//! Foodbot tracks, per person and per date, whether that person is eating.
//! Records live in an in-memory table that is pulled from and pushed to a
//! backend: a local JSON file or a spreadsheet worksheet.

pub mod cli;
pub mod config;
pub mod eating;
pub mod error;
pub mod people;
pub mod sheet;
pub mod storage;

pub use config::{BackendKind, Config};
pub use eating::{decode_flag, encode_flag, EatingBook, DATE_FORMAT, DEFAULT_FIELD};
pub use error::{FoodbotError, Result};
pub use people::{Person, PersonDirectory, PersonResolver};
pub use sheet::{GoogleWorksheet, MemoryWorksheet, SheetEngine, Worksheet, KEY_FIELD};
pub use storage::{
    open_configured, open_engine, FileEngine, Fields, MemoryEngine, RecordTable, Records,
    StorageEngine,
};

// CLI commands
pub use cli::{EatingsCommand, MarkCommand, MigrateCommand, ShowCommand};
