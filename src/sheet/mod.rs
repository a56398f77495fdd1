//! Spreadsheet backend for foodbot.
//!
//! The record table is stored as a flat worksheet: a header row holding the
//! reserved key column and every field name, then one row per record.

pub mod engine;
pub mod google;
pub mod grid;
pub mod worksheet;

pub use engine::SheetEngine;
pub use google::GoogleWorksheet;
pub use grid::KEY_FIELD;
pub use worksheet::{Cell, MemoryWorksheet, Worksheet};
