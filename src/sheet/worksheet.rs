//! Worksheet transport trait.
//!
//! A worksheet is a remote rectangular grid addressed by 1-indexed row and
//! column, the way spreadsheet services address cells.

use crate::error::{FoodbotError, Result};
use crate::sheet::grid::Grid;

/// A single cell write, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub value: String,
}

impl Cell {
    pub fn new(row: usize, col: usize, value: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: value.into(),
        }
    }
}

/// Trait for grid-shaped backends.
pub trait Worksheet {
    /// Fetch every cell value, row by row. Rows may be ragged.
    fn get_all_values(&self) -> Result<Grid>;

    /// Resize the worksheet to exactly `rows` x `cols`, dropping cells outside
    /// the new extent.
    fn resize(&mut self, rows: usize, cols: usize) -> Result<()>;

    /// Write cells by address. Addresses must lie within the current extent.
    fn update_cells(&mut self, cells: &[Cell]) -> Result<()>;
}

/// In-process worksheet used by tests and dry runs.
///
/// Addresses are checked against the current extent, so an off-by-one in
/// the caller shows up as an error instead of a shifted grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryWorksheet {
    cells: Grid,
    cols: usize,
}

impl MemoryWorksheet {
    /// Create an empty 0 x 0 worksheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a worksheet holding `values`, padded to a rectangle.
    pub fn from_values(mut cells: Grid) -> Self {
        let cols = cells.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut cells {
            row.resize(cols, String::new());
        }
        Self { cells, cols }
    }

    /// Current `(rows, cols)` extent.
    pub fn size(&self) -> (usize, usize) {
        (self.cells.len(), self.cols)
    }

    /// Value at a 1-indexed address, if inside the extent.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if row == 0 || col == 0 {
            return None;
        }
        self.cells
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .map(String::as_str)
    }
}

impl Worksheet for MemoryWorksheet {
    fn get_all_values(&self) -> Result<Grid> {
        Ok(self.cells.clone())
    }

    fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        self.cells.resize_with(rows, Vec::new);
        for row in &mut self.cells {
            row.resize(cols, String::new());
        }
        self.cols = cols;
        Ok(())
    }

    fn update_cells(&mut self, cells: &[Cell]) -> Result<()> {
        let (rows, cols) = self.size();
        if let Some(bad) = cells
            .iter()
            .find(|c| c.row == 0 || c.col == 0 || c.row > rows || c.col > cols)
        {
            return Err(FoodbotError::backend(format!(
                "cell ({}, {}) outside worksheet of {} x {}",
                bad.row, bad.col, rows, cols
            )));
        }

        for cell in cells {
            self.cells[cell.row - 1][cell.col - 1] = cell.value.clone();
        }
        Ok(())
    }
}
