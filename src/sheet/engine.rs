//! Spreadsheet-backed storage engine.

use tracing::debug;

use crate::error::Result;
use crate::sheet::grid::{from_grid, to_grid};
use crate::sheet::worksheet::{Cell, Worksheet};
use crate::storage::{RecordTable, StorageEngine};

/// Storage engine that keeps the table in a worksheet grid.
///
/// `push` rewrites the whole worksheet: it is resized to the exact grid
/// extent and every cell is written, so nothing from an earlier, larger
/// table lingers.
#[derive(Debug)]
pub struct SheetEngine<W: Worksheet> {
    worksheet: W,
    table: RecordTable,
}

impl<W: Worksheet> SheetEngine<W> {
    /// Create an engine over `worksheet` and pull its current content.
    pub fn open(worksheet: W) -> Result<Self> {
        let mut engine = Self {
            worksheet,
            table: RecordTable::new(),
        };
        engine.pull()?;
        Ok(engine)
    }

    /// The underlying worksheet.
    pub fn worksheet(&self) -> &W {
        &self.worksheet
    }
}

impl<W: Worksheet> StorageEngine for SheetEngine<W> {
    fn name(&self) -> &'static str {
        "sheet"
    }

    fn table(&self) -> &RecordTable {
        &self.table
    }

    fn table_mut(&mut self) -> &mut RecordTable {
        &mut self.table
    }

    fn pull(&mut self) -> Result<()> {
        let values = self.worksheet.get_all_values()?;
        let records = from_grid(&values)?;
        debug!(rows = values.len(), records = records.len(), "pulled worksheet");
        self.table.replace(records);
        Ok(())
    }

    fn push(&mut self) -> Result<()> {
        let grid = to_grid(&self.table)?;
        let rows = grid.len();
        let cols = grid[0].len();

        self.worksheet.resize(rows, cols)?;

        let cells: Vec<Cell> = grid
            .into_iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .map(move |(c, value)| Cell::new(r + 1, c + 1, value))
            })
            .collect();
        self.worksheet.update_cells(&cells)?;

        debug!(rows, cols, "pushed worksheet");
        Ok(())
    }
}
