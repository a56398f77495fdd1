//! Conversion between record tables and flat header-addressed grids.
//!
//! Row 0 of a grid is the header: the reserved key column followed by every
//! field name in lexicographic order. Each later row is one record. Empty
//! cells mean "no value", so empty-string fields do not survive a round trip.

use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::error::{FoodbotError, Result};
use crate::storage::{Fields, RecordTable, Records};

/// Name of the column carrying each record's table key.
pub const KEY_FIELD: &str = "__key__";

/// A rectangular grid of cell values, header row first.
pub type Grid = Vec<Vec<String>>;

/// Header row for `table`: the key column, then the sorted field union.
///
/// Fails if a record uses the reserved key column name or an empty name as
/// a field, since neither column could be read back.
pub fn header(table: &RecordTable) -> Result<Vec<String>> {
    let names = table.field_names();
    if names.iter().any(|n| n == KEY_FIELD) {
        return Err(FoodbotError::grid(format!(
            "field name '{}' is reserved for the key column",
            KEY_FIELD
        )));
    }
    if names.iter().any(|n| n.is_empty()) {
        return Err(FoodbotError::grid("field names must not be empty"));
    }

    let mut row = Vec::with_capacity(names.len() + 1);
    row.push(KEY_FIELD.to_string());
    row.extend(names);
    Ok(row)
}

/// Build the full rectangular grid for `table`.
///
/// Every row has exactly as many cells as the header; fields a record does
/// not own are blank. An empty key is rejected: its row would read back as
/// a keyless row.
pub fn to_grid(table: &RecordTable) -> Result<Grid> {
    if table.contains("") {
        return Err(FoodbotError::grid("record keys must not be empty"));
    }
    let header = header(table)?;
    let columns: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let mut grid = Vec::with_capacity(table.len() + 1);
    for (key, fields) in table.iter() {
        let mut row = vec![String::new(); header.len()];
        row[0] = key.to_string();
        for (name, value) in fields {
            row[columns[name.as_str()]] = value.clone();
        }
        grid.push(row);
    }
    grid.insert(0, header);

    Ok(grid)
}

/// Rebuild records from grid values as returned by a worksheet.
///
/// Rows may be ragged (remote sheets trim trailing blanks); missing cells
/// read as empty. Blank rows are skipped. Empty cells are dropped from the
/// resulting records.
pub fn from_grid(values: &[Vec<String>]) -> Result<Records> {
    let mut records = Records::new();

    let Some((header, rows)) = values.split_first() else {
        return Ok(records);
    };

    let data_rows: Vec<(usize, &Vec<String>)> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| !is_blank(row))
        .collect();

    if is_blank(header) {
        if data_rows.is_empty() {
            return Ok(records);
        }
        return Err(FoodbotError::grid("header row is blank but data rows exist"));
    }

    let mut seen = BTreeSet::new();
    for name in header.iter().filter(|n| !n.is_empty()) {
        if !seen.insert(name.as_str()) {
            return Err(FoodbotError::grid(format!(
                "duplicate header column '{}'",
                name
            )));
        }
    }

    let key_col = header
        .iter()
        .position(|n| n == KEY_FIELD)
        .ok_or_else(|| FoodbotError::grid(format!("header has no '{}' column", KEY_FIELD)))?;

    let skipped = rows.len() - data_rows.len();
    if skipped > 0 {
        warn!(skipped, "skipping blank worksheet rows");
    }

    for (index, row) in data_rows {
        let cell = |col: usize| row.get(col).map(String::as_str).unwrap_or("");

        let key = cell(key_col);
        if key.is_empty() {
            // Row 1 is the header, data starts at row 2
            return Err(FoodbotError::grid(format!(
                "row {} has values but no key",
                index + 2
            )));
        }

        let fields: Fields = header
            .iter()
            .enumerate()
            .filter(|(col, name)| *col != key_col && !name.is_empty())
            .filter_map(|(col, name)| {
                let value = cell(col);
                (!value.is_empty()).then(|| (name.clone(), value.to_string()))
            })
            .collect();

        let overflow = row
            .iter()
            .skip(header.len())
            .filter(|c| !c.is_empty())
            .count();
        if overflow > 0 {
            warn!(
                row = index + 2,
                key,
                cells = overflow,
                "ignoring worksheet cells beyond the header"
            );
        }

        records.insert(key.to_string(), fields);
    }

    Ok(records)
}

fn is_blank(row: &[String]) -> bool {
    row.iter().all(|c| c.is_empty())
}
