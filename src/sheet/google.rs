//! Google Sheets worksheet over the v4 REST API.
//!
//! Authentication is handled elsewhere: the worksheet is given a ready OAuth
//! bearer token. All calls are blocking.

use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::{FoodbotError, Result};
use crate::sheet::grid::Grid;
use crate::sheet::worksheet::{Cell, Worksheet};

/// Default endpoint of the Sheets API.
pub const SHEETS_API: &str = "https://sheets.googleapis.com/v4/";

/// One worksheet (tab) of a Google spreadsheet.
#[derive(Debug, Clone)]
pub struct GoogleWorksheet {
    client: Client,
    base_url: String,
    spreadsheet_id: String,
    title: String,
    token: String,
    /// Numeric sheet id, looked up on first resize.
    sheet_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRangeBody {
    range: String,
    major_dimension: &'static str,
    values: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    sheet_id: i64,
    title: String,
}

impl GoogleWorksheet {
    /// Create a worksheet handle for tab `title` of `spreadsheet_id`.
    pub fn new(
        spreadsheet_id: impl Into<String>,
        title: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: SHEETS_API.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            title: title.into(),
            token: token.into(),
            sheet_id: None,
        }
    }

    /// Point the handle at a different API endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build an API URL from path segments below the base URL.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| FoodbotError::config(format!("invalid sheets API url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| FoodbotError::config("sheets API url cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(FoodbotError::backend(format!(
            "sheets API returned {}: {}",
            status, body
        )))
    }

    /// Numeric id of this tab, required by structural updates.
    fn sheet_id(&mut self) -> Result<i64> {
        if let Some(id) = self.sheet_id {
            return Ok(id);
        }

        let url = self.url(&["spreadsheets", self.spreadsheet_id.as_str()])?;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("fields", "sheets.properties")])
            .send()?;
        let meta: SpreadsheetMeta = Self::check(response)?.json()?;

        let id = meta
            .sheets
            .into_iter()
            .find(|s| s.properties.title == self.title)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| {
                FoodbotError::backend(format!("worksheet '{}' not found", self.title))
            })?;
        self.sheet_id = Some(id);
        Ok(id)
    }
}

impl Worksheet for GoogleWorksheet {
    fn get_all_values(&self) -> Result<Grid> {
        let range = quote_title(&self.title);
        let url = self.url(&[
            "spreadsheets",
            self.spreadsheet_id.as_str(),
            "values",
            range.as_str(),
        ])?;
        let response = self.client.get(url).bearer_auth(&self.token).send()?;
        let body: ValueRange = Self::check(response)?.json()?;
        debug!(worksheet = %self.title, rows = body.values.len(), "fetched worksheet values");
        Ok(body.values)
    }

    fn resize(&mut self, rows: usize, cols: usize) -> Result<()> {
        let sheet_id = self.sheet_id()?;
        let batch = format!("{}:batchUpdate", self.spreadsheet_id);
        let url = self.url(&["spreadsheets", batch.as_str()])?;
        let body = json!({
            "requests": [{
                "updateSheetProperties": {
                    "properties": {
                        "sheetId": sheet_id,
                        "gridProperties": { "rowCount": rows, "columnCount": cols }
                    },
                    "fields": "gridProperties(rowCount,columnCount)"
                }
            }]
        });
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        Self::check(response)?;
        debug!(worksheet = %self.title, rows, cols, "resized worksheet");
        Ok(())
    }

    fn update_cells(&mut self, cells: &[Cell]) -> Result<()> {
        let Some((range, values)) = block(&self.title, cells)? else {
            return Ok(());
        };

        let url = self.url(&[
            "spreadsheets",
            self.spreadsheet_id.as_str(),
            "values",
            range.as_str(),
        ])?;
        let body = ValueRangeBody {
            range,
            major_dimension: "ROWS",
            values,
        };
        let response = self
            .client
            .put(url)
            .bearer_auth(&self.token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()?;
        Self::check(response)?;
        Ok(())
    }
}

/// Quote a tab title for use in an A1 range.
pub fn quote_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Letter name of a 1-indexed column: 1 -> A, 26 -> Z, 27 -> AA.
pub fn column_name(mut col: usize) -> String {
    let mut name = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        name.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Pack cells into the A1 range of their bounding box and a row-major value
/// block. Positions inside the box that no cell names are `None`, which the
/// API leaves untouched.
fn block(title: &str, cells: &[Cell]) -> Result<Option<(String, Vec<Vec<Option<String>>>)>> {
    if cells.is_empty() {
        return Ok(None);
    }
    if let Some(bad) = cells.iter().find(|c| c.row == 0 || c.col == 0) {
        return Err(FoodbotError::backend(format!(
            "cell address ({}, {}) is not 1-indexed",
            bad.row, bad.col
        )));
    }

    let top = cells.iter().map(|c| c.row).min().unwrap_or(1);
    let bottom = cells.iter().map(|c| c.row).max().unwrap_or(1);
    let left = cells.iter().map(|c| c.col).min().unwrap_or(1);
    let right = cells.iter().map(|c| c.col).max().unwrap_or(1);

    let mut values = vec![vec![None; right - left + 1]; bottom - top + 1];
    for cell in cells {
        values[cell.row - top][cell.col - left] = Some(cell.value.clone());
    }

    let range = format!(
        "{}!{}{}:{}{}",
        quote_title(title),
        column_name(left),
        top,
        column_name(right),
        bottom
    );
    Ok(Some((range, values)))
}
