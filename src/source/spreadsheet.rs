// src/source/spreadsheet.rs

use super::{source_error, Rows};
use crate::record::{RawRecord, RawValue};
use anyhow::Result;
use calamine::{open_workbook, Data, Reader, Xls};
use std::{iter, path::Path};
use tracing::{info, warn};

/// First sheet of a legacy `.xls` workbook. Row 0 is the header; every later
/// row is zipped against it.
///
/// The range handed back by calamine begins at the first non-empty cell, so on
/// a sheet with leading blank rows or columns the header is the first row that
/// holds anything.
pub fn read_rows(path: &Path) -> Result<Rows> {
    let mut workbook: Xls<_> = open_workbook(path).map_err(|e| source_error(path, e))?;
    let name = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| source_error(path, "workbook has no sheets"))?
        .map_err(|e| source_error(path, e))?;

    let (nrows, ncols) = range.get_size();
    info!(sheet = %name, nrows, ncols, "sheet 0");
    if let Some((row, col)) = range.start().filter(|start| *start != (0, 0)) {
        warn!(sheet = %name, row, col, "sheet does not start at A1, header read from first non-empty row");
    }

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells.iter().map(header_text).collect(),
        None => return Ok(Box::new(iter::empty())),
    };

    let records: Vec<RawRecord> = rows
        .map(|cells| {
            header
                .iter()
                .cloned()
                .zip(cells.iter().map(cell_value))
                .collect()
        })
        .collect();

    Ok(Box::new(records.into_iter().map(Ok)))
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Numbers are always floats and blank cells are empty strings, so a blank
/// percentage cell normalizes to null like a blank text field does.
fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty => RawValue::Str(String::new()),
        Data::String(s) => RawValue::Str(s.clone()),
        Data::Float(f) => RawValue::Float(*f),
        Data::Int(i) => RawValue::Float(*i as f64),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => RawValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Str(s.clone()),
        Data::Error(_) => RawValue::Other("cell error"),
    }
}
