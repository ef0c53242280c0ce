// src/source/delimited.rs

use super::{source_error, Rows};
use crate::record::{RawRecord, RawValue};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::{fs::File, path::Path};

/// Comma separated text, first row = field names.
///
/// Short rows get null for the missing trailing fields; cells past the last
/// header have no name and are dropped.
pub fn read_rows(path: &Path) -> Result<Rows> {
    let file = File::open(path).map_err(|e| source_error(path, e))?;
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = rdr
        .headers()
        .map_err(|e| source_error(path, e))?
        .clone();

    let path = path.to_path_buf();
    Ok(Box::new(rdr.into_records().map(move |res| {
        let record = res.with_context(|| format!("parsing CSV record in {}", path.display()))?;
        Ok(zip_row(&headers, &record))
    })))
}

fn zip_row(headers: &StringRecord, record: &StringRecord) -> RawRecord {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = record.get(i).map(RawValue::from).unwrap_or(RawValue::Null);
            (name.to_string(), value)
        })
        .collect()
}
