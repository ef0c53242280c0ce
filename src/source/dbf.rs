// src/source/dbf.rs

use super::{source_error, Rows};
use crate::record::{RawRecord, RawValue};
use anyhow::Result;
use dbase::{
    ErrorKind, FieldIOError, FieldIterator, FieldType, FieldValue, ReadableRecord, ReaderBuilder,
    ReadingOptions, TrimOption, UnicodeLossy,
};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, Read, Seek},
    path::{Path, PathBuf},
};
use tracing::{debug, warn};

const MEMO_EXTENSIONS: &[&str] = &["dbt", "DBT", "fpt", "FPT"];

/// Terminates the field descriptor array in the table header.
const DESCRIPTOR_END: u8 = 0x0D;

/// dBASE table. A missing memo companion is tolerated: memo columns then read
/// as null and every other column is kept.
pub fn read_rows(path: &Path) -> Result<Rows> {
    // ─── 1) open the table, with its memo file when there is one ───
    let file = File::open(path).map_err(|e| source_error(path, e))?;
    let mut builder = ReaderBuilder::<BufReader<File>, UnicodeLossy>::new(BufReader::new(file))
        .with_options(ReadingOptions::default().character_trim(TrimOption::End));
    let companion = memo_companion(path);
    if let Some(memo) = &companion {
        debug!(memo = %memo.display(), "memo file");
        let memo = File::open(memo).map_err(|e| source_error(path, e))?;
        builder = builder.with_memo(BufReader::new(memo));
    }
    let mut reader = builder.build().map_err(|e| source_error(path, e))?;

    // ─── 2) field names and declared decimals ───
    let names: Vec<String> = reader
        .fields()
        .iter()
        .map(|f| f.name().to_string())
        .collect();
    if companion.is_none() && reader.fields().iter().any(|f| f.field_type() == FieldType::Memo) {
        warn!(path = %path.display(), "memo file not found, memo columns read as null");
    }
    let decimals = decimal_counts(path)?;

    // ─── 3) records ───
    let records = reader
        .read_as::<TableRow>()
        .map_err(|e| source_error(path, e))?;

    let rows: Vec<RawRecord> = records
        .into_iter()
        .map(|TableRow(values)| {
            names
                .iter()
                .zip(values)
                .map(|(name, value)| {
                    let places = decimals.get(name).copied().unwrap_or(0);
                    let value = value.map_or(RawValue::Null, |v| field_value(v, places));
                    (name.clone(), value)
                })
                .collect()
        })
        .collect();

    Ok(Box::new(rows.into_iter().map(Ok)))
}

/// One record in field order. A memo column is `None` when the table has no
/// memo file to resolve it against.
struct TableRow(Vec<Option<FieldValue>>);

impl ReadableRecord for TableRow {
    fn read_using<Source, MemoSource>(
        fields: &mut FieldIterator<Source, MemoSource>,
    ) -> Result<Self, FieldIOError>
    where
        Source: Read + Seek,
        MemoSource: Read + Seek,
    {
        let mut values = Vec::new();
        loop {
            match fields.read_next_field() {
                Ok(field) => values.push(Some(field.value)),
                Err(e) if matches!(e.kind(), ErrorKind::EndOfRecord) => break,
                // the field bytes are consumed before the memo lookup fails
                Err(e) if matches!(e.kind(), ErrorKind::MissingMemoFile) => values.push(None),
                Err(e) => return Err(e),
            }
        }
        Ok(TableRow(values))
    }
}

fn memo_companion(path: &Path) -> Option<PathBuf> {
    MEMO_EXTENSIONS
        .iter()
        .map(|ext| path.with_extension(ext))
        .find(|p| p.is_file())
}

/// Decimal count of every field, keyed by field name. The reader keeps these
/// to itself, so they come from the raw 32-byte field descriptors.
fn decimal_counts(path: &Path) -> Result<BTreeMap<String, u8>> {
    let mut file = File::open(path).map_err(|e| source_error(path, e))?;
    let mut prefix = [0u8; 32];
    file.read_exact(&mut prefix)
        .map_err(|e| source_error(path, e))?;
    let header_len = u16::from_le_bytes([prefix[8], prefix[9]]) as usize;

    let mut descriptors = vec![0u8; header_len.saturating_sub(prefix.len())];
    file.read_exact(&mut descriptors)
        .map_err(|e| source_error(path, e))?;

    Ok(descriptors
        .chunks_exact(32)
        .take_while(|desc| desc[0] != DESCRIPTOR_END)
        .map(|desc| {
            let name = &desc[..11];
            let end = name.iter().position(|b| *b == 0).unwrap_or(name.len());
            let name = String::from_utf8_lossy(&name[..end]).trim().to_string();
            (name, desc[17])
        })
        .collect())
}

fn field_value(value: FieldValue, decimals: u8) -> RawValue {
    match value {
        FieldValue::Character(Some(s)) => RawValue::Str(s),
        FieldValue::Character(None) => RawValue::Str(String::new()),
        FieldValue::Numeric(Some(f)) => numeric_value(f, decimals),
        FieldValue::Numeric(None) => RawValue::Null,
        FieldValue::Float(Some(f)) => RawValue::Float(f as f64),
        FieldValue::Float(None) => RawValue::Null,
        FieldValue::Integer(i) => RawValue::Int(i as i64),
        FieldValue::Double(f) | FieldValue::Currency(f) => RawValue::Float(f),
        FieldValue::Logical(Some(b)) => RawValue::Bool(b),
        FieldValue::Logical(None) => RawValue::Null,
        FieldValue::Memo(s) => RawValue::Str(s),
        FieldValue::Date(_) => RawValue::Other("date"),
        FieldValue::DateTime(_) => RawValue::Other("datetime"),
        #[allow(unreachable_patterns)]
        _ => RawValue::Other("unsupported"),
    }
}

/// `N` fields declared with decimals are written with a decimal point and
/// stay floats (`20.0` is `20.0`); the rest are integers.
fn numeric_value(f: f64, decimals: u8) -> RawValue {
    if decimals == 0 && f.fract() == 0.0 && f.abs() < 9.0e15 {
        RawValue::Int(f as i64)
    } else {
        RawValue::Float(f)
    }
}

#[cfg(test)]
#[path = "../../tests/common/dbf_fixture.rs"]
mod dbf_fixture;
