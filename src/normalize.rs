//! Row normalization across release years.
//!
//! Each release spells its columns a little differently. `normalize` runs a raw
//! row through a fixed sequence of steps so that rows from every year share one
//! shape: scalar filter, year backfill, legacy key rename, removal of columns
//! that are not comparable across years, then percentage coercion. The order is
//! load-bearing: later steps rely on the canonical `CDSCODE` casing.

use crate::error::SarcError;
use crate::record::{describe, RawRecord, RawValue, Record, Scalar};
use tracing::trace;

pub const YEAR_FIELD: &str = "SARCYear";
pub const CDS_FIELD: &str = "CDSCODE";
pub const LEGACY_CDS_FIELD: &str = "CDSCode";
pub const PERCENT_PREFIX: &str = "PER";

/// Columns removed from every row.
///
/// The per-race counts only exist in 2006-07 through 2008-09, and `TOTAL` is
/// missing from 2009-10, 2018-19 and 2019-20.
pub const UNNECESSARY_FIELDS: &[&str] = &[
    "WH", "SD", "PI", "MULTI",
    // 2008-09 ships this misspelled
    "MUULTI", "HI", "FI", "EL", "DI", "AS", "AI", "AA", "TOTAL",
];

type Step = fn(Record, &str) -> Result<Record, SarcError>;

/// Steps applied after the scalar filter, in order.
const PIPELINE: &[(&str, Step)] = &[
    ("backfill_year", backfill_year),
    ("rename_legacy_cds", rename_legacy_cds),
    ("drop_unnecessary", drop_unnecessary),
    ("coerce_percentages", coerce_percentages),
];

/// Normalize one decoded row that came from the release `assumed_year`.
pub fn normalize(row: RawRecord, assumed_year: &str) -> Result<Record, SarcError> {
    PIPELINE
        .iter()
        .try_fold(keep_scalars(row), |rec, (name, step)| {
            trace!(step = *name, fields = rec.len(), "normalize");
            step(rec, assumed_year)
        })
}

/// 1) Drop anything a decoder produced that is not a plain scalar.
fn keep_scalars(row: RawRecord) -> Record {
    row.into_iter()
        .filter_map(|(k, v)| {
            let s = match v {
                RawValue::Str(s) => Scalar::Str(s),
                RawValue::Int(i) => Scalar::Int(i),
                RawValue::Float(f) => Scalar::Float(f),
                RawValue::Bool(b) => Scalar::Bool(b),
                RawValue::Null => Scalar::Null,
                RawValue::Other(_) => return None,
            };
            Some((k, s))
        })
        .collect()
}

/// 2) Older releases carry no year column of their own.
fn backfill_year(mut rec: Record, assumed_year: &str) -> Result<Record, SarcError> {
    rec.entry(YEAR_FIELD.to_string())
        .or_insert_with(|| Scalar::from(assumed_year));
    Ok(rec)
}

/// 3) `CDSCode` → `CDSCODE`.
fn rename_legacy_cds(mut rec: Record, _: &str) -> Result<Record, SarcError> {
    if let Some(v) = rec.remove(LEGACY_CDS_FIELD) {
        rec.insert(CDS_FIELD.to_string(), v);
    }
    Ok(rec)
}

/// 4) Columns that do not line up across releases.
fn drop_unnecessary(mut rec: Record, _: &str) -> Result<Record, SarcError> {
    for field in UNNECESSARY_FIELDS {
        rec.remove(*field);
    }
    Ok(rec)
}

/// 5) Every `PER*` field becomes a float, or null when blank.
fn coerce_percentages(mut rec: Record, _: &str) -> Result<Record, SarcError> {
    let keys: Vec<String> = rec
        .keys()
        .filter(|k| k.starts_with(PERCENT_PREFIX))
        .cloned()
        .collect();

    for key in keys {
        let coerced = match &rec[&key] {
            Scalar::Null => Scalar::Null,
            Scalar::Str(s) if s.is_empty() => Scalar::Null,
            Scalar::Str(s) => match s.trim().parse::<f64>() {
                Ok(f) => Scalar::Float(f),
                Err(_) => {
                    let value = rec[&key].to_string();
                    return Err(SarcError::MalformedPercentage {
                        record: describe(&rec),
                        key,
                        value,
                    });
                }
            },
            Scalar::Int(i) => Scalar::Float(*i as f64),
            Scalar::Float(f) => Scalar::Float(*f),
            Scalar::Bool(b) => Scalar::Float(if *b { 1.0 } else { 0.0 }),
        };
        rec.insert(key, coerced);
    }
    Ok(rec)
}
