// src/record.rs

use serde::Serialize;
use std::{collections::BTreeMap, fmt};

/// A single cell value as handed over by one of the format decoders.
///
/// Decoders map their native cell types onto these variants. Anything that is
/// not a plain scalar (dates, cell errors, blobs) arrives as `Other` with a
/// short label so the normalizer can drop it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Other(&'static str),
}

/// A value that survives normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// One decoded row: field name → raw value.
pub type RawRecord = BTreeMap<String, RawValue>;

/// One normalized row: field name → scalar.
pub type Record = BTreeMap<String, Scalar>;

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{:?}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{:?}", x),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Str(s.to_string())
    }
}

/// Compact JSON rendering of a record, used in diagnostics.
pub fn describe(record: &Record) -> String {
    serde_json::to_string(record).unwrap_or_else(|_| format!("{:?}", record))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_serializes_untagged() {
        let mut rec = Record::new();
        rec.insert("A".into(), Scalar::from("x"));
        rec.insert("B".into(), Scalar::Int(400));
        rec.insert("C".into(), Scalar::Float(12.5));
        rec.insert("D".into(), Scalar::Null);
        rec.insert("E".into(), Scalar::Bool(true));
        assert_eq!(
            describe(&rec),
            r#"{"A":"x","B":400,"C":12.5,"D":null,"E":true}"#
        );
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(Scalar::from("N/A").to_string(), "\"N/A\"");
        assert_eq!(Scalar::Float(3.0).to_string(), "3.0");
        assert_eq!(Scalar::Null.to_string(), "null");
    }
}
