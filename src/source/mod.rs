//! Row sources: turn one release file into a sequence of raw records.
//!
//! The file format is picked from the extension. Each format lives in its own
//! submodule and yields `RawRecord`s keyed by column name; files with an
//! extension no reader claims produce no rows.

pub mod dbf;
pub mod delimited;
pub mod spreadsheet;

use crate::error::SarcError;
use crate::record::RawRecord;
use anyhow::Result;
use std::{fmt, iter, path::Path};
use tracing::{debug, warn};

/// Lazily produced rows of one file.
pub type Rows = Box<dyn Iterator<Item = Result<RawRecord>>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Comma separated text with a header row (`.txt`).
    DelimitedText,
    /// Legacy binary Excel workbook (`.xls`).
    LegacySpreadsheet,
    /// dBASE table (`.dbf`).
    DBase,
}

impl SourceFormat {
    pub fn as_str(&self) -> &str {
        match self {
            SourceFormat::DelimitedText => "txt",
            SourceFormat::LegacySpreadsheet => "xls",
            SourceFormat::DBase => "dbf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "txt" => Some(SourceFormat::DelimitedText),
            "xls" => Some(SourceFormat::LegacySpreadsheet),
            "dbf" => Some(SourceFormat::DBase),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    pub fn open(&self, path: &Path) -> Result<Rows> {
        match self {
            SourceFormat::DelimitedText => delimited::read_rows(path),
            SourceFormat::LegacySpreadsheet => spreadsheet::read_rows(path),
            SourceFormat::DBase => dbf::read_rows(path),
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read every row of `path`, dispatching on its extension.
pub fn read_rows(path: &Path) -> Result<Rows> {
    match SourceFormat::from_path(path) {
        Some(format) => {
            debug!(path = %path.display(), %format, "opening");
            format.open(path)
        }
        None => {
            warn!(path = %path.display(), "no reader for this extension; skipping");
            Ok(Box::new(iter::empty()))
        }
    }
}

pub(crate) fn source_error(path: &Path, err: impl fmt::Display) -> SarcError {
    SarcError::Source {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
