// src/output.rs

use crate::merge::YearSeries;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::io::Write;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Two-space indented JSON.
    #[default]
    Json,
    Yaml,
}

/// Write `series` to `out` followed by a newline.
pub fn render<W: Write>(series: &YearSeries, format: OutputFormat, mut out: W) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, series).context("serializing JSON")?;
            out.write_all(b"\n")?;
        }
        OutputFormat::Yaml => {
            serde_yaml::to_writer(&mut out, series).context("serializing YAML")?;
        }
    }
    out.flush()?;
    Ok(())
}
