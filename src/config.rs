// src/config.rs

use crate::output::OutputFormat;
use clap::Parser;
use std::{env, path::PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "sarctransform",
    about = "Merge SARC enrollment-by-subgroup releases for one school into a year-indexed record"
)]
pub struct Cli {
    /// School alias (lowell, lincoln, washington) or a numeric CDS code.
    /// Defaults to the first alias.
    #[arg(long, env = "SARC_SCHOOL")]
    pub school: Option<String>,

    /// Directory the release files live under. Defaults to the directory of
    /// the executable.
    #[arg(long, env = "SARC_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

impl Cli {
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

fn default_data_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
