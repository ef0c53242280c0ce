use std::path::PathBuf;
use thiserror::Error;

/// Fatal input errors. Every one of these ends the run.
#[derive(Error, Debug)]
pub enum SarcError {
    #[error("unknown school `{school}`; add it to the alias table in SchoolDirectory (known: {known})")]
    UnknownSchool { school: String, known: String },

    #[error("malformed percentage in record {record}: key {key}, value {value}")]
    MalformedPercentage {
        record: String,
        key: String,
        value: String,
    },

    #[error("failed to read {}: {message}", path.display())]
    Source { path: PathBuf, message: String },
}
