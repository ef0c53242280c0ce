pub mod catalog;
pub mod config;
pub mod error;
pub mod merge;
pub mod normalize;
pub mod output;
pub mod record;
pub mod school;
pub mod source;

pub use catalog::{known_releases, Release};
pub use error::SarcError;
pub use merge::{scan_sarcs, YearSeries};
pub use normalize::normalize;
pub use record::{RawRecord, RawValue, Record, Scalar};
pub use school::SchoolDirectory;
