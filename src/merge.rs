//! Cross-year merge: scan every release for one school and transpose the
//! matching rows into `field → year → value`.

use crate::catalog::Release;
use crate::normalize::{normalize, CDS_FIELD, YEAR_FIELD};
use crate::record::{Record, Scalar};
use crate::source;
use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    time::Instant,
};
use tracing::{debug, info, instrument};

/// Values of one field keyed by release year, in the order the years were
/// scanned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearValues {
    entries: Vec<(String, Scalar)>,
}

impl YearValues {
    /// A repeated year overwrites in place and keeps its original position.
    pub fn insert(&mut self, year: String, value: Scalar) {
        match self.entries.iter_mut().find(|(y, _)| *y == year) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((year, value)),
        }
    }

    pub fn get(&self, year: &str) -> Option<&Scalar> {
        self.entries.iter().find(|(y, _)| y == year).map(|(_, v)| v)
    }

    pub fn years(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(y, _)| y.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for YearValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (year, value) in &self.entries {
            map.serialize_entry(year, value)?;
        }
        map.end()
    }
}

/// The merged view for one school: field names sorted, years in scan order.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct YearSeries {
    fields: BTreeMap<String, YearValues>,
}

impl YearSeries {
    pub fn get(&self, field: &str) -> Option<&YearValues> {
        self.fields.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Read one release file and keep the normalized rows for `cds_code`.
#[instrument(level = "info", skip(path), fields(year = %release.year, path = %path.display()))]
pub fn parse_file(release: &Release, path: &Path, cds_code: &str) -> Result<Vec<Record>> {
    let start = Instant::now();
    let mut matched = Vec::new();
    let mut read = 0usize;

    for row in source::read_rows(path)? {
        let row = row?;
        read += 1;
        let rec = normalize(row, &release.year)
            .with_context(|| format!("normalizing row {} of {}", read, path.display()))?;

        match rec.get(CDS_FIELD) {
            Some(code) if code.as_str() == Some(cds_code) => matched.push(rec),
            Some(_) => {}
            None => debug!(row = read, "row has no {}; not matched", CDS_FIELD),
        }
    }

    info!(read, matched = matched.len(), elapsed = ?start.elapsed(), "parsed");
    Ok(matched)
}

/// Turn rows into `field → year → value`. A row lacking a field contributes
/// nothing for that field.
pub fn transpose(records: &[Record]) -> YearSeries {
    let names: BTreeSet<&String> = records.iter().flat_map(|r| r.keys()).collect();

    let fields = names
        .into_iter()
        .map(|name| {
            let mut values = YearValues::default();
            for rec in records {
                if let Some(v) = rec.get(name) {
                    values.insert(year_key(rec), v.clone());
                }
            }
            (name.clone(), values)
        })
        .collect();

    YearSeries { fields }
}

fn year_key(rec: &Record) -> String {
    match rec.get(YEAR_FIELD) {
        Some(Scalar::Str(s)) => s.clone(),
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) => format!("{:?}", f),
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Null) | None => "null".to_string(),
    }
}

/// Scan every release in order and merge the rows for `cds_code`.
pub fn scan_sarcs(releases: &[Release], data_dir: &Path, cds_code: &str) -> Result<YearSeries> {
    let mut rows = Vec::new();
    for release in releases {
        let path = release.resolve(data_dir);
        let found = parse_file(release, &path, cds_code)
            .with_context(|| format!("processing {} release {}", release.year, path.display()))?;
        rows.extend(found);
    }

    let series = transpose(&rows);
    info!(
        school = cds_code,
        rows = rows.len(),
        fields = series.len(),
        "merged"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SarcError;
    use std::fs;
    use tempfile::tempdir;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,sarctransform=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn rec(pairs: &[(&str, Scalar)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn field_missing_in_one_year_is_absent_not_null() {
        let rows = vec![
            rec(&[("SARCYear", "A".into()), ("X", Scalar::Int(1))]),
            rec(&[("SARCYear", "B".into())]),
        ];
        let series = transpose(&rows);

        let x = series.get("X").unwrap();
        assert_eq!(x.len(), 1);
        assert_eq!(x.get("A"), Some(&Scalar::Int(1)));
        assert_eq!(x.get("B"), None);
        assert_eq!(
            serde_json::to_string(&series).unwrap(),
            r#"{"SARCYear":{"A":"A","B":"B"},"X":{"A":1}}"#
        );
    }

    #[test]
    fn years_keep_scan_order_and_fields_sort() {
        let rows = vec![
            rec(&[("SARCYear", "2019-20".into()), ("b", Scalar::Int(2))]),
            rec(&[("SARCYear", "2006-07".into()), ("a", Scalar::Int(1)), ("b", Scalar::Null)]),
        ];
        let series = transpose(&rows);
        assert_eq!(series.field_names().collect::<Vec<_>>(), vec!["SARCYear", "a", "b"]);
        assert_eq!(
            series.get("b").unwrap().years().collect::<Vec<_>>(),
            vec!["2019-20", "2006-07"]
        );
        assert_eq!(series.get("b").unwrap().get("2006-07"), Some(&Scalar::Null));
    }

    #[test]
    fn same_year_overwrites() {
        let rows = vec![
            rec(&[("SARCYear", "A".into()), ("X", Scalar::Int(1))]),
            rec(&[("SARCYear", "A".into()), ("X", Scalar::Int(2))]),
        ];
        let series = transpose(&rows);
        assert_eq!(series.get("X").unwrap().get("A"), Some(&Scalar::Int(2)));
        assert_eq!(series.get("X").unwrap().len(), 1);
    }

    #[test]
    fn parse_file_filters_on_school() -> Result<()> {
        init_test_logging();
        let dir = tempdir()?;
        let path = dir.path().join("enrbysubgrp.txt");
        fs::write(
            &path,
            "CDSCODE,PER_white,TOTAL\n38684783833407,12.5,400\n38684783833241,40,900\n",
        )?;

        let release = Release::new("2015-16", "enrbysubgrp.txt");
        let rows = parse_file(&release, &path, "38684783833407")?;
        assert_eq!(
            rows,
            vec![rec(&[
                ("CDSCODE", "38684783833407".into()),
                ("PER_white", Scalar::Float(12.5)),
                ("SARCYear", "2015-16".into()),
            ])]
        );
        Ok(())
    }

    #[test]
    fn rows_without_cds_code_never_match() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("odd.txt");
        fs::write(&path, "SchoolName,PER_white\nLowell,10\n")?;

        let release = Release::new("2016-17", "odd.txt");
        assert!(parse_file(&release, &path, "38684783833407")?.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_percentage_aborts_scan() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("bad.txt"),
            "CDSCODE,PER_black\n38684783833407,N/A\n",
        )?;

        let releases = vec![Release::new("2017-18", "bad.txt")];
        let err = scan_sarcs(&releases, dir.path(), "38684783833407").unwrap_err();
        let cause = err
            .downcast_ref::<SarcError>()
            .expect("root cause should be a SarcError");
        assert!(matches!(cause, SarcError::MalformedPercentage { key, .. } if key == "PER_black"));
        Ok(())
    }

    #[test]
    fn scan_is_deterministic() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("a.txt"),
            "CDSCODE,PER_white,Z,M\n1,1.5,z,m\n",
        )?;
        fs::write(
            dir.path().join("b.txt"),
            "CDSCode,SARCYear,PER_white,A\n1,2019-20,2,a\n",
        )?;
        let releases = vec![Release::new("2016-17", "a.txt"), Release::new("2019-20", "b.txt")];

        let first = serde_json::to_string_pretty(&scan_sarcs(&releases, dir.path(), "1")?)?;
        let second = serde_json::to_string_pretty(&scan_sarcs(&releases, dir.path(), "1")?)?;
        assert_eq!(first, second);
        assert!(first.find("\"A\"").unwrap() < first.find("\"Z\"").unwrap());
        Ok(())
    }
}
