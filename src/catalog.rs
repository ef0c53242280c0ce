// src/catalog.rs

use std::path::{Path, PathBuf};

/// One historical SARC data release: the academic year it describes and the
/// file it was published as, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub year: String,
    pub path: PathBuf,
}

impl Release {
    pub fn new(year: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            year: year.into(),
            path: path.into(),
        }
    }

    pub fn resolve(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.path)
    }
}

// 2006-07 .. 2008-09 come from the archived cde.ca.gov SARC pages
// (web.archive.org snapshots of /ta/ac/sa/sarcNNNN.asp); the rest from a
// recursive wget of http://www3.cde.ca.gov/researchfiles/sarc/.
static RELEASES: &[(&str, &str)] = &[
    ("2006-07", "sarc07/SCHENRET.DBF"),
    ("2007-08", "sarc08/SCHENRETH.DBF"),
    ("2008-09", "sarc09/SCHENRET.dbf"),
    ("2009-10", "www3.cde.ca.gov/researchfiles/sarc/sarc0910/schenret.xls"),
    ("2010-11", "www3.cde.ca.gov/researchfiles/sarc/sarc1011/SCHENRSG.xls"),
    ("2011-12", "www3.cde.ca.gov/researchfiles/sarc/sarc1112/SCHENRSG.xls"),
    // csteth1213.xls is test scores, not enrollment
    ("2012-13", "www3.cde.ca.gov/researchfiles/sarc/sarc1213/schenrsg.xls"),
    ("2013-14", "www3.cde.ca.gov/researchfiles/sarc/sarc1314/schenrsg.xls"),
    // trailing space kept as published; this entry matches no reader
    ("2015-16", "www3.cde.ca.gov/researchfiles/sarc/sarc1516/schengr.txt "),
    ("2016-17", "www3.cde.ca.gov/researchfiles/sarc/sarc1617/enrbysubgrp.txt"),
    ("2017-18", "www3.cde.ca.gov/researchfiles/sarc/sarc1718/enrbysubgrp.txt"),
    ("2018-19", "www3.cde.ca.gov/researchfiles/sarc/sarc1819/enrbystgrp.txt"),
    ("2019-20", "www3.cde.ca.gov/researchfiles/sarc/sarc1920/enrbysubgrp.txt"),
];

/// Every known enrollment release, oldest first.
pub fn known_releases() -> Vec<Release> {
    RELEASES
        .iter()
        .map(|(year, path)| Release::new(*year, *path))
        .collect()
}
