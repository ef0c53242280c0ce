// src/school.rs

use crate::error::SarcError;
use once_cell::sync::Lazy;
use regex::Regex;

static CDS_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("static regex"));

/// Short names for schools, in the order they should be offered to users.
///
/// Lookups are exact: aliases are stored lower-case and callers pass them
/// lower-case.
#[derive(Debug, Clone)]
pub struct SchoolDirectory {
    aliases: Vec<(String, String)>,
}

impl Default for SchoolDirectory {
    fn default() -> Self {
        Self::new([
            ("lowell", "38684783833407"),
            ("lincoln", "38684783833241"),
            ("washington", "38684783839081"),
        ])
    }
}

impl SchoolDirectory {
    pub fn new<'a, I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(name, cds)| (name.to_string(), cds.to_string()))
                .collect(),
        }
    }

    /// The alias used when no school is given.
    pub fn default_alias(&self) -> Option<&str> {
        self.aliases.first().map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.iter().map(|(name, _)| name.as_str())
    }

    /// Turn an alias or a raw CDS code into a CDS code.
    pub fn resolve(&self, school: &str) -> Result<String, SarcError> {
        if CDS_CODE.is_match(school) {
            return Ok(school.to_string());
        }
        self.aliases
            .iter()
            .find(|(name, _)| name == school)
            .map(|(_, cds)| cds.clone())
            .ok_or_else(|| SarcError::UnknownSchool {
                school: school.to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            })
    }
}
