//! Data models for summoner queries and lookup results

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Path of the name checker page.
pub const PAGE_PATH: &str = "/lol-name-checker";

/// Shortest name the form will submit.
pub const MIN_NAME_LEN: usize = 3;

/// Regions supported by the lookup service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Na,
    Euw,
    Eune,
    Oce,
    Las,
}

impl Region {
    pub const ALL: [Region; 5] = [Region::Na, Region::Euw, Region::Eune, Region::Oce, Region::Las];

    /// Lowercase code used in URLs and by the lookup service.
    pub fn code(self) -> &'static str {
        match self {
            Region::Na => "na",
            Region::Euw => "euw",
            Region::Eune => "eune",
            Region::Oce => "oce",
            Region::Las => "las",
        }
    }

    /// Uppercase label shown in the region selector.
    pub fn label(self) -> &'static str {
        match self {
            Region::Na => "NA",
            Region::Euw => "EUW",
            Region::Eune => "EUNE",
            Region::Oce => "OCE",
            Region::Las => "LAS",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Region::Na => "North America (NA)",
            Region::Euw => "Europe West (EUW)",
            Region::Eune => "Europe Nordic & East (EUNE)",
            Region::Oce => "Oceanic (OCE)",
            Region::Las => "Latin America South (LAS)",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a region code is not one the lookup service knows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported region `{0}`")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Region::ALL
            .into_iter()
            .find(|region| region.code() == code)
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// A region + name pair taken from the page URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummonerQuery {
    pub region: Region,
    pub name: String,
}

impl SummonerQuery {
    pub fn new(region: Region, name: impl Into<String>) -> Self {
        Self {
            region,
            name: name.into(),
        }
    }

    /// In-app path for this query, in canonical lowercase form.
    ///
    /// Only the name is percent-encoded; `region` is always one of the fixed codes.
    pub fn page_url(&self) -> String {
        format!(
            "{PAGE_PATH}?region={}&name={}",
            self.region.code(),
            urlencoding::encode(&self.name.to_lowercase())
        )
    }
}

/// A summoner as returned by the lookup service.
///
/// `level` is required: records without it are rejected when the response is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerRecord {
    pub name: String,
    pub level: u32,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub revision_date: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub availability_date: DateTime<Utc>,
}

/// Result of one lookup. Produced once per query and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(SummonerRecord),
    NotFound,
    Error,
}

impl LookupOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, LookupOutcome::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_parses_case_insensitively() {
        assert_eq!("na".parse::<Region>(), Ok(Region::Na));
        assert_eq!("EUW".parse::<Region>(), Ok(Region::Euw));
        assert_eq!(" Eune ".parse::<Region>(), Ok(Region::Eune));
        assert_eq!("kr".parse::<Region>(), Err(UnknownRegion("kr".to_string())));
    }

    #[test]
    fn page_url_is_lowercase() {
        let query = SummonerQuery::new(Region::Oce, "Faker");
        assert_eq!(query.page_url(), "/lol-name-checker?region=oce&name=faker");
    }

    #[test]
    fn page_url_encodes_spaces_in_names() {
        let query = SummonerQuery::new(Region::Na, "Doublelift Fan");
        assert_eq!(
            query.page_url(),
            "/lol-name-checker?region=na&name=doublelift%20fan"
        );
    }

    #[test]
    fn record_parses_millisecond_timestamps() {
        let payload = r#"{
            "name": "Xyz",
            "level": 15,
            "revisionDate": 1600000000000,
            "availabilityDate": 1640000000000,
            "icon": 4
        }"#;

        let record: SummonerRecord = serde_json::from_str(payload).expect("record should parse");
        assert_eq!(record.level, 15);
        assert_eq!(record.revision_date.timestamp_millis(), 1_600_000_000_000);
        assert_eq!(record.availability_date.timestamp_millis(), 1_640_000_000_000);
    }

    #[test]
    fn record_without_level_is_rejected() {
        let payload = r#"{"name":"Xyz","revisionDate":1,"availabilityDate":2}"#;
        assert!(serde_json::from_str::<SummonerRecord>(payload).is_err());
    }
}
