pub mod case;
pub mod date;
pub mod gazette;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::query::QueryError;

pub use case::{CaseRecord, CaseSortKey};
pub use gazette::{GazetteRecord, GazetteSortKey};

/// Placeholder shown for fields the API left empty.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    #[default]
    Case,
    Gazette,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Gazette => "gazette",
        }
    }

    /// Collection name used when building entity endpoints.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Case => "cases",
            Self::Gazette => "gazettes",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "case" | "cases" => Ok(Self::Case),
            "gazette" | "gazettes" | "notice" | "notices" => Ok(Self::Gazette),
            _ => Err(QueryError::UnknownRecordKind {
                value: value.to_string(),
            }),
        }
    }
}

/// Comparable projection of a record under one sort key.
///
/// A given key always yields the same variant, so cross-variant ordering never
/// decides a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue<'a> {
    Timestamp(i64),
    Text(&'a str),
}

/// A record kind that can be searched, sorted and rendered.
pub trait Record: Clone {
    type SortKey: Copy + Eq + Default + fmt::Debug + fmt::Display + FromStr<Err = QueryError>;

    const KIND: RecordKind;

    fn id(&self) -> &str;

    /// Normalized text fields the search term is matched against.
    fn searchable_fields(&self) -> Vec<&str>;

    fn sort_value(&self, key: Self::SortKey) -> SortValue<'_>;

    /// Parsed date in Unix seconds, `None` when the source date was missing or invalid.
    fn parsed_date(&self) -> Option<i64>;

    /// Grouping label for statistics.
    fn facet(&self) -> &str;

    fn outcome(&self) -> Option<&str> {
        None
    }

    fn columns() -> &'static [&'static str];

    /// Display cells, one per entry in [`Record::columns`].
    fn cells(&self) -> Vec<&str>;
}

pub(crate) fn display_or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        value
    }
}

/// Accepts any JSON scalar for a text field; `null`, arrays and objects read as absent.
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
