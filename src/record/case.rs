use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{date, display_or_na, lenient_text, Record, RecordKind, SortValue};
use crate::query::QueryError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaseSortKey {
    #[default]
    Date,
    Title,
    SuitNumber,
    Court,
    AreaOfLaw,
}

impl CaseSortKey {
    pub const ALL: [CaseSortKey; 5] = [
        Self::Date,
        Self::Title,
        Self::SuitNumber,
        Self::Court,
        Self::AreaOfLaw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::SuitNumber => "suit_number",
            Self::Court => "court",
            Self::AreaOfLaw => "area_of_law",
        }
    }
}

impl fmt::Display for CaseSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CaseSortKey {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "date" => Ok(Self::Date),
            "title" => Ok(Self::Title),
            "suit_number" | "suit_reference_number" | "suit" | "reference" => {
                Ok(Self::SuitNumber)
            }
            "court" | "court_type" => Ok(Self::Court),
            "area_of_law" | "area" | "category" => Ok(Self::AreaOfLaw),
            _ => Err(QueryError::UnknownSortKey {
                kind: RecordKind::Case.as_str(),
                value: value.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            }),
        }
    }
}

/// Case shape as the registry API returns it.
#[derive(Debug, Default, Deserialize)]
struct RawCaseRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    suit_reference_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    court_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    area_of_law: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    ai_case_outcome: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// A court case attached to an entity profile, normalized at decode time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCaseRecord")]
pub struct CaseRecord {
    pub id: String,
    pub title: String,
    pub suit_reference_number: String,
    pub court_type: String,
    pub area_of_law: String,
    pub date: String,
    pub ai_case_outcome: String,
    #[serde(skip)]
    timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<RawCaseRecord> for CaseRecord {
    fn from(raw: RawCaseRecord) -> Self {
        let date = raw.date.unwrap_or_default();
        Self {
            id: raw.id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            suit_reference_number: raw.suit_reference_number.unwrap_or_default(),
            court_type: raw.court_type.unwrap_or_default(),
            area_of_law: raw.area_of_law.unwrap_or_default(),
            timestamp: date::parse_timestamp(&date),
            date,
            ai_case_outcome: raw.ai_case_outcome.unwrap_or_default(),
            extra: raw.extra,
        }
    }
}

impl CaseRecord {
    pub fn new(title: &str, date: &str) -> Self {
        Self {
            title: title.to_string(),
            date: date.to_string(),
            timestamp: date::parse_timestamp(date),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_suit_reference_number(mut self, value: &str) -> Self {
        self.suit_reference_number = value.to_string();
        self
    }

    pub fn with_court_type(mut self, value: &str) -> Self {
        self.court_type = value.to_string();
        self
    }

    pub fn with_area_of_law(mut self, value: &str) -> Self {
        self.area_of_law = value.to_string();
        self
    }

    pub fn with_outcome(mut self, value: &str) -> Self {
        self.ai_case_outcome = value.to_string();
        self
    }
}

impl Record for CaseRecord {
    type SortKey = CaseSortKey;

    const KIND: RecordKind = RecordKind::Case;

    fn id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.suit_reference_number.as_str(),
            self.court_type.as_str(),
            self.area_of_law.as_str(),
        ]
    }

    fn sort_value(&self, key: CaseSortKey) -> SortValue<'_> {
        match key {
            CaseSortKey::Date => SortValue::Timestamp(date::sort_timestamp(self.timestamp)),
            CaseSortKey::Title => SortValue::Text(&self.title),
            CaseSortKey::SuitNumber => SortValue::Text(&self.suit_reference_number),
            CaseSortKey::Court => SortValue::Text(&self.court_type),
            CaseSortKey::AreaOfLaw => SortValue::Text(&self.area_of_law),
        }
    }

    fn parsed_date(&self) -> Option<i64> {
        self.timestamp
    }

    fn facet(&self) -> &str {
        &self.court_type
    }

    fn outcome(&self) -> Option<&str> {
        Some(&self.ai_case_outcome)
    }

    fn columns() -> &'static [&'static str] {
        &["Date", "Suit No.", "Title", "Court", "Area of Law", "Outcome"]
    }

    fn cells(&self) -> Vec<&str> {
        vec![
            display_or_na(&self.date),
            display_or_na(&self.suit_reference_number),
            display_or_na(&self.title),
            display_or_na(&self.court_type),
            display_or_na(&self.area_of_law),
            display_or_na(&self.ai_case_outcome),
        ]
    }
}
