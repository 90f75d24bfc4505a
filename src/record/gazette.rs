use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{date, display_or_na, lenient_text, Record, RecordKind, SortValue};
use crate::query::QueryError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GazetteSortKey {
    #[default]
    Date,
    Title,
    Reference,
    Type,
    Category,
}

impl GazetteSortKey {
    pub const ALL: [GazetteSortKey; 5] = [
        Self::Date,
        Self::Title,
        Self::Reference,
        Self::Type,
        Self::Category,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Title => "title",
            Self::Reference => "reference",
            Self::Type => "type",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for GazetteSortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GazetteSortKey {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "date" | "publication_date" => Ok(Self::Date),
            "title" => Ok(Self::Title),
            "reference" | "reference_number" | "gazette_number" => Ok(Self::Reference),
            "type" | "gazette_type" => Ok(Self::Type),
            "category" => Ok(Self::Category),
            _ => Err(QueryError::UnknownSortKey {
                kind: RecordKind::Gazette.as_str(),
                value: value.to_string(),
                expected: Self::ALL.map(Self::as_str).join(", "),
            }),
        }
    }
}

/// Gazette shape as the registry API returns it.
///
/// Alternate spellings of a field get their own slot so a record carrying
/// several of them still decodes; [`first_present`] picks one afterwards.
#[derive(Debug, Default, Deserialize)]
struct RawGazetteRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    reference_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    gazette_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    gazette_type: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    type_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    publication_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    gazette_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    description: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// A legal-gazette notice, normalized at decode time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGazetteRecord")]
pub struct GazetteRecord {
    pub id: String,
    pub title: String,
    pub reference_number: String,
    pub gazette_type: String,
    pub category: String,
    pub publication_date: String,
    pub description: String,
    #[serde(skip)]
    timestamp: Option<i64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// First candidate that is present and not blank, in priority order.
fn first_present<const N: usize>(candidates: [Option<String>; N]) -> String {
    candidates
        .into_iter()
        .flatten()
        .find(|v| !v.trim().is_empty())
        .unwrap_or_default()
}

impl From<RawGazetteRecord> for GazetteRecord {
    fn from(raw: RawGazetteRecord) -> Self {
        let publication_date =
            first_present([raw.publication_date, raw.gazette_date, raw.date]);
        Self {
            id: raw.id.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            reference_number: first_present([raw.reference_number, raw.gazette_number]),
            gazette_type: first_present([raw.gazette_type, raw.type_name]),
            category: raw.category.unwrap_or_default(),
            timestamp: date::parse_timestamp(&publication_date),
            publication_date,
            description: raw.description.unwrap_or_default(),
            extra: raw.extra,
        }
    }
}

impl GazetteRecord {
    pub fn new(title: &str, publication_date: &str) -> Self {
        Self {
            title: title.to_string(),
            publication_date: publication_date.to_string(),
            timestamp: date::parse_timestamp(publication_date),
            ..Default::default()
        }
    }

    pub fn with_reference_number(mut self, value: &str) -> Self {
        self.reference_number = value.to_string();
        self
    }

    pub fn with_gazette_type(mut self, value: &str) -> Self {
        self.gazette_type = value.to_string();
        self
    }

    pub fn with_category(mut self, value: &str) -> Self {
        self.category = value.to_string();
        self
    }
}

impl Record for GazetteRecord {
    type SortKey = GazetteSortKey;

    const KIND: RecordKind = RecordKind::Gazette;

    fn id(&self) -> &str {
        &self.id
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![
            self.title.as_str(),
            self.reference_number.as_str(),
            self.gazette_type.as_str(),
            self.category.as_str(),
        ]
    }

    fn sort_value(&self, key: GazetteSortKey) -> SortValue<'_> {
        match key {
            GazetteSortKey::Date => SortValue::Timestamp(date::sort_timestamp(self.timestamp)),
            GazetteSortKey::Title => SortValue::Text(&self.title),
            GazetteSortKey::Reference => SortValue::Text(&self.reference_number),
            GazetteSortKey::Type => SortValue::Text(&self.gazette_type),
            GazetteSortKey::Category => SortValue::Text(&self.category),
        }
    }

    fn parsed_date(&self) -> Option<i64> {
        self.timestamp
    }

    fn facet(&self) -> &str {
        &self.gazette_type
    }

    fn columns() -> &'static [&'static str] {
        &["Date", "Gazette No.", "Title", "Type", "Category"]
    }

    fn cells(&self) -> Vec<&str> {
        vec![
            display_or_na(&self.publication_date),
            display_or_na(&self.reference_number),
            display_or_na(&self.title),
            display_or_na(&self.gazette_type),
            display_or_na(&self.category),
        ]
    }
}
