use std::fmt;
use std::str::FromStr;

use super::SourceError;
use crate::record::RecordKind;

pub const DEFAULT_ENDPOINT_TEMPLATE: &str = "{base}/{entity}/{id}/{records}/";

/// Registry entities that carry case and gazette listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Bank,
    Company,
    Insurance,
    Person,
}

impl EntityKind {
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Bank => "banks",
            Self::Company => "companies",
            Self::Insurance => "insurance",
            Self::Person => "persons",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

impl FromStr for EntityKind {
    type Err = SourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "bank" | "banks" => Ok(Self::Bank),
            "company" | "companies" => Ok(Self::Company),
            "insurance" | "insurer" | "insurers" => Ok(Self::Insurance),
            "person" | "persons" | "people" => Ok(Self::Person),
            _ => Err(SourceError::InvalidEntity {
                value: value.to_string(),
            }),
        }
    }
}

/// Ids go into a URL path segment verbatim, so anything that would end the
/// segment or start a query, fragment or escape is refused.
fn is_path_safe(id: &str) -> bool {
    !id.is_empty()
        && !id
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '/' | '\\' | '?' | '#' | '%'))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: String,
}

impl FromStr for EntityRef {
    type Err = SourceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || SourceError::InvalidEntity {
            value: value.to_string(),
        };
        let (kind, id) = value.split_once(':').ok_or_else(invalid)?;
        let id = id.trim();
        if !is_path_safe(id) {
            return Err(invalid());
        }
        let kind = kind.parse::<EntityKind>().map_err(|_| invalid())?;
        Ok(Self {
            kind,
            id: id.to_string(),
        })
    }
}

/// Fills `{base}`, `{entity}`, `{id}` and `{records}` in `template`.
pub fn endpoint_url(
    base: &str,
    template: &str,
    entity: &EntityRef,
    records: RecordKind,
) -> Result<String, SourceError> {
    if !is_path_safe(&entity.id) {
        return Err(SourceError::InvalidEntity {
            value: format!("{}:{}", entity.kind, entity.id),
        });
    }
    let url = template
        .replace("{base}", base.trim().trim_end_matches('/'))
        .replace("{entity}", entity.kind.path_segment())
        .replace("{id}", &entity.id)
        .replace("{records}", records.path_segment());
    if reqwest::Url::parse(&url).is_err() {
        return Err(SourceError::InvalidUrl { url });
    }
    Ok(url)
}
