use std::collections::BTreeMap;

use serde::Serialize;

use crate::record::{date, Record};

pub const UNSPECIFIED: &str = "Unspecified";

/// Aggregate counts over a matched record set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RecordStats {
    pub total: usize,
    pub by_facet: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub by_outcome: BTreeMap<String, usize>,
    pub earliest: Option<String>,
    pub latest: Option<String>,
    pub undated: usize,
}

fn label(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        UNSPECIFIED.to_string()
    } else {
        value.to_string()
    }
}

pub fn summarize<R: Record>(records: &[&R]) -> RecordStats {
    let mut stats = RecordStats {
        total: records.len(),
        ..Default::default()
    };
    let mut earliest: Option<i64> = None;
    let mut latest: Option<i64> = None;

    for record in records {
        *stats.by_facet.entry(label(record.facet())).or_insert(0) += 1;
        if let Some(outcome) = record.outcome() {
            // outcomes arrive in mixed case ("Won", "won ")
            *stats
                .by_outcome
                .entry(label(&outcome.to_lowercase()))
                .or_insert(0) += 1;
        }
        match record.parsed_date() {
            Some(ts) => {
                earliest = Some(earliest.map_or(ts, |e| e.min(ts)));
                latest = Some(latest.map_or(ts, |l| l.max(ts)));
            }
            None => stats.undated += 1,
        }
    }

    stats.earliest = earliest.map(date::format_timestamp);
    stats.latest = latest.map(date::format_timestamp);
    stats
}
