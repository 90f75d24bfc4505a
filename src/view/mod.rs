//! Client-side filtering, ordering and paging of fetched records.
//!
//! Every function here is pure: inputs are borrowed and never mutated, and the
//! same inputs always produce the same output. `compute_view` composes the
//! stages in the fixed order filter, sort, paginate, so page boundaries and
//! counts always describe the filtered and ordered set.

pub mod stats;

use std::num::NonZeroUsize;

use serde::Serialize;

use crate::query::{QuerySpec, SortOrder};
use crate::record::Record;

pub use stats::{summarize, RecordStats};

/// One slice of a sequence plus the page count of the whole sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_pages: usize,
}

/// The ready-to-render slice for a query.
///
/// With no matches `total_pages` is 0 and `page` stays at 1.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultView<R> {
    pub items: Vec<R>,
    pub page: usize,
    pub page_size: usize,
    pub total_matched: usize,
    pub total_pages: usize,
}

impl<R> ResultView<R> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based positions of the first and last displayed item.
    pub fn range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let start = (self.page - 1) * self.page_size;
        Some((start + 1, start + self.items.len()))
    }
}

/// Keeps records where the trimmed, lower-cased term occurs in any searchable field.
///
/// A blank term keeps everything in input order.
pub fn filter<'a, R: Record>(records: &'a [R], term: &str) -> Vec<&'a R> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|record| matches_term(*record, &needle))
        .collect()
}

/// `needle` must already be lower-cased.
pub fn matches_term<R: Record>(record: &R, needle: &str) -> bool {
    record
        .searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Stable sort on the key's projection; ties keep input order in both directions.
pub fn sort<'a, R: Record>(records: &[&'a R], key: R::SortKey, order: SortOrder) -> Vec<&'a R> {
    let mut out = records.to_vec();
    match order {
        SortOrder::Ascending => out.sort_by(|a, b| a.sort_value(key).cmp(&b.sort_value(key))),
        SortOrder::Descending => out.sort_by(|a, b| b.sort_value(key).cmp(&a.sort_value(key))),
    }
    out
}

pub fn total_pages(len: usize, page_size: NonZeroUsize) -> usize {
    len.div_ceil(page_size.get())
}

/// Clamps a requested page into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Returns the `page`-th (1-based) slice of `records`.
///
/// Pages outside `1..=total_pages` come back empty rather than failing.
pub fn paginate<T: Clone>(records: &[T], page: usize, page_size: NonZeroUsize) -> Page<T> {
    let total_pages = total_pages(records.len(), page_size);
    if page == 0 || page > total_pages {
        return Page {
            items: Vec::new(),
            total_pages,
        };
    }
    let start = (page - 1) * page_size.get();
    let end = start.saturating_add(page_size.get()).min(records.len());
    Page {
        items: records[start..end].to_vec(),
        total_pages,
    }
}

pub fn compute_view<R: Record>(records: &[R], query: &QuerySpec<R>) -> ResultView<R> {
    let matched = filter(records, query.search_term());
    let ordered = sort(&matched, query.sort_key(), query.sort_order());

    let total_matched = ordered.len();
    let total_pages = total_pages(total_matched, query.page_size());
    let page = clamp_page(query.page(), total_pages);
    let slice = paginate(&ordered, page, query.page_size());

    ResultView {
        items: slice.items.into_iter().cloned().collect(),
        page,
        page_size: query.page_size().get(),
        total_matched,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{CaseRecord, CaseSortKey, GazetteRecord, GazetteSortKey};

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn titles<R: Record>(items: &[&R], field: impl Fn(&R) -> &str) -> Vec<String> {
        items.iter().map(|r| field(r).to_string()).collect()
    }

    #[test]
    fn blank_term_keeps_everything_in_order() {
        let recs = vec![CaseRecord::new("b", ""), CaseRecord::new("a", "")];
        let out = filter(&recs, "   ");
        assert_eq!(titles(&out, |r| r.title.as_str()), vec!["b", "a"]);
    }

    #[test]
    fn term_matches_any_searchable_field() {
        let recs = vec![
            CaseRecord::new("Acme v Beta", ""),
            CaseRecord::new("Other", "").with_suit_reference_number("SUIT/ACME/1"),
            CaseRecord::new("Third", "").with_court_type("High Court"),
            CaseRecord::new("Fourth", "").with_area_of_law("Land"),
            CaseRecord::new("Fifth", "").with_outcome("acme won"),
        ];
        assert_eq!(filter(&recs, "acme").len(), 2);
        assert_eq!(filter(&recs, "  HIGH court ").len(), 1);
        assert_eq!(filter(&recs, "land").len(), 1);
    }

    #[test]
    fn missing_fields_never_match() {
        let recs = vec![CaseRecord::default()];
        assert!(filter(&recs, "n/a").is_empty());
    }

    #[test]
    fn descending_date_sort_keeps_ties_in_input_order() {
        let recs = vec![
            CaseRecord::new("first", "2023-01-01"),
            CaseRecord::new("newest", "2024-01-01"),
            CaseRecord::new("second", "2023-01-01"),
            CaseRecord::new("undated", ""),
        ];
        let refs: Vec<&CaseRecord> = recs.iter().collect();
        let desc = sort(&refs, CaseSortKey::Date, SortOrder::Descending);
        assert_eq!(
            titles(&desc, |r| r.title.as_str()),
            vec!["newest", "first", "second", "undated"]
        );
        let asc = sort(&refs, CaseSortKey::Date, SortOrder::Ascending);
        assert_eq!(
            titles(&asc, |r| r.title.as_str()),
            vec!["undated", "first", "second", "newest"]
        );
    }

    #[test]
    fn text_sort_is_case_sensitive() {
        let recs = vec![GazetteRecord::new("beta", ""), GazetteRecord::new("Zeta", "")];
        let refs: Vec<&GazetteRecord> = recs.iter().collect();
        let asc = sort(&refs, GazetteSortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&asc, |r| r.title.as_str()), vec!["Zeta", "beta"]);
    }

    #[test]
    fn sort_does_not_touch_input() {
        let recs = vec![CaseRecord::new("b", ""), CaseRecord::new("a", "")];
        let refs: Vec<&CaseRecord> = recs.iter().collect();
        let _ = sort(&refs, CaseSortKey::Title, SortOrder::Ascending);
        assert_eq!(titles(&refs, |r| r.title.as_str()), vec!["b", "a"]);
    }

    #[test]
    fn paginate_slices_and_counts() {
        let items: Vec<u32> = (1..=25).collect();
        let p = paginate(&items, 3, size(10));
        assert_eq!(p.items, vec![21, 22, 23, 24, 25]);
        assert_eq!(p.total_pages, 3);
        assert!(paginate(&items, 4, size(10)).items.is_empty());
        assert!(paginate(&items, 0, size(10)).items.is_empty());
    }

    #[test]
    fn paginate_empty_sequence() {
        let p = paginate::<u32>(&[], 1, size(10));
        assert!(p.items.is_empty());
        assert_eq!(p.total_pages, 0);
    }

    #[test]
    fn clamp_page_bounds() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(99, 3), 3);
        assert_eq!(clamp_page(5, 0), 1);
        assert_eq!(clamp_page(2, 3), 2);
    }

    #[test]
    fn view_navigation_helpers() {
        let recs: Vec<CaseRecord> = (0..25)
            .map(|i| CaseRecord::new(&format!("case {i}"), ""))
            .collect();
        let q = QuerySpec::<CaseRecord>::new("", CaseSortKey::Title, SortOrder::Ascending, 2, 10)
            .unwrap();
        let view = compute_view(&recs, &q);
        assert!(view.has_previous());
        assert!(view.has_next());
        assert_eq!(view.range(), Some((11, 20)));

        let empty = compute_view(&recs, &q.with_search_term("zzz"));
        assert!(!empty.has_previous());
        assert!(!empty.has_next());
        assert_eq!(empty.range(), None);
    }
}
