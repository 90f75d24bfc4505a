use std::num::NonZeroUsize;

use crate::query::{QuerySpec, SortOrder};
use crate::record::{CaseRecord, CaseSortKey, GazetteRecord, GazetteSortKey, Record};
use crate::view::{compute_view, filter, paginate, sort};

fn size(n: usize) -> NonZeroUsize {
    NonZeroUsize::new(n).unwrap()
}

fn acme_and_zeta() -> Vec<CaseRecord> {
    vec![
        CaseRecord::new("Acme v Beta", "2023-01-01"),
        CaseRecord::new("Zeta v Acme", "2023-06-01"),
    ]
}

fn numbered(n: usize) -> Vec<CaseRecord> {
    (1..=n)
        .map(|i| {
            CaseRecord::new(&format!("Case {i:02}"), &format!("2020-01-{:02}", (i % 28) + 1))
                .with_id(&i.to_string())
        })
        .collect()
}

fn titles(items: &[CaseRecord]) -> Vec<&str> {
    items.iter().map(|r| r.title.as_str()).collect()
}

#[test]
fn search_then_sort_newest_first() {
    let recs = acme_and_zeta();
    let q = QuerySpec::<CaseRecord>::default().with_search_term("acme");
    let view = compute_view(&recs, &q);
    assert_eq!(titles(&view.items), vec!["Zeta v Acme", "Acme v Beta"]);
    assert_eq!(view.total_matched, 2);
    assert_eq!(view.total_pages, 1);
    assert_eq!(view.page, 1);
}

#[test]
fn no_match_gives_empty_view_with_zero_pages() {
    let recs = acme_and_zeta();
    let q = QuerySpec::<CaseRecord>::default().with_search_term("nomatch");
    let view = compute_view(&recs, &q);
    assert!(view.items.is_empty());
    assert_eq!(view.total_matched, 0);
    assert_eq!(view.total_pages, 0);
    assert_eq!(view.page, 1);
    assert!(!view.has_next());
    assert!(!view.has_previous());
}

#[test]
fn last_page_holds_the_remainder() {
    let recs = numbered(25);
    let q = QuerySpec::<CaseRecord>::default()
        .with_sort_key(CaseSortKey::Title)
        .with_sort_order(SortOrder::Ascending)
        .with_page(3);
    let view = compute_view(&recs, &q);
    assert_eq!(view.items.len(), 5);
    assert_eq!(view.total_pages, 3);
    assert_eq!(titles(&view.items)[0], "Case 21");
    assert_eq!(view.range(), Some((21, 25)));
}

#[test]
fn out_of_range_page_clamps_to_last() {
    let recs = numbered(25);
    let q = QuerySpec::<CaseRecord>::default().with_page(99);
    let view = compute_view(&recs, &q);
    let last = compute_view(&recs, &q.with_page(3));
    assert_eq!(view.page, 3);
    assert_eq!(view.items, last.items);
    assert_eq!(q.page(), 99);
}

#[test]
fn filter_is_a_subset_in_input_order() {
    let recs = numbered(12);
    let matched = filter(&recs, "case 1");
    assert!(matched.len() < recs.len());
    let ids: Vec<&str> = matched.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["10", "11", "12"]);

    assert_eq!(filter(&recs, "   ").len(), recs.len());
    assert_eq!(filter(&recs, "").len(), recs.len());
}

#[test]
fn filter_ignores_case() {
    let recs = vec![
        CaseRecord::new("Smith v Jones", "2021-01-01").with_id("1"),
        CaseRecord::new("Re Blacksmith Ltd", "2021-02-01").with_id("2"),
        CaseRecord::new("Doe v Roe", "2021-03-01")
            .with_id("3")
            .with_court_type("SMITHFIELD District Court"),
        CaseRecord::new("Acme v Beta", "2021-04-01").with_id("4"),
    ];
    let upper = filter(&recs, "SMITH");
    let lower = filter(&recs, "smith");
    let mixed = filter(&recs, "sMiTh");
    assert_eq!(upper, lower);
    assert_eq!(mixed, lower);
    let ids: Vec<&str> = lower.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn sort_keeps_input_order_for_ties() {
    let recs = vec![
        GazetteRecord::new("first", "2021-05-05").with_gazette_type("Notice"),
        GazetteRecord::new("second", "2021-05-05").with_gazette_type("Notice"),
        GazetteRecord::new("third", "2021-05-05").with_gazette_type("Notice"),
    ];
    let refs: Vec<&GazetteRecord> = recs.iter().collect();
    for order in [SortOrder::Ascending, SortOrder::Descending] {
        let sorted = sort(&refs, GazetteSortKey::Type, order);
        let names: Vec<&str> = sorted.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}

#[test]
fn descending_reverses_ascending_without_ties() {
    let recs = numbered(9);
    let refs: Vec<&CaseRecord> = recs.iter().collect();
    let asc = sort(&refs, CaseSortKey::Title, SortOrder::Ascending);
    let mut desc = sort(&refs, CaseSortKey::Title, SortOrder::Descending);
    desc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn pages_cover_the_sequence_exactly_once() {
    let recs = numbered(23);
    let mut seen: Vec<CaseRecord> = Vec::new();
    let total = paginate(&recs, 1, size(7)).total_pages;
    assert_eq!(total, 4);
    for page in 1..=total {
        let p = paginate(&recs, page, size(7));
        assert!(!p.items.is_empty());
        seen.extend(p.items);
    }
    assert_eq!(seen, recs);
    assert!(paginate(&recs, total + 1, size(7)).items.is_empty());
}

#[test]
fn compute_view_is_deterministic() {
    let recs = numbered(17);
    let q = QuerySpec::<CaseRecord>::default()
        .with_search_term("case")
        .with_page(2);
    assert_eq!(compute_view(&recs, &q), compute_view(&recs, &q));
}

#[test]
fn query_changes_reset_the_page() {
    let q = QuerySpec::<CaseRecord>::default().with_page(4);
    assert_eq!(q.with_search_term("acme").page(), 1);
    assert_eq!(q.with_sort_key(CaseSortKey::Court).page(), 1);
    assert_eq!(q.with_sort_order(SortOrder::Ascending).page(), 1);
    assert_eq!(q.with_page_size(size(25)).page(), 1);
    assert_eq!(q.with_search_term("").page(), 4);
    assert_eq!(q.with_sort_order(SortOrder::Descending).page(), 4);
}

#[test]
fn records_decoded_from_json_flow_through_the_view() {
    let body = br#"{"results": [
        {"id": 1, "title": "Acme v Beta", "date": "2023-01-01", "court_type": null},
        {"id": "2", "title": "Zeta v Acme", "date": "not a date"},
        {"id": 3, "title": "Gamma v Delta", "date": "2022-12-31T10:00:00Z"}
    ]}"#;
    let recs: Vec<CaseRecord> = crate::source::decode_records(body, "inline").unwrap();
    let q = QuerySpec::<CaseRecord>::default().with_sort_order(SortOrder::Ascending);
    let view = compute_view(&recs, &q);
    assert_eq!(
        titles(&view.items),
        vec!["Zeta v Acme", "Gamma v Delta", "Acme v Beta"]
    );
    assert_eq!(view.items[0].cells()[3], "N/A");
}
