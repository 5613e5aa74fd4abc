//! Tests for URL-backed pagination state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;
use tidepool::{AddressBar, PageSizePolicy, UrlState, UrlSync};

#[test]
fn test_serialize_without_search() {
    let state = UrlState::new(2, 20);
    assert_eq!(state.serialize(), "page=2&limit=20");
}

#[test]
fn test_serialize_with_search() {
    let state = UrlState::new(1, 10).with_search("printer jam");
    assert_eq!(state.serialize(), "page=1&limit=10&search=printer+jam");
}

#[test]
fn test_search_is_trimmed_and_empty_dropped() {
    assert_eq!(UrlState::new(1, 10).with_search("  ").search, None);
    assert_eq!(
        UrlState::new(1, 10).with_search("  abc  ").search.as_deref(),
        Some("abc")
    );
}

#[test]
fn test_parse_round_trip() {
    let policy = PageSizePolicy::default();
    let state = UrlState::new(3, 50).with_search("open");

    let parsed = UrlState::parse(&state.serialize(), &policy);
    assert_eq!(parsed, state);
}

#[test]
fn test_parse_defaults_when_absent() {
    let policy = PageSizePolicy::default();

    let parsed = UrlState::parse("", &policy);
    assert_eq!(parsed.page, 1);
    assert_eq!(parsed.page_size, 10);
    assert_eq!(parsed.search, None);
}

#[test]
fn test_parse_defaults_when_malformed() {
    let policy = PageSizePolicy::default();

    let parsed = UrlState::parse("page=abc&limit=ten", &policy);
    assert_eq!(parsed.page, 1);
    assert_eq!(parsed.page_size, 10);

    let parsed = UrlState::parse("page=0&limit=-5", &policy);
    assert_eq!(parsed.page, 1);
    assert_eq!(parsed.page_size, 10);
}

#[test]
fn test_parse_rejects_disallowed_page_size() {
    let policy = PageSizePolicy::default();

    let parsed = UrlState::parse("page=2&limit=37", &policy);
    assert_eq!(parsed.page, 2);
    assert_eq!(parsed.page_size, 10);

    let dropdown_policy = PageSizePolicy::new(500, [500]);
    let parsed = UrlState::parse("limit=500", &dropdown_policy);
    assert_eq!(parsed.page_size, 500);
}

#[test]
fn test_parse_accepts_leading_question_mark() {
    let policy = PageSizePolicy::default();
    let parsed = UrlState::parse("?page=4&limit=20", &policy);
    assert_eq!(parsed.page, 4);
    assert_eq!(parsed.page_size, 20);
}

#[test]
fn test_parse_ignores_unknown_params() {
    let policy = PageSizePolicy::default();
    let parsed = UrlState::parse("page=2&limit=20&tab=open&sort=desc", &policy);
    assert_eq!(parsed, UrlState::new(2, 20));
}

#[test]
fn test_parse_is_idempotent() {
    let policy = PageSizePolicy::default();
    let first = UrlState::parse("page=5&limit=100&search=x", &policy);
    let second = UrlState::parse("page=5&limit=100&search=x", &policy);
    assert_eq!(first, second);
}

#[derive(Default)]
struct FakeBar {
    query: Mutex<String>,
    pushes: AtomicU32,
}

impl AddressBar for FakeBar {
    fn replace_query(&self, query: &str) {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        *self.query.lock() = query.to_string();
    }

    fn query(&self) -> String {
        self.query.lock().clone()
    }
}

#[test]
fn test_push_writes_through_single_serializer() {
    let bar = Arc::new(FakeBar::default());
    let sync = UrlSync::new(bar.clone(), PageSizePolicy::default());

    sync.push(&UrlState::new(2, 20));
    assert_eq!(bar.query.lock().as_str(), "page=2&limit=20");
    assert_eq!(bar.pushes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_push_skips_identical_consecutive_states() {
    let bar = Arc::new(FakeBar::default());
    let sync = UrlSync::new(bar.clone(), PageSizePolicy::default());

    sync.push(&UrlState::new(2, 20));
    sync.push(&UrlState::new(2, 20));
    assert_eq!(bar.pushes.load(Ordering::SeqCst), 1);

    sync.push(&UrlState::new(3, 20));
    assert_eq!(bar.pushes.load(Ordering::SeqCst), 2);
}

#[test]
fn test_read_parses_current_bar_state() {
    let bar = Arc::new(FakeBar::default());
    *bar.query.lock() = "page=7&limit=50&search=fax".to_string();

    let sync = UrlSync::new(bar, PageSizePolicy::default());
    let state = sync.read();
    assert_eq!(state.page, 7);
    assert_eq!(state.page_size, 50);
    assert_eq!(state.search.as_deref(), Some("fax"));
}
