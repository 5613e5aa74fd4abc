//! Tests for the HTTP transport: client configuration, the response
//! envelope, and (behind the `integration-tests` feature) mocked wire tests.

use serde::Deserialize;
use serde_json::json;
use tidepool::http::{ApiClient, ListEnvelope};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Ticket {
    id: u32,
    title: String,
}

#[test]
fn test_builder_normalizes_base_url() {
    let client = ApiClient::builder("https://api.example.com/")
        .build()
        .expect("Failed to build client");

    assert_eq!(client.base_url(), "https://api.example.com");
}

#[test]
fn test_config_defaults() {
    let client = ApiClient::builder("https://api.example.com")
        .build()
        .expect("Failed to build client");

    let config = client.config();
    assert!(config.timeout.is_some());
    assert!(config.connect_timeout.is_some());
    assert!(config.user_agent.as_deref().unwrap().starts_with("Tidepool/"));
}

#[test]
fn test_builder_overrides() {
    use std::time::Duration;

    let client = ApiClient::builder("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .user_agent("AdminConsole/2.1")
        .bearer_auth("token-123")
        .build()
        .expect("Failed to build client");

    assert_eq!(client.config().timeout, Some(Duration::from_secs(60)));
    assert_eq!(client.config().user_agent.as_deref(), Some("AdminConsole/2.1"));
}

#[test]
fn test_envelope_into_page() {
    let envelope: ListEnvelope<Ticket> = serde_json::from_value(json!({
        "data": [
            { "id": 1, "title": "Printer jam" },
            { "id": 2, "title": "No dial tone" },
        ],
        "pagination": { "page": 1, "limit": 10, "total": 25, "total_pages": 3 }
    }))
    .expect("Failed to decode envelope");

    let page = envelope.into_page();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "Printer jam");
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 10);
    assert_eq!(page.total_items, 25);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next());
    assert!(!page.has_previous());
}

#[test]
fn test_envelope_truncates_items_past_limit() {
    let envelope: ListEnvelope<u32> = serde_json::from_value(json!({
        "data": [1, 2, 3, 4, 5],
        "pagination": { "page": 1, "limit": 3, "total": 5, "total_pages": 2 }
    }))
    .expect("Failed to decode envelope");

    let page = envelope.into_page();
    assert_eq!(page.items, vec![1, 2, 3]);
}

// Note: We use wiremock for mocked HTTP tests.
#[cfg(feature = "integration-tests")]
mod integration_tests {
    use super::*;
    use tidepool::http::HttpPageFetcher;
    use tidepool::{
        DataLayer, DataLayerConfig, PageFetcher, PageRequest, QueryError, QueryStatus, RetryPolicy,
    };
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ticket_envelope() -> serde_json::Value {
        json!({
            "data": [
                { "id": 1, "title": "Printer jam" },
                { "id": 2, "title": "No dial tone" },
            ],
            "pagination": { "page": 1, "limit": 10, "total": 2, "total_pages": 1 }
        })
    }

    #[tokio::test]
    async fn test_fetcher_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ticket_envelope()))
            .mount(&server)
            .await;

        let client = ApiClient::builder(server.uri()).build().unwrap();
        let fetcher = HttpPageFetcher::new(client, "/tickets");

        let page = PageFetcher::<Ticket>::fetch(&fetcher, PageRequest::new(1, 10))
            .await
            .expect("fetch failed");

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].id, 2);
        assert_eq!(page.total_items, 2);
    }

    #[tokio::test]
    async fn test_request_carries_paging_and_search_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "50"))
            .and(query_param("search", "printer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [],
                "pagination": { "page": 2, "limit": 50, "total": 0, "total_pages": 0 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::builder(server.uri()).build().unwrap();
        let fetcher = HttpPageFetcher::new(client, "tickets");

        let request = PageRequest::new(2, 50).with_search("printer");
        let page = PageFetcher::<Ticket>::fetch(&fetcher, request)
            .await
            .expect("fetch failed");
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_maps_with_body_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such resource"))
            .mount(&server)
            .await;

        let client = ApiClient::builder(server.uri()).build().unwrap();
        let fetcher = HttpPageFetcher::new(client, "/tickets");

        let result = PageFetcher::<Ticket>::fetch(&fetcher, PageRequest::new(1, 10)).await;
        assert_eq!(
            result,
            Err(QueryError::HttpStatus {
                status: 404,
                message: Some("no such resource".to_string()),
            })
        );
    }

    #[tokio::test]
    async fn test_bearer_auth_header_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .and(header("Authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ticket_envelope()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::builder(server.uri())
            .bearer_auth("token-123")
            .build()
            .unwrap();
        let fetcher = HttpPageFetcher::new(client, "/tickets");

        PageFetcher::<Ticket>::fetch(&fetcher, PageRequest::new(1, 10))
            .await
            .expect("fetch failed");
    }

    #[tokio::test]
    async fn test_layer_store_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ticket_envelope()))
            .mount(&server)
            .await;

        let layer = DataLayer::new(
            DataLayerConfig::new(server.uri()).retry(RetryPolicy::no_retry()),
        )
        .expect("Failed to build layer");

        let store = layer.list_query::<Ticket>("/tickets");
        store.fetch_page(1, 10, "").await;

        let state = store.state();
        assert_eq!(state.status, QueryStatus::Ready);
        assert_eq!(state.result.items.len(), 2);
    }
}
