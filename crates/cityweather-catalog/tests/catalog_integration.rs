//! Integration tests for CatalogClient using wiremock.

use std::time::Duration;

use cityweather_catalog::{CatalogClient, CatalogError, CityBrowserState, PageOutcome, PAGE_SIZE};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn record(id: usize) -> serde_json::Value {
    serde_json::json!({
        "geoname_id": id.to_string(),
        "name": format!("City {id}"),
        "cou_name_en": "France",
        "timezone": "Europe/Paris",
        "population": 1000 + id
    })
}

fn results(range: std::ops::Range<usize>) -> serde_json::Value {
    serde_json::json!({
        "total_count": 140000,
        "results": range.map(record).collect::<Vec<_>>()
    })
}

fn client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_page_sends_limit_and_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records"))
        .and(query_param("limit", "20"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(40..60)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cities = client(&mock_server).fetch_page(3).await.unwrap();

    assert_eq!(cities.len(), PAGE_SIZE);
    assert_eq!(cities[0].id, "40");
    assert_eq!(cities[0].name, "City 40");
    assert_eq!(cities[0].country_name, "France");
}

#[tokio::test]
async fn test_fetch_page_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_page(1).await.unwrap_err();
    match err {
        CatalogError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_page_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"results\": [oops"))
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).fetch_page(1).await.unwrap_err();
    assert!(err.is_parse(), "expected parse error, got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Nothing listens on the discard port
    let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let err = client.fetch_page(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_second_page_failure_keeps_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/records"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(0..20)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/records"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut state = CityBrowserState::new();

    let first = state.mount().unwrap();
    let outcome = state.complete_page(first, client.fetch_page(first.page).await);
    assert!(matches!(outcome, PageOutcome::Applied { appended: 20 }));

    let second = state.request_next_page().unwrap();
    let outcome = state.complete_page(second, client.fetch_page(second.page).await);
    assert!(matches!(outcome, PageOutcome::Failed(_)));

    assert_eq!(state.cities().len(), 20);
    assert!(state.pagination().has_more());
}
