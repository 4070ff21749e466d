//! Integration tests for GeoClient and SuggestionClient using wiremock.

use forecast_core::{
    ApiSettings, CityLookup, Config, GeoClient, SuggestionClient, WeatherError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geo_client(server: &MockServer) -> GeoClient {
    GeoClient::new(&ApiSettings {
        api_key: "TEST_KEY".into(),
        weather_base_url: format!("{}/data/2.5", server.uri()),
        geo_base_url: format!("{}/geo/1.0", server.uri()),
    })
}

fn springfields() -> serde_json::Value {
    serde_json::json!([
        { "name": "Springfield", "country": "US", "state": "Illinois", "lat": 39.8, "lon": -89.6 },
        { "name": "Springfield", "country": "US", "state": "Missouri", "lat": 37.2, "lon": -93.3 },
        { "name": "Springfield", "country": "AU", "lat": -20.6, "lon": 140.3 }
    ])
}

#[tokio::test]
async fn lookup_parses_matches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Springf"))
        .and(query_param("limit", "5"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(springfields()))
        .mount(&mock_server)
        .await;

    let matches = geo_client(&mock_server).lookup("Springf").await.unwrap();

    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].display_name(), "Springfield, Illinois, US");
    assert_eq!(matches[2].state, None);
}

#[tokio::test]
async fn lookup_surfaces_errors_to_direct_callers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = geo_client(&mock_server).lookup("Springf").await.unwrap_err();
    assert!(matches!(err, WeatherError::Status { .. }));
}

#[tokio::test]
async fn same_query_fetched_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(springfields()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = SuggestionClient::new(geo_client(&mock_server));
    assert_eq!(client.suggest("Springfield").await.len(), 3);
    assert_eq!(client.suggest("SPRINGFIELD").await.len(), 3);
}

#[tokio::test]
async fn one_character_query_never_hits_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(springfields()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = SuggestionClient::new(geo_client(&mock_server));
    assert!(client.suggest("S").await.is_empty());
}

#[tokio::test]
async fn failed_lookup_yields_empty_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = SuggestionClient::new(geo_client(&mock_server));
    assert!(client.suggest("Springfield").await.is_empty());
    assert_eq!(client.cached_queries(), 0);
}

#[test]
fn geo_client_requires_configuration() {
    let err = GeoClient::from_config(&Config::default()).unwrap_err();
    assert!(err.is_config());
}
