// Integration tests for `ApiClient` using wiremock.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use verda_api::{ApiClient, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(
        Url::parse(&server.uri()).expect("mock server uri"),
        &SecretString::from("test-token"),
        &TransportConfig::default(),
    )
    .expect("client construction");
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_greenhouses() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 1, "name": "Alpine House", "location": "North field" },
        { "id": 2, "name": "Tropics", "location": null },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let greenhouses = client.list_greenhouses().await.expect("list greenhouses");

    assert_eq!(greenhouses.len(), 2);
    assert_eq!(greenhouses[0].id, 1);
    assert_eq!(greenhouses[0].name, "Alpine House");
    assert_eq!(greenhouses[0].location.as_deref(), Some("North field"));
    assert!(greenhouses[1].location.is_none());
}

#[tokio::test]
async fn test_get_greenhouse_with_thresholds() {
    let (server, client) = setup().await;

    let body = json!({
        "id": 3,
        "name": "Herbs",
        "location": "Rooftop",
        "threshold": {
            "temperature_min": 15.0,
            "temperature_max": 25.0,
            "humidity_min": null,
            "humidity_max": 80.0,
            "co2_max": 1200.0,
            "light_min": null,
            "soil_moist_min": 20.0,
            "soil_temp_min": null,
            "water_level_min": 5.0,
            "solar_voltage_min": 11.5
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let greenhouse = client.get_greenhouse(3).await.expect("get greenhouse");

    assert_eq!(greenhouse.name, "Herbs");
    let thresholds = greenhouse.threshold.expect("thresholds present");
    assert_eq!(thresholds.temperature_min, Some(15.0));
    assert_eq!(thresholds.temperature_max, Some(25.0));
    assert!(thresholds.humidity_min.is_none());
    assert_eq!(thresholds.co2_max, Some(1200.0));
}

#[tokio::test]
async fn test_get_greenhouse_without_thresholds() {
    let (server, client) = setup().await;

    let body = json!({ "id": 4, "name": "Bare", "location": null, "threshold": null });

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let greenhouse = client.get_greenhouse(4).await.expect("get greenhouse");
    assert!(greenhouse.threshold.is_none());
}

#[tokio::test]
async fn test_list_sensors() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "id": 7,
            "type": "TEMP",
            "name": "Bench temp",
            "description": "Above bench 2",
            "latest_reading": { "value": 18.0, "timestamp": "2026-03-01T08:00:00Z" }
        },
        {
            "id": 8,
            "type": "WATER_LVL",
            "name": null,
            "description": null,
            "latest_reading": null
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/3/sensors/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let sensors = client.list_sensors(3).await.expect("list sensors");

    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].kind, "TEMP");
    assert_eq!(sensors[0].name.as_deref(), Some("Bench temp"));
    let reading = sensors[0].latest_reading.as_ref().expect("reading present");
    assert!((reading.value - 18.0).abs() < f64::EPSILON);
    assert_eq!(sensors[1].kind, "WATER_LVL");
    assert!(sensors[1].latest_reading.is_none());
}

#[tokio::test]
async fn test_get_overview() {
    let (server, client) = setup().await;

    let body = json!({
        "name": "Herbs",
        "location": "Rooftop",
        "actuators": [
            {
                "id": 1,
                "name": "Vent fan",
                "actuator_type": "FAN",
                "latest_status": { "status_value": "On", "timestamp": "2026-03-01T08:00:00Z" }
            },
            { "id": 2, "name": null, "actuator_type": "SHADE", "latest_status": null }
        ],
        "alerts": ["Temperature above maximum"]
    });

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/3/overview/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let overview = client.get_overview(3).await.expect("get overview");

    assert_eq!(overview.actuators.len(), 2);
    assert_eq!(
        overview.actuators[0]
            .latest_status
            .as_ref()
            .map(|s| s.status_value.as_str()),
        Some("On")
    );
    assert_eq!(overview.alerts, vec!["Temperature above maximum"]);
}

#[tokio::test]
async fn test_get_live_feed_passes_camera_id() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/3/live-feed/"))
        .and(query_param("camera_id", "9"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "stream_url": "https://cdn.example.com/live/9.m3u8" })),
        )
        .mount(&server)
        .await;

    let feed = client.get_live_feed(3, 9).await.expect("get live feed");
    assert_eq!(
        feed.stream_url.as_deref(),
        Some("https://cdn.example.com/live/9.m3u8")
    );
}

#[tokio::test]
async fn test_list_recordings_with_start_date() {
    let (server, client) = setup().await;

    let body = json!([
        {
            "id": 41,
            "camera_id": 9,
            "video_url": "https://cdn.example.com/rec/41.mp4",
            "timestamp": "2026-02-27T16:00:00Z"
        }
    ]);

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/3/recorded-footage/"))
        .and(query_param("camera_id", "9"))
        .and(query_param("start_date", "2026-02-27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let date = chrono::NaiveDate::from_ymd_opt(2026, 2, 27).expect("valid date");
    let recordings = client
        .list_recordings(3, 9, Some(date))
        .await
        .expect("list recordings");

    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].video_url, "https://cdn.example.com/rec/41.mp4");
}

// ── Status mapping ──────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = client.list_greenhouses().await.unwrap_err();
    assert!(err.is_unauthorized(), "expected Unauthorized, got {err:?}");
}

#[tokio::test]
async fn test_forbidden_maps_to_unauthorized() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/3/sensors/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client.list_sensors(3).await.unwrap_err();
    assert!(err.is_unauthorized(), "expected Unauthorized, got {err:?}");
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/99/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_greenhouse(99).await.unwrap_err();
    assert!(err.is_not_found(), "expected NotFound, got {err:?}");
}

#[tokio::test]
async fn test_server_error_maps_to_server() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client.list_greenhouses().await.unwrap_err();
    match err {
        Error::Server { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Server, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_unreachable() {
    // Bind-then-drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let client = ApiClient::new(
        Url::parse(&format!("http://127.0.0.1:{port}")).expect("url"),
        &SecretString::from("test-token"),
        &TransportConfig::default(),
    )
    .expect("client construction");

    let err = client.list_greenhouses().await.unwrap_err();
    assert!(err.is_unreachable(), "expected unreachable, got {err:?}");
}

#[tokio::test]
async fn test_garbage_body_maps_to_deserialization() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/greenhouses/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client.list_greenhouses().await.unwrap_err();
    assert!(
        matches!(err, Error::Deserialization { .. }),
        "expected Deserialization, got {err:?}"
    );
}
