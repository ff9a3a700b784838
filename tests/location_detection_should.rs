use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::{Json, Router, http::StatusCode, routing::get};
use serde_json::json;
use streamroute::server::services::location_services::{LocationService, LocationServiceTrait};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn first_working_service_wins() {
    let app = Router::new()
        .route("/broken", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .route("/garbage", get(|| async { "definitely not json" }))
        .route(
            "/geo",
            get(|| async {
                Json(json!({
                    "country_code": "JP",
                    "continent_code": "AS",
                    "timezone": "Asia/Tokyo"
                }))
            }),
        )
        .route(
            "/never",
            get(|| async { Json(json!({ "country_code": "FR", "continent_code": "EU" })) }),
        );
    let addr = spawn(app).await;

    let service = LocationService::new(
        vec![
            format!("http://{}/broken", addr),
            format!("http://{}/garbage", addr),
            format!("http://{}/geo", addr),
            format!("http://{}/never", addr),
        ],
        Duration::from_secs(2),
        "America/Chicago".to_string(),
    )
    .unwrap();

    let location = service.detect().await;
    assert_eq!(location.country_code, "JP");
    assert_eq!(location.continent_code, "AS");
    assert_eq!(location.timezone, "Asia/Tokyo");
}

#[tokio::test]
async fn second_call_is_served_from_cache() {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/geo",
        get(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(json!({ "country_code": "DE", "continent_code": "EU", "timezone": "Europe/Berlin" }))
            }
        }),
    );
    let addr = spawn(app).await;

    let service = LocationService::new(
        vec![format!("http://{}/geo", addr)],
        Duration::from_secs(2),
        "America/Chicago".to_string(),
    )
    .unwrap();

    let first = service.detect().await;
    let second = service.detect().await;

    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn falls_back_to_the_local_timezone() {
    let addr = closed_port().await;
    let service = LocationService::new(
        vec![
            format!("http://{}/json", addr),
            "not even a url".to_string(),
        ],
        Duration::from_millis(500),
        "Europe/Lisbon".to_string(),
    )
    .unwrap();

    let location = service.detect().await;
    assert_eq!(location.timezone, "Europe/Lisbon");
    assert_eq!(location.continent_code, "EU");
    assert_eq!(location.country_code, "US");
}

#[tokio::test]
async fn slow_services_are_skipped() {
    let app = Router::new()
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({ "country_code": "BR" }))
            }),
        )
        .route("/fast", get(|| async { Json(json!({ "ip": "10.0.0.1" })) }));
    let addr = spawn(app).await;

    let service = LocationService::new(
        vec![format!("http://{}/slow", addr), format!("http://{}/fast", addr)],
        Duration::from_millis(300),
        "Asia/Singapore".to_string(),
    )
    .unwrap();

    // an ip-only body is still a valid answer, everything else comes from the local timezone
    let location = service.detect().await;
    assert_eq!(location.country_code, "US");
    assert_eq!(location.continent_code, "AS");
    assert_eq!(location.timezone, "Asia/Singapore");
}
