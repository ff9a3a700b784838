use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    Router,
    http::{StatusCode, header::LOCATION},
    routing::any,
};
use streamroute::server::services::latency_services::{LatencyService, LatencyServiceTrait};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// an address nothing is listening on
async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[tokio::test]
async fn any_response_counts_as_a_sample() {
    let addr = spawn(Router::new().route("/", any(|| async { StatusCode::FORBIDDEN }))).await;
    let probe = LatencyService::new().unwrap();

    let ping = probe
        .probe(&format!("http://{}/watch/movie/900?autoplay=true", addr), Duration::from_secs(2))
        .await;

    let ping = ping.expect("a 403 still answers");
    assert!(ping >= 0.0 && ping < 2000.0);
}

#[tokio::test]
async fn refused_connections_are_none() {
    let addr = closed_port().await;
    let probe = LatencyService::new().unwrap();

    assert_eq!(
        probe
            .probe(&format!("http://{}/", addr), Duration::from_secs(1))
            .await,
        None
    );
}

#[tokio::test]
async fn malformed_urls_are_none() {
    let probe = LatencyService::new().unwrap();

    for url in ["", "not a url", "://missing-scheme", "data:text/plain,hi", "http://"] {
        assert_eq!(probe.probe(url, Duration::from_millis(200)).await, None, "{}", url);
    }
}

#[tokio::test]
async fn slow_targets_time_out_on_schedule() {
    let app = Router::new().route(
        "/",
        any(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            StatusCode::OK
        }),
    );
    let addr = spawn(app).await;
    let probe = LatencyService::new().unwrap();

    let started = Instant::now();
    let ping = probe
        .probe(&format!("http://{}/", addr), Duration::from_millis(300))
        .await;

    assert_eq!(ping, None);
    assert!(started.elapsed() < Duration::from_millis(1500));
}

#[tokio::test]
async fn redirects_are_not_followed() {
    let app = Router::new()
        .route("/", any(|| async { (StatusCode::TEMPORARY_REDIRECT, [(LOCATION, "/slow")]) }))
        .route(
            "/slow",
            any(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                StatusCode::OK
            }),
        );
    let addr = spawn(app).await;
    let probe = LatencyService::new().unwrap();

    // following the redirect would land on the slow hop and time out
    let ping = probe
        .probe(&format!("http://{}/", addr), Duration::from_secs(1))
        .await;

    assert!(ping.is_some_and(|p| p < 1000.0));
}

#[tokio::test]
async fn only_the_origin_is_probed() {
    assert_eq!(
        LatencyService::origin_of("https://vidsrc.cc/v3/embed/movie/"),
        Some("https://vidsrc.cc".to_string())
    );
    assert_eq!(
        LatencyService::origin_of("https://proxy-de.server.com:8080/proxy?url=x"),
        Some("https://proxy-de.server.com:8080".to_string())
    );
    assert_eq!(LatencyService::origin_of("mailto:someone@example.com"), None);
}
