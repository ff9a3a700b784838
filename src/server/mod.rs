pub mod api;
pub mod dtos;
pub mod error;
pub mod extractors;
pub mod services;
pub mod utils;

use std::net::SocketAddr;
use std::sync::{Arc, LazyLock};
use std::time::Instant;

use anyhow::Context;
use axum::{Extension, Router, http::HeaderValue, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::AppConfig;
use api::{
    health_controller::health_endpoint, relay_controller::RelayController,
    route_controller::RouteController, theme_controller::ThemeController,
    time_controller::TimeController,
};
pub use services::RouteContext;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

pub fn get_uptime_seconds() -> u64 {
    START_TIME.elapsed().as_secs()
}

pub fn get_app_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub struct ApplicationServer;

impl ApplicationServer {
    fn cors(config: &AppConfig) -> CorsLayer {
        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if config.cors_origin.trim() == "*" {
            return layer.allow_origin(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origin
            .split(',')
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(_) => {
                    warn!("ignoring invalid cors origin {}", o);
                    None
                }
            })
            .collect();

        layer.allow_origin(AllowOrigin::list(origins))
    }

    /// the full router, split out so tests can drive it without binding a port
    pub fn router(services: RouteContext) -> Router {
        let api = Router::new()
            .merge(RelayController::app())
            .merge(RouteController::app())
            .merge(ThemeController::app())
            .merge(TimeController::app());

        Router::new()
            .route("/health", get(health_endpoint))
            .nest("/api", api)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(Self::cors(&services.config))
                    .layer(Extension(services)),
            )
    }

    /// location, relay ranking and the first time sync run in the background so the port
    /// opens right away
    fn warm_up(services: &RouteContext) {
        let relays = services.relays.clone();
        tokio::spawn(async move {
            let ranked = relays.rank().await;
            info!("initial relay ranking done, {} usable", ranked.len());
        });

        let time = services.time.clone();
        tokio::spawn(async move {
            time.initialize().await;
            time.spawn_periodic_sync();
        });
    }

    pub async fn serve(config: Arc<AppConfig>, services: RouteContext) -> anyhow::Result<()> {
        LazyLock::force(&START_TIME);

        Self::warm_up(&services);

        let app = Self::router(services);
        let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        info!("routes initialized, listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("shutdown signal received");
            })
            .await
            .context("error while serving")?;

        Ok(())
    }
}
