use axum::{Extension, Json, Router, routing::get, routing::post};
use tracing::info;

use crate::catalog::RelayEndpoint;
use crate::server::services::{RouteContext, location_services::UserLocation};

pub struct RelayController;

impl RelayController {
    pub fn app() -> Router {
        Router::new()
            .route("/location", get(Self::location))
            .route("/relays", get(Self::ranked))
            .route("/relays/refresh", post(Self::refresh))
            .route("/relays/best", get(Self::best))
    }

    async fn location(Extension(services): Extension<RouteContext>) -> Json<UserLocation> {
        Json(services.location.detect().await)
    }

    /// last ranked set, ranks on the spot if nothing has run yet
    async fn ranked(Extension(services): Extension<RouteContext>) -> Json<Vec<RelayEndpoint>> {
        let current = services.relays.fastest();
        if !current.is_empty() {
            return Json(current);
        }
        Json(services.relays.rank().await)
    }

    async fn refresh(Extension(services): Extension<RouteContext>) -> Json<Vec<RelayEndpoint>> {
        info!("relay refresh requested");
        Json(services.relays.rank().await)
    }

    /// null means use a direct connection
    async fn best(Extension(services): Extension<RouteContext>) -> Json<Option<RelayEndpoint>> {
        Json(services.relays.best().await)
    }
}
