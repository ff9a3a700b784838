use axum::{
    Extension, Json, Router,
    extract::Path,
    routing::{get, post},
};
use tracing::debug;

use crate::catalog::ContentKind;
use crate::server::{
    dtos::route_dto::SelectRouteRequest,
    error::{AppResult, Error},
    extractors::api_request_extractor::ApiJson,
    services::{
        RouteContext, route_services::SelectedRoute, server_probe_services::ServerOption,
    },
};

pub struct RouteController;

impl RouteController {
    pub fn app() -> Router {
        Router::new()
            .route("/servers/{kind}", get(Self::servers))
            .route("/route", post(Self::select))
            .route("/route/current", get(Self::current))
    }

    fn parse_kind(kind: &str) -> AppResult<ContentKind> {
        kind.parse().map_err(Error::BadRequest)
    }

    /// picker data, every provider probed direct and through the best relay
    async fn servers(
        Extension(services): Extension<RouteContext>,
        Path(kind): Path<String>,
    ) -> AppResult<Json<Vec<ServerOption>>> {
        let kind = Self::parse_kind(&kind)?;
        Ok(Json(services.servers.probe_servers(kind).await))
    }

    async fn select(
        Extension(services): Extension<RouteContext>,
        ApiJson(request): ApiJson<SelectRouteRequest>,
    ) -> AppResult<Json<SelectedRoute>> {
        let content = request.content.into_content_ref(request.kind)?;
        debug!("route requested for {:?} via {:?}", content, request.provider);

        let route = match request.provider {
            Some(provider) => {
                services
                    .routes
                    .select(&provider, content, request.use_relay)
                    .await?
            }
            None => services.routes.initial_route(content).await?,
        };

        Ok(Json(route))
    }

    async fn current(Extension(services): Extension<RouteContext>) -> Json<Option<SelectedRoute>> {
        Json(services.routes.current())
    }
}
