use axum::{Extension, Json, Router, routing::get};

use crate::server::{
    dtos::route_dto::{SetThemeRequest, ThemeResponse},
    error::AppResult,
    extractors::api_request_extractor::ApiJson,
    services::RouteContext,
};

pub struct ThemeController;

impl ThemeController {
    pub fn app() -> Router {
        Router::new()
            .route("/themes", get(Self::list))
            .route("/themes/current", get(Self::current).put(Self::set))
    }

    async fn list(Extension(services): Extension<RouteContext>) -> Json<Vec<ThemeResponse>> {
        Json(
            services
                .themes
                .themes()
                .iter()
                .cloned()
                .map(ThemeResponse::from)
                .collect(),
        )
    }

    async fn current(Extension(services): Extension<RouteContext>) -> Json<ThemeResponse> {
        Json(services.themes.current().into())
    }

    async fn set(
        Extension(services): Extension<RouteContext>,
        ApiJson(request): ApiJson<SetThemeRequest>,
    ) -> AppResult<Json<ThemeResponse>> {
        let theme = services.themes.set_theme(&request.id).await?;
        Ok(Json(theme.into()))
    }
}
