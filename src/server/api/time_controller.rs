use axum::{Extension, Json, Router, routing::get};

use crate::server::{
    dtos::route_dto::{TimeQuery, TimeResponse},
    error::AppResult,
    extractors::api_request_extractor::ApiQuery,
    services::RouteContext,
};

pub struct TimeController;

impl TimeController {
    pub fn app() -> Router {
        Router::new().route("/time", get(Self::time))
    }

    async fn time(
        Extension(services): Extension<RouteContext>,
        ApiQuery(query): ApiQuery<TimeQuery>,
    ) -> AppResult<Json<TimeResponse>> {
        let time = &services.time;
        Ok(Json(TimeResponse {
            formatted: time.format_time(query.format),
            timezone: time.timezone(),
            utc_offset_minutes: time.offset().local_minus_utc() / 60,
            synced: time.is_synced(),
        }))
    }
}
