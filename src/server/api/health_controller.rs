use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use tracing::error;

use crate::logger::Logger;
use crate::server::dtos::health_dto::{
    HealthResponse, HealthStatus, PreferenceStoreHealth, RelayHealth, ServiceHealthDetails,
};
use crate::server::services::RouteContext;
use crate::server::{get_app_version, get_uptime_seconds};

/// health endpoint, only an unreachable preference store makes it unhealthy
pub async fn health_endpoint(
    Extension(services): Extension<RouteContext>,
) -> (StatusCode, Json<HealthResponse>) {
    let preferences = check_preference_health(&services).await;

    // an empty ranked set just means everyone is going direct
    let ranked = services.relays.fastest();
    let relays = RelayHealth {
        status: if ranked.is_empty() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        },
        ranked: ranked.len(),
        best: ranked.first().map(|r| r.name.clone()),
    };

    let overall_status = match (preferences.status, relays.status) {
        (HealthStatus::Unhealthy, _) => HealthStatus::Unhealthy,
        (_, HealthStatus::Degraded) => HealthStatus::Degraded,
        _ => HealthStatus::Healthy,
    };

    let response = HealthResponse {
        status: overall_status,
        timestamp: Utc::now(),
        uptime_seconds: get_uptime_seconds(),
        version: get_app_version().to_string(),
        environment: Logger::environment_name(services.config.cargo_env).to_string(),
        time_synced: services.time.is_synced(),
        services: ServiceHealthDetails {
            preferences,
            relays,
        },
    };

    let http_status = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (http_status, Json(response))
}

async fn check_preference_health(services: &RouteContext) -> PreferenceStoreHealth {
    let backend = if services.config.redis_url.is_some() {
        "redis"
    } else {
        "memory"
    };

    match services.preferences.health_check().await {
        Ok(response_time_ms) => PreferenceStoreHealth {
            status: HealthStatus::Healthy,
            backend,
            response_time_ms,
        },
        Err(e) => {
            error!("preference store health check failed: {}", e);
            PreferenceStoreHealth {
                status: HealthStatus::Unhealthy,
                backend,
                response_time_ms: None,
            }
        }
    }
}
