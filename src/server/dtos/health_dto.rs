use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize)]
pub struct PreferenceStoreHealth {
    pub status: HealthStatus,
    pub backend: &'static str,
    pub response_time_ms: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RelayHealth {
    /// degraded when nothing made it into the ranked set, playback still works direct
    pub status: HealthStatus,
    pub ranked: usize,
    pub best: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ServiceHealthDetails {
    pub preferences: PreferenceStoreHealth,
    pub relays: RelayHealth,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: String,
    pub environment: String,
    pub time_synced: bool,
    pub services: ServiceHealthDetails,
}
