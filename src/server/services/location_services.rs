use anyhow::Context;
use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// tried in order, first 2xx with a json body wins
pub const DEFAULT_GEOLOCATION_ENDPOINTS: &[&str] = &[
    "https://ipapi.co/json/",
    "https://api.ipify.org?format=json",
    "https://httpbin.org/ip",
];

const FALLBACK_TIMEZONE: &str = "America/New_York";
const FALLBACK_COUNTRY: &str = "US";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLocation {
    pub country_code: String,
    pub continent_code: String,
    pub timezone: String,
}

impl UserLocation {
    /// what we assume when no service answers, only the timezone is actually known
    pub fn from_timezone(timezone: &str) -> Self {
        Self {
            country_code: FALLBACK_COUNTRY.to_string(),
            continent_code: continent_from_timezone(timezone).to_string(),
            timezone: timezone.to_string(),
        }
    }
}

/// `Asia/..` -> AS, `Europe/..` -> EU, anything else NA
pub fn continent_from_timezone(timezone: &str) -> &'static str {
    match timezone.split('/').next().unwrap_or_default() {
        "Asia" => "AS",
        "Europe" => "EU",
        _ => "NA",
    }
}

/// IANA name of the host timezone
///
/// override, then `TZ`, then /etc/timezone, then whatever /etc/localtime links to
pub fn local_timezone(override_tz: Option<&str>) -> String {
    let from_env = override_tz
        .map(|s| s.to_string())
        .or_else(|| std::env::var("TZ").ok())
        .map(|s| s.trim_start_matches(':').trim().to_string())
        .filter(|s| s.contains('/'));
    if let Some(tz) = from_env {
        return tz;
    }

    if let Ok(contents) = std::fs::read_to_string("/etc/timezone") {
        let tz = contents.trim();
        if tz.contains('/') {
            return tz.to_string();
        }
    }

    if let Ok(target) = std::fs::read_link("/etc/localtime") {
        let target = target.to_string_lossy();
        if let Some((_, tz)) = target.split_once("zoneinfo/") {
            return tz.to_string();
        }
    }

    FALLBACK_TIMEZONE.to_string()
}

fn string_field(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| data.get(*k))
        .filter_map(|v| v.as_str())
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// every service names things differently, this squashes them into one shape
pub fn normalize_location(data: &Value, local_tz: &str) -> UserLocation {
    let timezone = string_field(data, &["timezone", "time_zone"])
        .or_else(|| {
            // some services nest it, e.g. {"time_zone": {"name": ".."}} or {"timezone": {"id": ".."}}
            ["timezone", "time_zone"]
                .iter()
                .filter_map(|k| data.get(*k))
                .find_map(|tz| string_field(tz, &["name", "id"]))
        })
        .unwrap_or_else(|| local_tz.to_string());

    let country_code = string_field(data, &["country_code", "countryCode", "country"])
        .unwrap_or_else(|| FALLBACK_COUNTRY.to_string());

    let continent_code = string_field(data, &["continent_code", "continentCode"])
        .unwrap_or_else(|| continent_from_timezone(&timezone).to_string());

    UserLocation {
        country_code,
        continent_code,
        timezone,
    }
}

pub type DynLocationService = Arc<dyn LocationServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait LocationServiceTrait {
    /// memoized, only the first call hits the network. never fails
    async fn detect(&self) -> UserLocation;
}

pub struct LocationService {
    http: reqwest::Client,
    endpoints: Vec<String>,
    timeout: Duration,
    local_timezone: String,
    cached: OnceCell<UserLocation>,
}

impl LocationService {
    pub fn new(
        endpoints: Vec<String>,
        timeout: Duration,
        local_timezone: String,
    ) -> anyhow::Result<Self> {
        // through a system proxy we'd be locating the proxy instead of the user
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .context("failed to build geolocation client")?;

        Ok(Self {
            http,
            endpoints,
            timeout,
            local_timezone,
            cached: OnceCell::new(),
        })
    }

    pub fn with_defaults(timeout: Duration, local_timezone: String) -> anyhow::Result<Self> {
        let endpoints = DEFAULT_GEOLOCATION_ENDPOINTS
            .iter()
            .map(|s| s.to_string())
            .collect();
        Self::new(endpoints, timeout, local_timezone)
    }

    async fn query(&self, endpoint: &str) -> Option<UserLocation> {
        let request = self
            .http
            .get(endpoint)
            .header(reqwest::header::CACHE_CONTROL, "no-store")
            .send();

        // the timeout covers reading the body too, a service that trickles bytes is as bad as
        // one that never answers
        let result = tokio::time::timeout(self.timeout, async {
            let response = request.await.ok()?;
            if !response.status().is_success() {
                debug!("{} answered {}", endpoint, response.status());
                return None;
            }
            response.json::<Value>().await.ok()
        })
        .await;

        match result {
            Ok(Some(data)) if data.is_object() => {
                Some(normalize_location(&data, &self.local_timezone))
            }
            Ok(_) => {
                warn!("geolocation service {} gave nothing usable", endpoint);
                None
            }
            Err(_) => {
                warn!("geolocation service {} timed out", endpoint);
                None
            }
        }
    }

    async fn resolve(&self) -> UserLocation {
        for endpoint in &self.endpoints {
            if let Some(location) = self.query(endpoint).await {
                info!(
                    "detected location {} / {} / {} via {}",
                    location.country_code, location.continent_code, location.timezone, endpoint
                );
                return location;
            }
        }

        warn!(
            "all geolocation services failed, falling back to local timezone {}",
            self.local_timezone
        );
        UserLocation::from_timezone(&self.local_timezone)
    }
}

#[async_trait]
impl LocationServiceTrait for LocationService {
    async fn detect(&self) -> UserLocation {
        self.cached.get_or_init(|| self.resolve()).await.clone()
    }
}
