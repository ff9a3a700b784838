use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::{
    catalog::default_relays,
    config::AppConfig,
    database::{
        RedisDatabase,
        preference::{DynPreferenceStore, MemoryPreferenceStore, RedisPreferenceStore},
    },
};

use super::{
    latency_services::{DynLatencyService, LatencyService},
    location_services::{DynLocationService, LocationService, local_timezone},
    relay_services::{DynRelayService, RelaySelectorConfig, RelayService},
    route_services::RouteService,
    server_probe_services::ServerProbeService,
    theme_services::ThemeService,
    time_sync_services::{TimeApiEndpoints, TimeSyncService},
};

/// every service the handlers need, built once at startup and handed around as an extension
#[derive(Clone)]
pub struct RouteContext {
    pub location: DynLocationService,
    pub latency: DynLatencyService,
    pub relays: DynRelayService,
    pub servers: Arc<ServerProbeService>,
    pub routes: Arc<RouteService>,
    pub themes: Arc<ThemeService>,
    pub time: Arc<TimeSyncService>,
    pub preferences: DynPreferenceStore,
    pub config: Arc<AppConfig>,
}

impl RouteContext {
    pub async fn new(config: Arc<AppConfig>) -> anyhow::Result<Self> {
        info!("starting route services...");

        let preferences: DynPreferenceStore = match &config.redis_url {
            Some(redis_url) => {
                let redis = RedisDatabase::connect(redis_url)
                    .await
                    .context("preference store needs redis")?;
                Arc::new(RedisPreferenceStore::new(Arc::new(redis)))
            }
            None => {
                info!("no redis configured, preferences stay in memory");
                Arc::new(MemoryPreferenceStore::new())
            }
        };

        let location = Arc::new(LocationService::with_defaults(
            Duration::from_millis(config.geolocation_timeout_ms),
            local_timezone(config.local_timezone.as_deref()),
        )?) as DynLocationService;

        let latency = Arc::new(LatencyService::new()?) as DynLatencyService;

        Self::from_parts(config, location, latency, preferences).await
    }

    /// wires everything on top of already built leaf services, tests use this with mocks
    pub async fn from_parts(
        config: Arc<AppConfig>,
        location: DynLocationService,
        latency: DynLatencyService,
        preferences: DynPreferenceStore,
    ) -> anyhow::Result<Self> {
        let relays = Arc::new(RelayService::new(
            default_relays(),
            location.clone(),
            latency.clone(),
            RelaySelectorConfig {
                probe_timeout: Duration::from_millis(config.relay_probe_timeout_ms),
                max_probe_candidates: config.max_probe_candidates,
            },
        )) as DynRelayService;

        let servers = Arc::new(ServerProbeService::new(
            latency.clone(),
            relays.clone(),
            Duration::from_millis(config.server_probe_timeout_ms),
            config.relay_routing,
        ));

        let routes = Arc::new(RouteService::new(relays.clone(), config.relay_routing));

        let themes = Arc::new(ThemeService::load(preferences.clone()).await);

        let time = Arc::new(TimeSyncService::new(
            location.clone(),
            TimeApiEndpoints::default(),
            Duration::from_secs(config.time_sync_interval_secs),
        )?);

        info!("route services ok");

        Ok(Self {
            location,
            latency,
            relays,
            servers,
            routes,
            themes,
            time,
            preferences,
            config,
        })
    }
}
