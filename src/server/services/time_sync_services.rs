use anyhow::Context;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::location_services::DynLocationService;

pub const DEFAULT_PRIMARY_TIME_API: &str = "https://timeapi.io/api/Time/current/zone?timeZone=";
pub const DEFAULT_FALLBACK_TIME_API: &str = "https://worldtimeapi.org/api/timezone/";

/// utc offsets are multiples of 15 minutes everywhere that matters
const OFFSET_GRANULARITY_SECS: i64 = 15 * 60;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFormat {
    #[default]
    Full,
    Time,
    Date,
    Iso,
}

#[derive(Debug, Clone)]
pub struct TimeApiEndpoints {
    /// timezone gets appended url-encoded, answers `{"dateTime": "<zone wall clock>"}`
    pub primary: String,
    /// timezone gets appended as a path, answers `{"datetime": "<rfc3339>"}`
    pub fallback: String,
}

impl Default for TimeApiEndpoints {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_TIME_API.to_string(),
            fallback: DEFAULT_FALLBACK_TIME_API.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct PrimaryTimeResponse {
    #[serde(rename = "dateTime")]
    date_time: String,
}

#[derive(Deserialize)]
struct FallbackTimeResponse {
    datetime: String,
}

#[derive(Debug, Clone, Copy)]
struct SyncState {
    synced: DateTime<Utc>,
    offset: FixedOffset,
    at: Instant,
}

/// turns a zone wall clock into an instant by guessing the offset against our own clock
///
/// skew under 7.5 minutes survives the rounding, which is the range this exists to correct
pub fn wall_clock_to_utc(wall: NaiveDateTime, now: DateTime<Utc>) -> (DateTime<Utc>, FixedOffset) {
    let raw = (wall - now.naive_utc()).num_seconds();
    let rounded = ((raw as f64 / OFFSET_GRANULARITY_SECS as f64).round() as i64)
        * OFFSET_GRANULARITY_SECS;
    // offsets past +-24h are nonsense, treat them as utc
    let offset = i32::try_from(rounded)
        .ok()
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());
    let utc = (wall - chrono::Duration::seconds(i64::from(offset.local_minus_utc()))).and_utc();
    (utc, offset)
}

pub fn format_instant(instant: DateTime<Utc>, offset: FixedOffset, format: TimeFormat) -> String {
    let local = instant.with_timezone(&offset);
    match format {
        TimeFormat::Full => local.format("%m/%d/%Y, %I:%M:%S %p").to_string(),
        TimeFormat::Time => local.format("%-I:%M:%S %p").to_string(),
        TimeFormat::Date => local.format("%-m/%-d/%Y").to_string(),
        TimeFormat::Iso => instant.to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

pub struct TimeSyncService {
    http: reqwest::Client,
    location: DynLocationService,
    endpoints: TimeApiEndpoints,
    interval: Duration,
    timezone: RwLock<Option<String>>,
    state: RwLock<Option<SyncState>>,
}

impl TimeSyncService {
    pub fn new(
        location: DynLocationService,
        endpoints: TimeApiEndpoints,
        interval: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .no_proxy()
            .build()
            .context("failed to build time sync client")?;

        Ok(Self {
            http,
            location,
            endpoints,
            interval,
            timezone: RwLock::new(None),
            state: RwLock::new(None),
        })
    }

    /// detects the timezone and does the first sync, never fails
    pub async fn initialize(&self) {
        let location = self.location.detect().await;
        *self.timezone.write().unwrap_or_else(|p| p.into_inner()) = Some(location.timezone);
        self.sync().await;
    }

    /// re-syncs every interval until the handle is aborted
    pub fn spawn_periodic_sync(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // first tick fires immediately and initialize already synced
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sync().await;
            }
        })
    }

    pub fn timezone(&self) -> Option<String> {
        self.timezone
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub async fn sync(&self) -> bool {
        let Some(timezone) = self.timezone() else {
            warn!("time sync skipped, timezone not detected yet");
            return false;
        };

        let result = match self.fetch_primary(&timezone).await {
            Ok(result) => Ok(result),
            Err(e) => {
                debug!("primary time api failed ({}), trying fallback", e);
                self.fetch_fallback(&timezone).await
            }
        };

        match result {
            Ok((synced, offset)) => {
                let skew = synced - Utc::now();
                info!(
                    "time synced for {}, local clock off by {}ms",
                    timezone,
                    skew.num_milliseconds()
                );
                *self.state.write().unwrap_or_else(|p| p.into_inner()) = Some(SyncState {
                    synced,
                    offset,
                    at: Instant::now(),
                });
                true
            }
            Err(e) => {
                // local clock keeps being used, nothing else to do
                error!("all time apis failed for {}: {}", timezone, e);
                false
            }
        }
    }

    async fn fetch_primary(&self, timezone: &str) -> anyhow::Result<(DateTime<Utc>, FixedOffset)> {
        let url = format!("{}{}", self.endpoints.primary, urlencoding::encode(timezone));
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: PrimaryTimeResponse = response.json().await?;
        let wall = NaiveDateTime::parse_from_str(&body.date_time, "%Y-%m-%dT%H:%M:%S%.f")?;
        Ok(wall_clock_to_utc(wall, Utc::now()))
    }

    async fn fetch_fallback(&self, timezone: &str) -> anyhow::Result<(DateTime<Utc>, FixedOffset)> {
        let url = format!("{}{}", self.endpoints.fallback, timezone);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let body: FallbackTimeResponse = response.json().await?;
        let parsed = DateTime::parse_from_rfc3339(&body.datetime)?;
        Ok((parsed.with_timezone(&Utc), *parsed.offset()))
    }

    /// synced instant plus however long it's been since, or the local clock before any sync
    pub fn current_time(&self) -> DateTime<Utc> {
        match *self.state.read().unwrap_or_else(|p| p.into_inner()) {
            Some(state) => {
                let elapsed = chrono::Duration::from_std(state.at.elapsed())
                    .unwrap_or_else(|_| chrono::Duration::zero());
                state.synced + elapsed
            }
            None => Utc::now(),
        }
    }

    pub fn offset(&self) -> FixedOffset {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .map(|s| s.offset)
            .unwrap_or_else(|| Local::now().offset().fix())
    }

    pub fn is_synced(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .is_some_and(|s| s.at.elapsed() < self.interval)
    }

    pub fn format_time(&self, format: TimeFormat) -> String {
        format_instant(self.current_time(), self.offset(), format)
    }
}
