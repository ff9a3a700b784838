use anyhow::Context;
use async_trait::async_trait;
use mockall::automock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

pub type DynLatencyService = Arc<dyn LatencyServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait LatencyServiceTrait {
    /// best-effort HEAD against the origin of `url`
    ///
    /// any response at all counts as a sample (status codes are ignored, a 403 arrives just as
    /// fast as a 200), `None` on timeout, refused connections or urls that don't parse
    async fn probe(&self, url: &str, timeout: Duration) -> Option<f64>;
}

pub struct LatencyService {
    http: reqwest::Client,
}

impl LatencyService {
    pub fn new() -> anyhow::Result<Self> {
        // redirects would make us time the second hop, the first response is all we care about.
        // system proxies would put their own hop in the number too
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .no_proxy()
            .build()
            .context("failed to build latency probe client")?;

        Ok(Self { http })
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// `scheme://host[:port]`, `None` for opaque origins (data:, mailto:, garbage)
    pub fn origin_of(url: &str) -> Option<String> {
        let parsed = url::Url::parse(url).ok()?;
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return None;
        }
        Some(origin.ascii_serialization())
    }
}

#[async_trait]
impl LatencyServiceTrait for LatencyService {
    async fn probe(&self, url: &str, timeout: Duration) -> Option<f64> {
        let Some(origin) = Self::origin_of(url) else {
            debug!("probe skipped, no usable origin in {}", url);
            return None;
        };

        let request = self
            .http
            .head(&origin)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send();

        let start = Instant::now();
        match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => {
                let elapsed = start.elapsed().as_secs_f64() * 1000.0;
                debug!(
                    "probe {} -> {} in {:.0}ms",
                    origin,
                    response.status(),
                    elapsed
                );
                Some(elapsed.round())
            }
            Ok(Err(e)) => {
                debug!("probe {} rejected: {}", origin, e);
                None
            }
            Err(_) => {
                debug!("probe {} timed out after {:?}", origin, timeout);
                None
            }
        }
    }
}
