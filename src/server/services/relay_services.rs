use async_trait::async_trait;
use futures::future::join_all;
use mockall::automock;
use rand::Rng;
use std::cmp::Ordering;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::{PingSource, Region, RelayEndpoint};

use super::latency_services::DynLatencyService;
use super::location_services::DynLocationService;

/// how many relays survive a ranking round
pub const RANKED_SET_SIZE: usize = 5;

/// upper bound of the jitter added to synthetic pings
const SYNTHETIC_JITTER_MS: f64 = 20.0;
const SYNTHETIC_FLOOR_MS: f64 = 10.0;

/// region order for a continent, index 0 is priority 1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionPriority(pub [Region; 3]);

impl RegionPriority {
    pub fn for_continent(continent: &str) -> Self {
        use Region::{Americas, Asia, Europe};
        match continent {
            "AS" => Self([Asia, Europe, Americas]),
            "EU" => Self([Europe, Americas, Asia]),
            // NA, SA and everything we don't recognise
            _ => Self([Americas, Europe, Asia]),
        }
    }

    /// 1 for the home region, 3 for the furthest
    pub fn priority(&self, region: Region) -> u8 {
        self.0
            .iter()
            .position(|r| *r == region)
            .map(|i| i as u8 + 1)
            .unwrap_or(u8::MAX)
    }
}

/// `max(10, 100 - speed)` plus up to 20ms of jitter
pub fn synthetic_ping(static_speed_score: u8) -> f64 {
    let base = (100.0 - f64::from(static_speed_score)).max(SYNTHETIC_FLOOR_MS);
    base + rand::rng().random_range(0.0..SYNTHETIC_JITTER_MS)
}

/// drops relays without a ping, sorts by composite score and keeps the top five
///
/// the sort is stable so relays that tie keep the order they came in with (region order).
/// if no routable relay made the cut, the best-scoring one takes the last slot. it scored
/// no better than anything it displaces, so the set stays sorted
pub fn rank_samples(samples: Vec<RelayEndpoint>) -> Vec<RelayEndpoint> {
    let mut ranked: Vec<(f64, RelayEndpoint)> = samples
        .into_iter()
        .filter_map(|relay| relay.composite_score().map(|score| (score, relay)))
        .filter(|(score, _)| score.is_finite())
        .collect();

    ranked.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let routable_kept = ranked
        .iter()
        .take(RANKED_SET_SIZE)
        .any(|(_, relay)| relay.is_routable());
    if !routable_kept {
        if let Some(pos) = ranked.iter().position(|(_, relay)| relay.is_routable()) {
            let routable = ranked.remove(pos);
            ranked.truncate(RANKED_SET_SIZE - 1);
            ranked.push(routable);
        }
    }
    ranked.truncate(RANKED_SET_SIZE);

    ranked.into_iter().map(|(_, relay)| relay).collect()
}

/// orders the catalog by region priority and caps how many get probed
pub fn probe_candidates(
    catalog: &[RelayEndpoint],
    priority: RegionPriority,
    max_candidates: usize,
) -> Vec<RelayEndpoint> {
    let mut candidates = catalog.to_vec();
    candidates.sort_by_key(|relay| priority.priority(relay.region));
    candidates.truncate(max_candidates);
    candidates
}

pub type DynRelayService = Arc<dyn RelayServiceTrait + Send + Sync>;

#[automock]
#[async_trait]
pub trait RelayServiceTrait {
    /// runs a full probing round and replaces the ranked set with the result
    async fn rank(&self) -> Vec<RelayEndpoint>;

    /// highest ranked relay that can actually carry traffic, ranks first if nothing has been
    /// ranked yet. `None` means go direct
    async fn best(&self) -> Option<RelayEndpoint>;

    /// last ranked set without probing anything
    fn fastest(&self) -> Vec<RelayEndpoint>;
}

#[derive(Clone, Debug)]
pub struct RelaySelectorConfig {
    pub probe_timeout: Duration,
    pub max_probe_candidates: usize,
}

impl Default for RelaySelectorConfig {
    fn default() -> Self {
        Self {
            probe_timeout: Duration::from_millis(2000),
            max_probe_candidates: 13,
        }
    }
}

pub struct RelayService {
    catalog: Vec<RelayEndpoint>,
    location: DynLocationService,
    latency: DynLatencyService,
    config: RelaySelectorConfig,
    /// `None` until the first round finishes
    ranked: RwLock<Option<Vec<RelayEndpoint>>>,
}

impl RelayService {
    pub fn new(
        catalog: Vec<RelayEndpoint>,
        location: DynLocationService,
        latency: DynLatencyService,
        config: RelaySelectorConfig,
    ) -> Self {
        Self {
            catalog,
            location,
            latency,
            config,
            ranked: RwLock::new(None),
        }
    }

    pub fn catalog(&self) -> &[RelayEndpoint] {
        &self.catalog
    }

    fn last_round(&self) -> Option<Vec<RelayEndpoint>> {
        match self.ranked.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    async fn sample(&self, mut relay: RelayEndpoint) -> RelayEndpoint {
        relay.measured_ping = match relay.ping_source {
            PingSource::Measured => {
                self.latency
                    .probe(&relay.origin(), self.config.probe_timeout)
                    .await
            }
            PingSource::Synthetic => Some(synthetic_ping(relay.static_speed_score)),
        };

        match relay.measured_ping {
            Some(ping) => debug!("relay {} sampled at {:.1}ms", relay.name, ping),
            None => debug!("relay {} gave no sample", relay.name),
        }

        relay
    }
}

#[async_trait]
impl RelayServiceTrait for RelayService {
    async fn rank(&self) -> Vec<RelayEndpoint> {
        let location = self.location.detect().await;
        let priority = RegionPriority::for_continent(&location.continent_code);

        let candidates =
            probe_candidates(&self.catalog, priority, self.config.max_probe_candidates);

        // every relay gets its own timeout so one dead host doesn't hold up the rest
        let samples = join_all(candidates.into_iter().map(|relay| self.sample(relay))).await;
        let ranked = rank_samples(samples);

        if ranked.is_empty() {
            warn!("no relay produced a usable ping, callers will go direct");
        } else {
            info!(
                "ranked {} relays for continent {}, best is {}",
                ranked.len(),
                location.continent_code,
                ranked[0].name
            );
        }

        match self.ranked.write() {
            Ok(mut guard) => *guard = Some(ranked.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(ranked.clone()),
        }

        ranked
    }

    async fn best(&self) -> Option<RelayEndpoint> {
        let ranked = match self.last_round() {
            Some(ranked) => ranked,
            None => self.rank().await,
        };
        // placeholder relays rank fine but have nowhere to send traffic
        ranked.into_iter().find(|relay| relay.is_routable())
    }

    fn fastest(&self) -> Vec<RelayEndpoint> {
        self.last_round().unwrap_or_default()
    }
}
