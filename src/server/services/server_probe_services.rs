use futures::future::join_all;
use serde::Serialize;
use std::time::Duration;
use tracing::info;

use crate::catalog::{ContentKind, StreamingProvider, providers_for};
use crate::server::utils::playback_url_utils::wrap_with_relay;

use super::latency_services::DynLatencyService;
use super::relay_services::DynRelayService;

/// what a missing direct sample counts as when comparing against the relayed one
const MISSING_PING_MS: f64 = 999.0;

/// one row of the server picker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOption {
    pub name: String,
    pub url: String,
    pub ping: Option<f64>,
    pub proxied: bool,
    pub proxy_name: Option<String>,
}

/// picks between a direct and a relayed sample, relayed only wins when it's actually faster
pub fn choose_sample(direct: Option<f64>, relayed: Option<f64>) -> (Option<f64>, bool) {
    match relayed {
        Some(relayed) if relayed < direct.unwrap_or(MISSING_PING_MS) => (Some(relayed), true),
        _ => (direct, false),
    }
}

pub struct ServerProbeService {
    latency: DynLatencyService,
    relays: DynRelayService,
    timeout: Duration,
    relay_routing: bool,
}

impl ServerProbeService {
    pub fn new(
        latency: DynLatencyService,
        relays: DynRelayService,
        timeout: Duration,
        relay_routing: bool,
    ) -> Self {
        Self {
            latency,
            relays,
            timeout,
            relay_routing,
        }
    }

    /// probes every provider for `kind` direct and through the best relay, catalog order kept
    pub async fn probe_servers(&self, kind: ContentKind) -> Vec<ServerOption> {
        let relay = if self.relay_routing {
            self.relays.best().await
        } else {
            None
        };

        let probes = providers_for(kind).into_iter().map(|provider| {
            let relay = relay.clone();
            async move {
                let relayed_url = relay
                    .as_ref()
                    .map(|r| wrap_with_relay(&provider.url_template, r));

                let direct = self.latency.probe(&provider.url_template, self.timeout);
                let relayed = async {
                    match &relayed_url {
                        Some(url) => self.latency.probe(url, self.timeout).await,
                        None => None,
                    }
                };
                let (direct, relayed) = futures::join!(direct, relayed);

                Self::to_option(provider, direct, relayed, relay.map(|r| r.name))
            }
        });

        let servers = join_all(probes).await;
        info!(
            "probed {} {:?} servers, {} reachable",
            servers.len(),
            kind,
            servers.iter().filter(|s| s.ping.is_some()).count()
        );
        servers
    }

    fn to_option(
        provider: StreamingProvider,
        direct: Option<f64>,
        relayed: Option<f64>,
        relay_name: Option<String>,
    ) -> ServerOption {
        let (ping, proxied) = choose_sample(direct, relayed);
        ServerOption {
            name: provider.display_name,
            url: provider.url_template,
            ping,
            proxied,
            proxy_name: if proxied { relay_name } else { None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relayed_sample_only_wins_when_faster() {
        assert_eq!(choose_sample(Some(100.0), Some(80.0)), (Some(80.0), true));
        assert_eq!(choose_sample(Some(80.0), Some(100.0)), (Some(80.0), false));
        assert_eq!(choose_sample(Some(80.0), Some(80.0)), (Some(80.0), false));
        assert_eq!(choose_sample(None, Some(500.0)), (Some(500.0), true));
        assert_eq!(choose_sample(None, Some(1200.0)), (None, false));
        assert_eq!(choose_sample(Some(40.0), None), (Some(40.0), false));
        assert_eq!(choose_sample(None, None), (None, false));
    }
}
