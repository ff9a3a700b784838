use serde::Serialize;
use std::sync::RwLock;
use tracing::info;

use crate::catalog::{ContentRef, StreamingProvider, find_provider, providers_for};
use crate::server::{
    error::{AppResult, Error},
    utils::playback_url_utils::build_playback_url,
};

use super::relay_services::DynRelayService;

/// what the player is showing right now
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRoute {
    pub provider: StreamingProvider,
    pub content: ContentRef,
    pub url: String,
    pub relay_name: Option<String>,
}

pub struct RouteService {
    relays: DynRelayService,
    relay_routing: bool,
    current: RwLock<Option<SelectedRoute>>,
}

impl RouteService {
    pub fn new(relays: DynRelayService, relay_routing: bool) -> Self {
        Self {
            relays,
            relay_routing,
            current: RwLock::new(None),
        }
    }

    /// builds a route for the named provider and makes it the current one
    pub async fn select(
        &self,
        provider_name: &str,
        content: ContentRef,
        use_relay: bool,
    ) -> AppResult<SelectedRoute> {
        let provider = find_provider(content.kind(), provider_name).ok_or_else(|| {
            Error::NotFound(format!(
                "no {:?} provider called '{}'",
                content.kind(),
                provider_name
            ))
        })?;

        Ok(self.select_provider(provider, content, use_relay).await)
    }

    /// first provider in the catalog through the best relay, what the page loads on mount
    pub async fn initial_route(&self, content: ContentRef) -> AppResult<SelectedRoute> {
        let provider = providers_for(content.kind())
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound("provider catalog is empty".to_string()))?;

        Ok(self.select_provider(provider, content, true).await)
    }

    async fn select_provider(
        &self,
        provider: StreamingProvider,
        content: ContentRef,
        use_relay: bool,
    ) -> SelectedRoute {
        let relay = if self.relay_routing && use_relay {
            self.relays.best().await
        } else {
            None
        };

        let url = build_playback_url(&provider, &content, relay.as_ref());
        let route = SelectedRoute {
            provider,
            content,
            url,
            relay_name: relay.map(|r| r.name),
        };

        info!(
            "selected {} via {}",
            route.provider.display_name,
            route.relay_name.as_deref().unwrap_or("direct")
        );

        match self.current.write() {
            Ok(mut guard) => *guard = Some(route.clone()),
            Err(poisoned) => *poisoned.into_inner() = Some(route.clone()),
        }

        route
    }

    pub fn current(&self) -> Option<SelectedRoute> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}
