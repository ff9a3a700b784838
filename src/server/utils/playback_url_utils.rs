use crate::catalog::{ContentRef, RelayEndpoint, StreamingProvider};

/// instantiates a provider template, `<template><id>` plus `?autoplay=true` unless the
/// template is the legacy bare-id one
pub fn instantiate_template(provider: &StreamingProvider, content: &ContentRef) -> String {
    let mut url = format!("{}{}", provider.url_template, content.path_segments());
    if provider.autoplay {
        url.push_str("?autoplay=true");
    }
    url
}

/// wraps an already built url so it goes through the given relay
pub fn wrap_with_relay(url: &str, relay: &RelayEndpoint) -> String {
    let encoded = urlencoding::encode(url);

    if relay.is_universal() {
        return format!("https://{}/?url={}", relay.host, encoded);
    }

    format!(
        "https://{}:{}/proxy?url={}&region={}&country={}",
        relay.host,
        relay.port,
        encoded,
        relay.region.as_str(),
        relay.country_code
    )
}

/// the url the player iframe should load, direct when there's no relay
pub fn build_playback_url(
    provider: &StreamingProvider,
    content: &ContentRef,
    relay: Option<&RelayEndpoint>,
) -> String {
    let url = instantiate_template(provider, content);
    match relay {
        Some(relay) => wrap_with_relay(&url, relay),
        None => url,
    }
}
