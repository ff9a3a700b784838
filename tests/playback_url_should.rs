use std::collections::HashSet;

use streamroute::catalog::{
    ContentKind, ContentRef, PingSource, Region, RelayEndpoint, default_relays, find_provider,
    providers_for,
};
use streamroute::server::utils::playback_url_utils::build_playback_url;

/// pulls the wrapped target back out of a relay url
fn unwrap_relay_url(relay_url: &str) -> Option<String> {
    let parsed = url::Url::parse(relay_url).ok()?;
    parsed
        .query_pairs()
        .find(|(k, _)| k == "url")
        .map(|(_, v)| v.into_owned())
}

fn regional_relay() -> RelayEndpoint {
    RelayEndpoint::new(
        "Germany",
        "DE",
        "🇩🇪",
        "proxy-de.server.com",
        8080,
        Region::Europe,
        64,
        PingSource::Synthetic,
    )
}

#[test]
fn legacy_template_takes_a_bare_id() {
    let primary = find_provider(ContentKind::Movie, "Primary").unwrap();
    let url = build_playback_url(&primary, &ContentRef::movie("900"), None);

    assert_eq!(url, "https://apimocine.vercel.app/movie/900");
}

#[test]
fn standard_templates_get_autoplay() {
    let vidsrc = find_provider(ContentKind::Movie, "VidSrc").unwrap();
    let url = build_playback_url(&vidsrc, &ContentRef::movie("900"), None);

    assert_eq!(url, "https://vidsrc.cc/v3/embed/movie/900?autoplay=true");
}

#[test]
fn tv_templates_get_season_and_episode() {
    let hexa = find_provider(ContentKind::Tv, "Hexa").unwrap();
    let url = build_playback_url(&hexa, &ContentRef::tv("1399", 2, 7), None);
    assert_eq!(url, "https://hexa.watch/watch/tv/1399/2/7?autoplay=true");

    let primary = find_provider(ContentKind::Tv, "primary").unwrap();
    let url = build_playback_url(&primary, &ContentRef::tv("1399", 2, 7), None);
    assert_eq!(url, "https://apimocine.vercel.app/tv/1399/2/7");
}

#[test]
fn universal_relay_only_takes_the_url() {
    let universal = default_relays().into_iter().find(|r| r.is_universal()).unwrap();
    let vidora = find_provider(ContentKind::Movie, "Vidora").unwrap();

    let url = build_playback_url(&vidora, &ContentRef::movie("42"), Some(&universal));

    assert_eq!(
        url,
        "https://simple-proxy.reyamae14.workers.dev/?url=https%3A%2F%2Fwatch.vidora.su%2Fwatch%2Fmovie%2F42%3Fautoplay%3Dtrue"
    );
}

#[test]
fn regional_relays_add_region_and_country() {
    let vidora = find_provider(ContentKind::Movie, "Vidora").unwrap();
    let url = build_playback_url(&vidora, &ContentRef::movie("42"), Some(&regional_relay()));

    assert!(url.starts_with("https://proxy-de.server.com:8080/proxy?url="));
    assert!(url.ends_with("&region=europe&country=DE"));
}

#[test]
fn wrapped_urls_decode_back_to_the_direct_url() {
    let relays = default_relays();
    for kind in [ContentKind::Movie, ContentKind::Tv] {
        let content = match kind {
            ContentKind::Movie => ContentRef::movie("550"),
            ContentKind::Tv => ContentRef::tv("1399", 1, 3),
        };

        for provider in providers_for(kind) {
            let direct = build_playback_url(&provider, &content, None);
            for relay in &relays {
                let wrapped = build_playback_url(&provider, &content, Some(relay));
                assert_eq!(unwrap_relay_url(&wrapped).as_deref(), Some(direct.as_str()));
            }
        }
    }
}

#[test]
fn different_ids_never_share_a_url() {
    let relay = regional_relay();
    let ids = ["1", "10", "100", "900", "9000", "tt0111161", "a b", "x&y"];

    for provider in providers_for(ContentKind::Movie) {
        for relay in [None, Some(&relay)] {
            let urls: HashSet<String> = ids
                .iter()
                .map(|id| build_playback_url(&provider, &ContentRef::movie(*id), relay))
                .collect();
            assert_eq!(urls.len(), ids.len(), "collision for {}", provider.display_name);
        }
    }
}
