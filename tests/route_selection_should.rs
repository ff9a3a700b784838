use std::sync::Arc;
use std::time::Duration;

use streamroute::catalog::{ContentKind, ContentRef, default_relays, providers_for};
use streamroute::server::error::Error;
use streamroute::server::services::{
    latency_services::MockLatencyServiceTrait,
    relay_services::MockRelayServiceTrait,
    route_services::RouteService,
    server_probe_services::ServerProbeService,
};

/// relay service whose best relay is the universal one
fn universal_best() -> MockRelayServiceTrait {
    let mut mock = MockRelayServiceTrait::new();
    mock.expect_best()
        .returning(|| Some(default_relays().remove(0)));
    mock
}

fn no_relay() -> MockRelayServiceTrait {
    let mut mock = MockRelayServiceTrait::new();
    mock.expect_best().returning(|| None);
    mock
}

#[tokio::test]
async fn routes_through_the_best_relay() {
    let routes = RouteService::new(Arc::new(universal_best()), true);

    let route = routes
        .select("VidSrc", ContentRef::movie("550"), true)
        .await
        .unwrap();

    assert_eq!(route.relay_name.as_deref(), Some("Global Fast Proxy"));
    assert_eq!(
        route.url,
        "https://simple-proxy.reyamae14.workers.dev/?url=https%3A%2F%2Fvidsrc.cc%2Fv3%2Fembed%2Fmovie%2F550%3Fautoplay%3Dtrue"
    );
    assert_eq!(routes.current(), Some(route));
}

#[tokio::test]
async fn provider_names_are_case_insensitive() {
    let routes = RouteService::new(Arc::new(no_relay()), true);

    let route = routes
        .select("vidjoy", ContentRef::tv("1399", 2, 5), true)
        .await
        .unwrap();

    assert_eq!(route.provider.display_name, "VidJoy");
    assert_eq!(route.url, "https://vidjoy.pro/embed/tv/1399/2/5?autoplay=true");
    assert_eq!(route.relay_name, None);
}

#[tokio::test]
async fn skips_the_relay_when_asked_to() {
    let mut relays = MockRelayServiceTrait::new();
    relays.expect_best().times(0);
    let routes = RouteService::new(Arc::new(relays), true);

    let route = routes
        .select("Primary", ContentRef::movie("550"), false)
        .await
        .unwrap();

    assert_eq!(route.url, "https://apimocine.vercel.app/movie/550");
}

#[tokio::test]
async fn skips_the_relay_when_routing_is_off() {
    let mut relays = MockRelayServiceTrait::new();
    relays.expect_best().times(0);
    let routes = RouteService::new(Arc::new(relays), false);

    let route = routes
        .select("Hexa", ContentRef::movie("27205"), true)
        .await
        .unwrap();

    assert_eq!(route.url, "https://hexa.watch/watch/movie/27205?autoplay=true");
    assert_eq!(route.relay_name, None);
}

#[tokio::test]
async fn unknown_providers_leave_the_current_route_alone() {
    let routes = RouteService::new(Arc::new(no_relay()), true);
    let first = routes
        .select("Vidora", ContentRef::movie("1"), true)
        .await
        .unwrap();

    let result = routes
        .select("Nonexistent", ContentRef::movie("2"), true)
        .await;

    assert!(matches!(result, Err(Error::NotFound(_))));
    assert_eq!(routes.current(), Some(first));
}

#[tokio::test]
async fn a_new_selection_replaces_the_old_one() {
    let routes = RouteService::new(Arc::new(no_relay()), true);
    assert_eq!(routes.current(), None);

    routes
        .select("Vidora", ContentRef::movie("1"), true)
        .await
        .unwrap();
    let second = routes
        .select("Xprime", ContentRef::tv("2", 1, 1), true)
        .await
        .unwrap();

    assert_eq!(routes.current(), Some(second));
}

#[tokio::test]
async fn initial_route_uses_the_first_provider() {
    let routes = RouteService::new(Arc::new(universal_best()), true);

    let route = routes.initial_route(ContentRef::movie("550")).await.unwrap();

    assert_eq!(route.provider, providers_for(ContentKind::Movie)[0]);
    assert_eq!(route.relay_name.as_deref(), Some("Global Fast Proxy"));
}

#[tokio::test]
async fn server_list_prefers_the_relay_only_when_faster() {
    let mut latency = MockLatencyServiceTrait::new();
    latency.expect_probe().returning(|url, _| {
        let relayed = url.starts_with("https://simple-proxy.reyamae14.workers.dev/");
        match (relayed, url.contains("vidsrc.cc")) {
            // vidsrc is slow direct, everything else is fast direct
            (false, true) => Some(400.0),
            (false, false) => Some(50.0),
            (true, _) => Some(120.0),
        }
    });

    let probes = ServerProbeService::new(
        Arc::new(latency),
        Arc::new(universal_best()),
        Duration::from_secs(1),
        true,
    );
    let servers = probes.probe_servers(ContentKind::Movie).await;

    let names: Vec<String> = providers_for(ContentKind::Movie)
        .into_iter()
        .map(|p| p.display_name)
        .collect();
    assert_eq!(
        servers.iter().map(|s| s.name.clone()).collect::<Vec<_>>(),
        names
    );

    for server in &servers {
        if server.name == "VidSrc" {
            assert!(server.proxied);
            assert_eq!(server.ping, Some(120.0));
            assert_eq!(server.proxy_name.as_deref(), Some("Global Fast Proxy"));
        } else {
            assert!(!server.proxied);
            assert_eq!(server.ping, Some(50.0));
            assert_eq!(server.proxy_name, None);
        }
    }
}

#[tokio::test]
async fn server_list_without_relay_is_direct_only() {
    let mut latency = MockLatencyServiceTrait::new();
    latency
        .expect_probe()
        .withf(|url, _| !url.contains("?url="))
        .returning(|_, _| None);

    let probes = ServerProbeService::new(
        Arc::new(latency),
        Arc::new(no_relay()),
        Duration::from_secs(1),
        true,
    );
    let servers = probes.probe_servers(ContentKind::Tv).await;

    assert_eq!(servers.len(), 8);
    assert!(servers.iter().all(|s| s.ping.is_none() && !s.proxied));
}
