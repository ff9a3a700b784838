use serde::{Deserialize, Serialize};

/// host of the one relay that takes `?url=` and nothing else
pub const UNIVERSAL_RELAY_HOST: &str = "simple-proxy.reyamae14.workers.dev";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Asia,
    Europe,
    Americas,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Asia => "asia",
            Region::Europe => "europe",
            Region::Americas => "americas",
        }
    }
}

/// how a relay ends up with a ping sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PingSource {
    /// real HEAD probe against the relay origin
    Measured,
    /// no reachable target, ping is derived from the speed score
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayEndpoint {
    pub name: String,
    pub country_code: String,
    pub display_flag: String,
    pub host: String,
    pub port: u16,
    pub region: Region,
    /// 0..=100, higher is better
    pub static_speed_score: u8,
    pub ping_source: PingSource,
    /// milliseconds, overwritten on every ranking round
    pub measured_ping: Option<f64>,
}

impl RelayEndpoint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        country_code: &str,
        display_flag: &str,
        host: &str,
        port: u16,
        region: Region,
        static_speed_score: u8,
        ping_source: PingSource,
    ) -> Self {
        Self {
            name: name.to_string(),
            country_code: country_code.to_string(),
            display_flag: display_flag.to_string(),
            host: host.to_string(),
            port,
            region,
            static_speed_score: static_speed_score.min(100),
            ping_source,
            measured_ping: None,
        }
    }

    pub fn is_universal(&self) -> bool {
        self.host == UNIVERSAL_RELAY_HOST
    }

    /// only relays with a real network target can carry playback traffic
    pub fn is_routable(&self) -> bool {
        self.ping_source == PingSource::Measured
    }

    /// origin used when the relay itself gets probed
    pub fn origin(&self) -> String {
        if self.port == 443 {
            format!("https://{}/", self.host)
        } else {
            format!("https://{}:{}/", self.host, self.port)
        }
    }

    /// lower is better, `None` until the relay has a ping sample
    pub fn composite_score(&self) -> Option<f64> {
        self.measured_ping
            .map(|ping| ping - f64::from(self.static_speed_score) * 0.1)
    }
}

/// the relay catalog, the universal relay is always first
pub fn default_relays() -> Vec<RelayEndpoint> {
    use PingSource::{Measured, Synthetic};
    use Region::{Americas, Asia, Europe};

    vec![
        RelayEndpoint::new("Global Fast Proxy", "GLOBAL", "🌍", UNIVERSAL_RELAY_HOST, 443, Americas, 99, Measured),
        RelayEndpoint::new("Hong Kong", "HK", "🇭🇰", "proxy-hk.server.com", 8080, Asia, 98, Synthetic),
        RelayEndpoint::new("Japan", "JP", "🇯🇵", "proxy-jp.server.com", 8080, Asia, 74, Synthetic),
        RelayEndpoint::new("Korea", "KR", "🇰🇷", "proxy-kr.server.com", 8080, Asia, 75, Synthetic),
        RelayEndpoint::new("United States", "US", "🇺🇸", "proxy-us.server.com", 8080, Americas, 64, Synthetic),
        RelayEndpoint::new("United Kingdom", "GB", "🇬🇧", "proxy-uk.server.com", 8080, Europe, 60, Synthetic),
        RelayEndpoint::new("Germany", "DE", "🇩🇪", "proxy-de.server.com", 8080, Europe, 64, Synthetic),
        RelayEndpoint::new("Brazil", "BR", "🇧🇷", "proxy-br.server.com", 8080, Americas, 95, Synthetic),
        RelayEndpoint::new("Singapore", "SG", "🇸🇬", "proxy-sg.server.com", 8080, Asia, 89, Synthetic),
        RelayEndpoint::new("Netherlands", "NL", "🇳🇱", "proxy-nl.server.com", 8080, Europe, 72, Synthetic),
        RelayEndpoint::new("Canada", "CA", "🇨🇦", "proxy-ca.server.com", 8080, Americas, 68, Synthetic),
        RelayEndpoint::new("Australia", "AU", "🇦🇺", "proxy-au.server.com", 8080, Asia, 71, Synthetic),
        RelayEndpoint::new("France", "FR", "🇫🇷", "proxy-fr.server.com", 8080, Europe, 66, Synthetic),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_exactly_one_universal_relay() {
        let relays = default_relays();
        assert_eq!(relays.len(), 13);
        assert_eq!(relays.iter().filter(|r| r.is_universal()).count(), 1);
        assert!(relays[0].is_universal());
    }

    #[test]
    fn only_the_universal_relay_is_routable() {
        let routable: Vec<String> = default_relays()
            .into_iter()
            .filter(|r| r.is_routable())
            .map(|r| r.name)
            .collect();
        assert_eq!(routable, vec!["Global Fast Proxy"]);
    }

    #[test]
    fn origin_drops_default_https_port() {
        let relays = default_relays();
        assert_eq!(relays[0].origin(), "https://simple-proxy.reyamae14.workers.dev/");
        assert_eq!(relays[1].origin(), "https://proxy-hk.server.com:8080/");
    }
}
