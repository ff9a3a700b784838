use clap::ArgAction;

#[derive(clap::ValueEnum, Clone, Debug, Copy)]
pub enum CargoEnv {
    Development,
    Production,
}

#[derive(clap::Parser, Clone, Debug)]
pub struct AppConfig {
    // production or development
    #[clap(long, env, value_enum)]
    pub cargo_env: CargoEnv,

    // port that the app will bind to
    #[clap(long, env, default_value = "5000")]
    pub port: u16,

    // this should be either * for allowing everything, or a comma seperated list of domains like
    // example.com,something.com
    #[clap(long, env, default_value = "*")]
    pub cors_origin: String,

    // optional sentry integration
    #[clap(long, env)]
    pub sentry_dsn: Option<String>,

    // only the theme preference lives here, leave it empty to keep it in memory
    #[clap(long, env)]
    pub redis_url: Option<String>,

    // turn this off to always hand out direct provider urls
    #[clap(long, env, default_value_t = true, action = ArgAction::Set)]
    pub relay_routing: bool,

    #[clap(long, env, default_value = "2000")]
    pub relay_probe_timeout_ms: u64,

    #[clap(long, env, default_value = "1000")]
    pub server_probe_timeout_ms: u64,

    #[clap(long, env, default_value = "2000")]
    pub geolocation_timeout_ms: u64,

    // how many relays (after region ordering) get sampled per round
    #[clap(long, env, default_value = "13")]
    pub max_probe_candidates: usize,

    // overrides whatever the host says its timezone is, e.g. Europe/Berlin
    #[clap(long, env)]
    pub local_timezone: Option<String>,

    #[clap(long, env, default_value = "300")]
    pub time_sync_interval_secs: u64,
}

impl Default for AppConfig {
    // defaults aren't really needed here but it's here as a bad fallback
    fn default() -> Self {
        Self {
            cargo_env: CargoEnv::Development,
            port: 5000,
            cors_origin: "*".to_string(),
            sentry_dsn: None,
            redis_url: None,
            relay_routing: true,
            relay_probe_timeout_ms: 2000,
            server_probe_timeout_ms: 1000,
            geolocation_timeout_ms: 2000,
            max_probe_candidates: 13,
            local_timezone: None,
            time_sync_interval_secs: 300,
        }
    }
}
