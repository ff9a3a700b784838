/* Logger initialization */
use std::{panic, thread};

use tracing::{error, level_filters::LevelFilter};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{AppConfig, CargoEnv};

const LOG_DIRECTORY: &str = "logs";
const LOG_FILE_PREFIX: &str = "streamroute.log";

pub struct LoggerGuards {
    pub _tracing_guard: WorkerGuard,
    // none when no dsn is configured
    pub _sentry_guard: Option<sentry::ClientInitGuard>,
}

pub struct Logger {}

impl Logger {
    pub fn init(config: &AppConfig) -> LoggerGuards {
        // probe failures are logged at debug, so production keeps them around for when a relay
        // starts acting up
        let max_level = match config.cargo_env {
            CargoEnv::Development => LevelFilter::INFO,
            CargoEnv::Production => LevelFilter::DEBUG,
        };

        let (writer, guard) = match config.cargo_env {
            CargoEnv::Development => tracing_appender::non_blocking(std::io::stdout()),
            CargoEnv::Production => tracing_appender::non_blocking(
                tracing_appender::rolling::daily(LOG_DIRECTORY, LOG_FILE_PREFIX),
            ),
        };

        let sentry_guard = config.sentry_dsn.clone().map(|dsn| {
            sentry::init((
                dsn,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    environment: Some(Self::environment_name(config.cargo_env).into()),
                    attach_stacktrace: true,
                    ..Default::default()
                },
            ))
        });

        let registry = tracing_subscriber::registry()
            .with(max_level)
            .with(tracing_subscriber::fmt::layer().with_writer(writer));

        if sentry_guard.is_some() {
            registry.with(sentry_tracing::layer()).init();
        } else {
            registry.init();
        }

        Self::install_panic_hook();

        LoggerGuards {
            _tracing_guard: guard,
            _sentry_guard: sentry_guard,
        }
    }

    pub fn environment_name(cargo_env: CargoEnv) -> &'static str {
        match cargo_env {
            CargoEnv::Development => "development",
            CargoEnv::Production => "production",
        }
    }

    /// routes panics through tracing so they land in the same sink (and sentry) as everything else
    fn install_panic_hook() {
        panic::set_hook(Box::new(|info| {
            let thread = thread::current();
            let thread = thread.name().unwrap_or("unknown");

            let msg = match info.payload().downcast_ref::<&'static str>() {
                Some(s) => *s,
                None => match info.payload().downcast_ref::<String>() {
                    Some(s) => &**s,
                    None => "Box<Any>",
                },
            };

            let location = info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "<unknown>".to_string());

            // "notrace - " panics are expected enough that a backtrace is just noise
            match msg.strip_prefix("notrace - ") {
                Some(stripped) => error!(
                    target: "panic", "thread '{}' panicked at '{}': {}",
                    thread, stripped, location
                ),
                None => error!(
                    target: "panic", "thread '{}' panicked at '{}': {}\n{:?}",
                    thread,
                    msg,
                    location,
                    backtrace::Backtrace::new()
                ),
            }
        }));
    }
}
