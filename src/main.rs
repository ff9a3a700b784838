use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;

use tracing::info;

use streamroute::{AppConfig, ApplicationServer, Logger, RouteContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Arc::new(AppConfig::parse());

    // guards are kept alive to flush logs and keep sentry connected
    let _guards = Logger::init(&config);

    info!(
        "logger and env prepped, relay routing {}...",
        if config.relay_routing { "on" } else { "off" }
    );

    let services = RouteContext::new(config.clone())
        .await
        .context("failed to build route services")?;

    ApplicationServer::serve(config, services)
        .await
        .context("server failed to start")?;

    Ok(())
}
