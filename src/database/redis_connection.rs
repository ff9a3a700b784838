use anyhow::Context;
use redis::Client;
use redis::aio::MultiplexedConnection;
use std::time::Instant;
use tracing::info;

/// thin wrapper so the connection can be cloned into whatever needs it
#[derive(Debug, Clone)]
pub struct RedisDatabase {
    pub connection: MultiplexedConnection,
}

impl RedisDatabase {
    pub async fn connect(connection_string: &str) -> anyhow::Result<Self> {
        let client = Client::open(connection_string).context("invalid redis url")?;

        let connection = client
            .get_multiplexed_tokio_connection()
            .await
            .context("could not reach redis")?;

        info!("redis connection established");

        Ok(Self { connection })
    }

    /// round trip of a PING in milliseconds
    pub async fn ping_ms(&self) -> anyhow::Result<f64> {
        let start = Instant::now();

        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .context("redis PING failed")?;

        Ok(start.elapsed().as_secs_f64() * 1000.0)
    }
}
