use anyhow::{Context, Result};
use redis::AsyncCommands;
use std::sync::Arc;
use tracing::debug;

use super::model::PreferenceStore;
use crate::database::RedisDatabase;

pub struct RedisPreferenceStore {
    redis: Arc<RedisDatabase>,
}

impl RedisPreferenceStore {
    pub fn new(redis: Arc<RedisDatabase>) -> Self {
        Self { redis }
    }

    fn preference_key(key: &str) -> String {
        format!("preference:{}", key)
    }
}

#[async_trait::async_trait]
impl PreferenceStore for RedisPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.redis.connection.clone();
        let value: Option<String> = conn
            .get(Self::preference_key(key))
            .await
            .with_context(|| format!("failed to read preference {}", key))?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.redis.connection.clone();
        let _: () = conn
            .set(Self::preference_key(key), value)
            .await
            .with_context(|| format!("failed to write preference {}", key))?;
        debug!("stored preference {} = {}", key, value);
        Ok(())
    }

    async fn health_check(&self) -> Result<Option<f64>> {
        self.redis.ping_ms().await.map(Some)
    }
}
