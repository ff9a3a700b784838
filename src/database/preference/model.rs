use anyhow::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// key the selected theme id is stored under
pub const THEME_PREFERENCE_KEY: &str = "video-player-theme";

pub type DynPreferenceStore = Arc<dyn PreferenceStore + Send + Sync>;

/// small key/value store for user preferences, only the theme uses it right now
#[async_trait::async_trait]
pub trait PreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// round trip in ms, `None` for stores that don't talk to anything
    async fn health_check(&self) -> Result<Option<f64>>;
}

/// default store when redis isn't configured, gone on restart
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn health_check(&self) -> Result<Option<f64>> {
        Ok(None)
    }
}
