use std::sync::{Arc, Mutex, RwLock, Weak};
use tracing::{error, info, warn};

use crate::catalog::{DEFAULT_THEME_ID, Theme, default_themes};
use crate::database::preference::{DynPreferenceStore, THEME_PREFERENCE_KEY};
use crate::server::error::{AppResult, Error};

type ThemeListener = Arc<dyn Fn(&Theme) + Send + Sync>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<(u64, ThemeListener)>,
}

/// handle returned by `subscribe`, dropping it does nothing, call `unsubscribe`
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<ListenerRegistry>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(|p| p.into_inner());
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

pub struct ThemeService {
    themes: Vec<Theme>,
    current: RwLock<Theme>,
    store: DynPreferenceStore,
    registry: Arc<Mutex<ListenerRegistry>>,
}

impl ThemeService {
    /// restores the saved theme if there is one, otherwise netflix
    pub async fn load(store: DynPreferenceStore) -> Self {
        let themes = default_themes();

        let saved = match store.get(THEME_PREFERENCE_KEY).await {
            Ok(saved) => saved,
            Err(e) => {
                warn!("could not read saved theme, using default: {}", e);
                None
            }
        };

        let current = saved
            .and_then(|id| themes.iter().find(|t| t.id == id).cloned())
            .or_else(|| themes.iter().find(|t| t.id == DEFAULT_THEME_ID).cloned())
            .unwrap_or_else(|| themes[0].clone());

        info!("theme service ready, current theme {}", current.id);

        Self {
            themes,
            current: RwLock::new(current),
            store,
            registry: Arc::new(Mutex::new(ListenerRegistry::default())),
        }
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn current(&self) -> Theme {
        self.current
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Theme) + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(|p| p.into_inner());
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Arc::new(callback)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// switches theme, persists it and tells every subscriber in the order they subscribed
    pub async fn set_theme(&self, theme_id: &str) -> AppResult<Theme> {
        let theme = self
            .themes
            .iter()
            .find(|t| t.id == theme_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no theme called '{}'", theme_id)))?;

        *self.current.write().unwrap_or_else(|p| p.into_inner()) = theme.clone();

        // losing the preference isn't worth failing the switch over
        if let Err(e) = self.store.set(THEME_PREFERENCE_KEY, &theme.id).await {
            error!("failed to persist theme {}: {}", theme.id, e);
        }

        self.notify(&theme);
        Ok(theme)
    }

    fn notify(&self, theme: &Theme) {
        // snapshot so callbacks can unsubscribe without deadlocking
        let listeners: Vec<ThemeListener> = self
            .registry
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .listeners
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            listener(theme);
        }
    }
}
