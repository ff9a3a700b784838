use serde::{Deserialize, Serialize};

use crate::catalog::{ContentKind, ContentRef, Theme};
use crate::server::error::{AppResult, Error};
use crate::server::services::time_sync_services::TimeFormat;

/// content fields as they come in over query strings and bodies
#[derive(Debug, Clone, Deserialize)]
pub struct ContentQuery {
    pub id: String,
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl ContentQuery {
    /// tv without season/episode gets bounced here, the router itself never checks
    pub fn into_content_ref(self, kind: ContentKind) -> AppResult<ContentRef> {
        if self.id.trim().is_empty() {
            return Err(Error::BadRequest("id is required".to_string()));
        }

        match kind {
            ContentKind::Movie => Ok(ContentRef::movie(self.id)),
            ContentKind::Tv => match (self.season, self.episode) {
                (Some(season), Some(episode)) => Ok(ContentRef::tv(self.id, season, episode)),
                _ => Err(Error::BadRequest(
                    "tv content needs season and episode".to_string(),
                )),
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectRouteRequest {
    pub kind: ContentKind,
    /// picker name, leave it out for the default provider
    pub provider: Option<String>,
    #[serde(flatten)]
    pub content: ContentQuery,
    #[serde(default = "default_use_relay")]
    pub use_relay: bool,
}

fn default_use_relay() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetThemeRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeResponse {
    #[serde(flatten)]
    pub theme: Theme,
    pub css_variables: Vec<(String, String)>,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        let css_variables = theme
            .css_variables()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Self {
            theme,
            css_variables,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TimeQuery {
    #[serde(default)]
    pub format: TimeFormat,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeResponse {
    pub formatted: String,
    pub timezone: Option<String>,
    pub utc_offset_minutes: i32,
    pub synced: bool,
}
