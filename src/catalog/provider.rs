use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Tv,
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(ContentKind::Movie),
            "tv" => Ok(ContentKind::Tv),
            other => Err(format!("unknown content kind '{}'", other)),
        }
    }
}

/// what the user wants to watch, tv always needs season and episode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ContentRef {
    Movie { id: String },
    Tv { id: String, season: u32, episode: u32 },
}

impl ContentRef {
    pub fn movie(id: impl Into<String>) -> Self {
        ContentRef::Movie { id: id.into() }
    }

    pub fn tv(id: impl Into<String>, season: u32, episode: u32) -> Self {
        ContentRef::Tv {
            id: id.into(),
            season,
            episode,
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            ContentRef::Movie { .. } => ContentKind::Movie,
            ContentRef::Tv { .. } => ContentKind::Tv,
        }
    }

    /// path appended to a template, `900` or `1399/1/3`
    pub fn path_segments(&self) -> String {
        match self {
            ContentRef::Movie { id } => id.clone(),
            ContentRef::Tv {
                id,
                season,
                episode,
            } => format!("{}/{}/{}", id, season, episode),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingProvider {
    pub display_name: String,
    pub url_template: String,
    pub content_kind: ContentKind,
    /// false only for the legacy template that takes a bare id
    pub autoplay: bool,
}

impl StreamingProvider {
    fn new(display_name: &str, url_template: &str, content_kind: ContentKind) -> Self {
        Self {
            display_name: display_name.to_string(),
            url_template: url_template.to_string(),
            content_kind,
            autoplay: true,
        }
    }

    fn legacy(display_name: &str, url_template: &str, content_kind: ContentKind) -> Self {
        Self {
            autoplay: false,
            ..Self::new(display_name, url_template, content_kind)
        }
    }
}

/// every embed provider in picker order, the first one is the auto-load default
pub fn providers_for(kind: ContentKind) -> Vec<StreamingProvider> {
    match kind {
        ContentKind::Movie => vec![
            StreamingProvider::new("Vidora", "https://watch.vidora.su/watch/movie/", kind),
            StreamingProvider::new("Xprime", "https://xprime.tv/watch/", kind),
            StreamingProvider::new("Hexa", "https://hexa.watch/watch/movie/", kind),
            StreamingProvider::new("VidSrc", "https://vidsrc.cc/v3/embed/movie/", kind),
            StreamingProvider::legacy("Primary", "https://apimocine.vercel.app/movie/", kind),
            StreamingProvider::new("VidJoy", "https://vidjoy.pro/embed/movie/", kind),
            StreamingProvider::new("Player VidSrc", "https://player.vidsrc.co/embed/movie/", kind),
            StreamingProvider::new("Vidify", "https://vidify.top/embed/movie/", kind),
        ],
        ContentKind::Tv => vec![
            StreamingProvider::new("Vidora", "https://watch.vidora.su/watch/tv/", kind),
            StreamingProvider::new("Xprime", "https://xprime.tv/watch/", kind),
            StreamingProvider::new("Hexa", "https://hexa.watch/watch/tv/", kind),
            StreamingProvider::new("VidSrc", "https://vidsrc.cc/v3/embed/tv/", kind),
            StreamingProvider::legacy("Primary", "https://apimocine.vercel.app/tv/", kind),
            StreamingProvider::new("VidJoy", "https://vidjoy.pro/embed/tv/", kind),
            StreamingProvider::new("Player VidSrc", "https://player.vidsrc.co/embed/tv/", kind),
            StreamingProvider::new("Vidify", "https://vidify.top/embed/tv/", kind),
        ],
    }
}

pub fn find_provider(kind: ContentKind, display_name: &str) -> Option<StreamingProvider> {
    providers_for(kind)
        .into_iter()
        .find(|p| p.display_name.eq_ignore_ascii_case(display_name))
}
