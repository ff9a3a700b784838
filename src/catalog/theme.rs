use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME_ID: &str = "netflix";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub colors: ThemeColors,
    pub gradient: Option<String>,
}

impl Theme {
    fn new(id: &str, name: &str, [primary, secondary, accent, background, text]: [&str; 5]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            colors: ThemeColors {
                primary: primary.to_string(),
                secondary: secondary.to_string(),
                accent: accent.to_string(),
                background: background.to_string(),
                text: text.to_string(),
            },
            gradient: Some(format!(
                "linear-gradient(135deg, {} 0%, {} 100%)",
                primary, secondary
            )),
        }
    }

    /// the `--theme-*` custom properties the player page sets on its root element
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        let mut vars = vec![
            ("--theme-primary", self.colors.primary.clone()),
            ("--theme-secondary", self.colors.secondary.clone()),
            ("--theme-accent", self.colors.accent.clone()),
            ("--theme-background", self.colors.background.clone()),
            ("--theme-text", self.colors.text.clone()),
        ];
        if let Some(gradient) = &self.gradient {
            vars.push(("--theme-gradient", gradient.clone()));
        }
        vars
    }
}

pub fn default_themes() -> Vec<Theme> {
    vec![
        Theme::new("hexa-fire", "Hexa Fire", ["#FF6B35", "#FF8E53", "#FFB366", "#1A1A1A", "#FFFFFF"]),
        Theme::new("netflix", "Netflix", ["#E50914", "#B81D24", "#F40612", "#141414", "#FFFFFF"]),
        Theme::new("discord", "Discord", ["#5865F2", "#4752C4", "#7289DA", "#2C2F33", "#FFFFFF"]),
        Theme::new("github", "GitHub", ["#0969DA", "#0550AE", "#218BFF", "#0D1117", "#FFFFFF"]),
        Theme::new("spotify", "Spotify", ["#1DB954", "#1ED760", "#1AAE47", "#191414", "#FFFFFF"]),
        Theme::new("terminal", "Terminal", ["#00FF41", "#00D936", "#39FF14", "#0C0C0C", "#00FF41"]),
        Theme::new("dracula", "Dracula", ["#FF79C6", "#BD93F9", "#F8F8F2", "#282A36", "#F8F8F2"]),
        Theme::new("cyberpunk", "Cyberpunk", ["#00FFFF", "#FF00FF", "#FFFF00", "#0A0A0A", "#00FFFF"]),
    ]
}
