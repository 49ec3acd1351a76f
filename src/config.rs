use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub archives_url: String,      // template, `{user}`
    pub games_url: String,         // template, `{user}` `{year}` `{month}`
    pub time_classes: Vec<String>, // output order
    pub timezone: String,          // "UTC", "+05:30", "America/Denver"
    pub user_agent: String,
    pub timeout_secs: Option<u64>, // None = transport default
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archives_url: "https://api.chess.com/pub/player/{user}/games/archives".to_string(),
            games_url: "https://api.chess.com/pub/player/{user}/games/{year}/{month}".to_string(),
            time_classes: vec!["blitz".to_string(), "bullet".to_string(), "rapid".to_string()],
            timezone: "UTC".to_string(),
            user_agent: format!("chesstime/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Load `path`; a missing file yields the defaults, a broken one is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).with_context(|| format!("parsing {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("config: {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }
}
