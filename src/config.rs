use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use url::Url;

pub const DEFAULT_FEED_URL: &str = "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Extra entry for the model menu, appended after the built-in table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelEntry {
    pub label: String,
    pub id: String,
    #[serde(default = "default_true")]
    pub temperature: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed_url: String,
    pub api_base: String,
    pub header: Option<String>,
    pub default_model: Option<String>,
    pub temperature: f64,
    pub open_command: Option<String>,
    pub log_level: String,
    pub models: Vec<ModelEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: DEFAULT_FEED_URL.into(),
            api_base: DEFAULT_API_BASE.into(),
            header: None,
            default_model: None,
            temperature: DEFAULT_TEMPERATURE,
            open_command: None,
            log_level: "warn".into(),
            models: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let parsed: AppConfig = toml::from_str(txt).context("failed to parse toml")?;
        parsed.validate()?;
        Ok(parsed)
    }

    fn validate(&self) -> Result<()> {
        Url::parse(&self.feed_url)
            .with_context(|| format!("invalid feed_url: {}", self.feed_url))?;
        Url::parse(&self.api_base)
            .with_context(|| format!("invalid api_base: {}", self.api_base))?;
        if !(0.0..=1.0).contains(&self.temperature) {
            bail!("temperature must be between 0.0 and 1.0, got {}", self.temperature);
        }
        for m in &self.models {
            if m.label.trim().is_empty() || m.id.trim().is_empty() {
                bail!("model entries need a non-empty label and id");
            }
        }
        Ok(())
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::WARN)
    }
}

pub fn load(config_override: Option<String>) -> Result<AppConfig> {
    if let Some(path_str) = config_override {
        let p = PathBuf::from(&path_str);
        if !p.is_file() {
            bail!("config file not found: {}", path_str);
        }
        return read_file(&p);
    }

    if let Some(path) = default_config_path() {
        if path.is_file() {
            return read_file(&path);
        }
    }

    Ok(AppConfig::default())
}

fn read_file(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    AppConfig::from_toml_str(&txt).with_context(|| format!("in {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    let mut p = if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg)
    } else {
        let mut p = PathBuf::from(env::var("HOME").ok()?);
        p.push(".config");
        p
    };
    p.push("headline-check");
    p.push("config.toml");
    Some(p)
}
