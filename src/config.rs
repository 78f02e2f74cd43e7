use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_TRELLO_URL: &str = "https://api.trello.com/1";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "temp";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub trello: TrelloConfig,
    pub openai: OpenAiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrelloConfig {
    pub api_key: Option<String>,
    pub token: Option<String>,
    /// Board used when a command doesn't name one.
    pub board_id: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            token: None,
            board_id: None,
            base_url: DEFAULT_TRELLO_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            base_url: DEFAULT_OPENAI_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("STORYBOARD_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".storyboard")
        .join("config.toml")
}

/// Resolve configuration from the config file and the process environment.
pub fn load_config() -> Result<AppConfig> {
    let mut config = read_config_file(&config_path())?;
    config.apply_env(|name| std::env::var(name).ok())?;
    Ok(config)
}

pub fn read_config_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    toml::from_str(&contents)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
}

impl AppConfig {
    /// Overlay environment variables, looked up through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = var("TRELLO_API_KEY") {
            self.trello.api_key = Some(v);
        }
        if let Some(v) = var("TRELLO_TOKEN") {
            self.trello.token = Some(v);
        }
        if let Some(v) = var("TRELLO_BOARD_ID") {
            self.trello.board_id = Some(v);
        }
        if let Some(v) = var("OPENAI_API_KEY") {
            self.openai.api_key = Some(v);
        }
        if let Some(v) = var("OPENAI_MODEL") {
            self.openai.model = v;
        }
        if let Some(v) = var("OPENAI_MAX_TOKENS") {
            self.openai.max_tokens = v
                .trim()
                .parse()
                .ok()
                .filter(|&n: &u32| n > 0)
                .ok_or_else(|| {
                    Error::config(format!("OPENAI_MAX_TOKENS must be a positive integer, got {v:?}"))
                })?;
        }
        if let Some(v) = var("STORYBOARD_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }
        Ok(())
    }
}
