use std::env;
use std::path::Path;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failed to read env file {path}: {message}")]
    EnvFile { path: String, message: String },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("base_url must start with http:// or https://, got {0:?}")]
    InvalidBaseUrl(String),

    #[error("model must not be empty")]
    EmptyModel,

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("max_tokens must be greater than zero")]
    ZeroMaxTokens,

    #[error("temperature must be within [0.0, 2.0], got {0}")]
    TemperatureOutOfRange(f32),
}

/// Connection settings for the local model server.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub base_url: String,
    pub model: String,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Config {
    /// Load from `./.env` when present, then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`Config::load`], reading the given env file instead of `./.env`.
    /// Variables already set in the process win over the file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        dotenv::from_path(path).map_err(|e| ConfigError::EnvFile {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(url) = lookup("EMAIL_CREW_BASE_URL") {
            cfg = cfg.with_base_url(url);
        }
        if let Some(model) = lookup("EMAIL_CREW_MODEL") {
            cfg = cfg.with_model(model);
        }
        if let Some(raw) = lookup("EMAIL_CREW_TIMEOUT_SECS") {
            cfg.timeout = parse_var("EMAIL_CREW_TIMEOUT_SECS", &raw)?;
        }
        if let Some(raw) = lookup("EMAIL_CREW_MAX_TOKENS") {
            cfg.max_tokens = parse_var("EMAIL_CREW_MAX_TOKENS", &raw)?;
        }
        if let Some(raw) = lookup("EMAIL_CREW_TEMPERATURE") {
            cfg.temperature = parse_var("EMAIL_CREW_TEMPERATURE", &raw)?;
        }

        Ok(cfg)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    /// Accepts LiteLLM-style ids such as `ollama/llama3.2`.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        let model = model.trim();
        self.model = model.strip_prefix("ollama/").unwrap_or(model).to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        if self.timeout == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ZeroMaxTokens);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::TemperatureOutOfRange(self.temperature));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: raw.to_string(),
    })
}
