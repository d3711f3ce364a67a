use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::language::Language;

/// Instructions handed to the backend when the caller supplies none
pub const DEFAULT_INSTRUCTIONS: &str = "You are a professional translator. \
Translate the given text accurately while preserving its meaning, tone and formatting. \
Respond with the translation only, without explanations or commentary.";

/// Which capability implementation a façade is built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// OpenAI-compatible chat completions API (llama.cpp, Ollama, OpenAI, ...)
    #[default]
    OpenAi,
    /// No backend; every translation fails with an explanatory message
    None,
}

/// Backend configuration for OpenAI-compatible APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Per-request HTTP timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl BackendConfig {
    /// Create an OpenAI-compatible backend config
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            kind: BackendKind::OpenAi,
            api_base: api_base.into(),
            api_key,
            model: model.into(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
        }
    }

    /// Config that selects no backend at all
    pub fn disabled() -> Self {
        Self {
            kind: BackendKind::None,
            ..Self::default()
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:8080/v1".to_string()
}

fn default_model() -> String {
    "default_model".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

// Low temperature keeps translations consistent between calls
const fn default_temperature() -> f32 {
    0.3
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self::new(default_api_base(), None, default_model())
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Custom backend instructions (defaults to [`DEFAULT_INSTRUCTIONS`])
    pub instructions: Option<String>,

    /// Source language; `None` asks the backend to detect it
    pub source_lang: Option<Language>,

    /// Target language
    #[serde(default = "default_target_lang")]
    pub target_lang: Language,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendConfig,
}

const fn default_target_lang() -> Language {
    Language::English
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            instructions: None,
            source_lang: None,
            target_lang: default_target_lang(),
            backend: BackendConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&content)
    }

    /// Load from default locations (~/.config/polyglot/config.toml, ./config.toml)
    pub fn load() -> Self {
        // Try user config
        if let Some(user_config) = crate::util::user_config_path()
            && user_config.exists()
        {
            match Self::from_file(&user_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", user_config.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", user_config.display(), e);
                }
            }
        }

        // Try local config
        let local_config = std::path::PathBuf::from("config.toml");
        if local_config.exists() {
            match Self::from_file(&local_config) {
                Ok(config) => {
                    tracing::debug!("Loaded config from ./config.toml");
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load ./config.toml: {}", e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Instructions to hand to the backend
    pub fn instructions(&self) -> &str {
        self.instructions.as_deref().unwrap_or(DEFAULT_INSTRUCTIONS)
    }

    /// Reject values no backend could work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        };

        if self.instructions.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(invalid("instructions", "must not be blank"));
        }

        let backend = &self.backend;
        if backend.kind == BackendKind::OpenAi {
            if backend.api_base.trim().is_empty() {
                return Err(invalid("backend.api_base", "must not be empty"));
            }
            if backend.model.trim().is_empty() {
                return Err(invalid("backend.model", "must not be empty"));
            }
        }
        if backend.timeout_secs == 0 {
            return Err(invalid("backend.timeout_secs", "must be greater than zero"));
        }
        if !(0.0..=2.0).contains(&backend.temperature) {
            return Err(invalid("backend.temperature", "must be between 0.0 and 2.0"));
        }

        Ok(())
    }
}
