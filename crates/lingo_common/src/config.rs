//! Lingo configuration
//!
//! Configuration lives in `$XDG_CONFIG_HOME/lingo/config.toml`. Every field
//! has a default, so a missing file or a partial file is fine. Credentials
//! are never stored here; see `secrets`.

use crate::error::{LingoError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "lingo";
const CONFIG_FILE: &str = "config.toml";

/// Who the first-launch profile is created for
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSettings {
    #[serde(default = "default_username")]
    pub username: String,

    /// Current language for a newly created profile
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_username() -> String {
    "learner".to_string()
}

fn default_language() -> String {
    "English".to_string()
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self {
            username: default_username(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Database file; defaults to the per-user data directory
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl StorageSettings {
    pub fn effective_db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("profile.db")
        })
    }
}

/// Text-generation parameters for the tutor chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_chat_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Request timeout; `None` keeps the HTTP client's default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_chat_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_chat_model() -> String {
    "gemini-pro".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

impl ChatSettings {
    /// Clamp temperature to 0.0-2.0 and top_p to 0.0-1.0
    pub fn effective_temperature(&self) -> f32 {
        self.temperature.clamp(0.0, 2.0)
    }

    pub fn effective_top_p(&self) -> f32 {
        self.top_p.clamp(0.0, 1.0)
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationSettings {
    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_translation_endpoint() -> String {
    "https://api-free.deepl.com".to_string()
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            endpoint: default_translation_endpoint(),
            timeout_secs: None,
        }
    }
}

/// Where the bundled credential files live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsSettings {
    #[serde(default = "default_chat_secret")]
    pub chat_file: PathBuf,

    #[serde(default = "default_translation_secret")]
    pub translation_file: PathBuf,
}

fn secrets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("secrets")
}

fn default_chat_secret() -> PathBuf {
    secrets_dir().join("chat.toml")
}

fn default_translation_secret() -> PathBuf {
    secrets_dir().join("translation.toml")
}

impl Default for SecretsSettings {
    fn default() -> Self {
        Self {
            chat_file: default_chat_secret(),
            translation_file: default_translation_secret(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LingoConfig {
    #[serde(default)]
    pub profile: ProfileSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub chat: ChatSettings,

    #[serde(default)]
    pub translation: TranslationSettings,

    #[serde(default)]
    pub secrets: SecretsSettings,

    #[serde(default)]
    pub log: LogConfig,
}

impl LingoConfig {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(CONFIG_FILE)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| LingoError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LingoError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = LingoConfig::parse("").unwrap();
        assert_eq!(config.profile.username, "learner");
        assert_eq!(config.profile.language, "English");
        assert_eq!(config.chat.model, "gemini-pro");
        assert_eq!(config.chat.top_k, 40);
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = LingoConfig::parse(
            r#"
            [chat]
            temperature = 0.2
            max_tokens = 256
            "#,
        )
        .unwrap();
        assert_eq!(config.chat.temperature, 0.2);
        assert_eq!(config.chat.max_tokens, 256);
        assert_eq!(config.chat.top_p, 0.95);
        assert_eq!(config.translation, TranslationSettings::default());
    }

    #[test]
    fn test_clamped_sampling_parameters() {
        let chat = ChatSettings {
            temperature: 9.0,
            top_p: -1.0,
            ..ChatSettings::default()
        };
        assert_eq!(chat.effective_temperature(), 2.0);
        assert_eq!(chat.effective_top_p(), 0.0);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = LingoConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.profile.username, "learner");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chat\nmodel = ").unwrap();
        assert!(matches!(LingoConfig::load(&path), Err(LingoError::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_keeps_db_path() {
        let mut config = LingoConfig::default();
        config.storage.db_path = Some(PathBuf::from("/tmp/lingo.db"));
        let text = config.to_toml().unwrap();
        let parsed = LingoConfig::parse(&text).unwrap();
        assert_eq!(parsed.storage.effective_db_path(), PathBuf::from("/tmp/lingo.db"));
    }
}
