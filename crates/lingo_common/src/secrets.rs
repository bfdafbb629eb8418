//! Runtime credentials for the chat and translation services.
//!
//! Each service has its own small TOML file holding `api_key = "..."`.
//! An environment variable takes precedence over the file. A missing or
//! malformed credential only disables the feature that needs it.

use crate::config::SecretsSettings;
use crate::error::{LingoError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const CHAT_KEY_ENV: &str = "LINGO_CHAT_API_KEY";
pub const TRANSLATION_KEY_ENV: &str = "LINGO_TRANSLATION_API_KEY";

#[derive(Debug, Deserialize)]
struct SecretFile {
    api_key: String,
}

/// Loaded credentials; `None` means the feature is unavailable
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub chat_api_key: Option<String>,
    pub translation_api_key: Option<String>,
}

impl Secrets {
    /// Load both credentials, logging (not failing) on problems
    pub fn load(settings: &SecretsSettings) -> Self {
        Self {
            chat_api_key: load_or_warn("chat", CHAT_KEY_ENV, &settings.chat_file),
            translation_api_key: load_or_warn(
                "translation",
                TRANSLATION_KEY_ENV,
                &settings.translation_file,
            ),
        }
    }
}

fn load_or_warn(feature: &str, env_var: &str, path: &Path) -> Option<String> {
    if let Ok(key) = env::var(env_var) {
        let key = key.trim().to_string();
        if !key.is_empty() {
            return Some(key);
        }
    }

    match read_api_key(path) {
        Ok(key) => Some(key),
        Err(e) => {
            warn!("{} disabled: {}", feature, e);
            None
        }
    }
}

/// Read `api_key` from a credential file
pub fn read_api_key(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).map_err(|e| {
        LingoError::Config(format!("cannot read credentials {}: {}", path.display(), e))
    })?;

    let file: SecretFile = toml::from_str(&content).map_err(|e| {
        LingoError::Config(format!("malformed credentials {}: {}", path.display(), e))
    })?;

    let key = file.api_key.trim();
    if key.is_empty() {
        return Err(LingoError::Config(format!(
            "empty api_key in {}",
            path.display()
        )));
    }
    Ok(key.to_string())
}
