//! Translation gateway - lookup backed by a third-party translation API.

use crate::config::TranslationSettings;
use crate::error::{GatewayError, LingoError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Display name to target-language code accepted by the service
const TARGET_CODES: &[(&str, &str)] = &[
    ("Arabic", "AR"),
    ("Bulgarian", "BG"),
    ("Chinese", "ZH"),
    ("Chinese (simplified)", "ZH-HANS"),
    ("Chinese (traditional)", "ZH-HANT"),
    ("Czech", "CS"),
    ("Danish", "DA"),
    ("Dutch", "NL"),
    ("English", "EN-GB"),
    ("English (American)", "EN-US"),
    ("English (British)", "EN-GB"),
    ("Estonian", "ET"),
    ("Finnish", "FI"),
    ("French", "FR"),
    ("German", "DE"),
    ("Greek", "EL"),
    ("Hungarian", "HU"),
    ("Indonesian", "ID"),
    ("Italian", "IT"),
    ("Japanese", "JA"),
    ("Korean", "KO"),
    ("Latvian", "LV"),
    ("Lithuanian", "LT"),
    ("Norwegian", "NB"),
    ("Polish", "PL"),
    ("Portuguese", "PT-PT"),
    ("Portuguese (Brazilian)", "PT-BR"),
    ("Portuguese (European)", "PT-PT"),
    ("Romanian", "RO"),
    ("Russian", "RU"),
    ("Slovak", "SK"),
    ("Slovenian", "SL"),
    ("Spanish", "ES"),
    ("Spanish (Latin American)", "ES-419"),
    ("Swedish", "SV"),
    ("Turkish", "TR"),
    ("Ukrainian", "UK"),
];

/// Target code for a language display name (case-insensitive)
pub fn target_code(language_name: &str) -> Option<&'static str> {
    let needle = language_name.trim();
    TARGET_CODES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(needle))
        .map(|(_, code)| *code)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
    pub detected_source_language: Option<String>,
}

#[async_trait]
pub trait TranslationGateway: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<Translation, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Form-encoded HTTP client for the translation service
pub struct DeepLClient {
    settings: TranslationSettings,
    api_key: String,
    client: reqwest::Client,
}

impl DeepLClient {
    pub fn new(settings: TranslationSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LingoError::Config("translation api key is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| LingoError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            settings,
            api_key,
            client,
        })
    }

    pub fn from_config(settings: &TranslationSettings, api_key: Option<&str>) -> Result<Self> {
        let key = api_key
            .ok_or_else(|| LingoError::Config("translation credentials not found".to_string()))?;
        Self::new(settings.clone(), key)
    }

    fn url(&self) -> String {
        format!("{}/v2/translate", self.settings.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl TranslationGateway for DeepLClient {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<Translation, GatewayError> {
        debug!("Translating {} chars to {}", text.chars().count(), target_lang);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(&self.api_key)
            .form(&[("text", text), ("target_lang", target_lang)])
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            warn!("Translation service returned {}: {}", status, message);
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        parse_translation(&body)
    }
}

pub(crate) fn parse_translation(body: &str) -> Result<Translation, GatewayError> {
    let parsed: TranslateResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
    parsed
        .translations
        .into_iter()
        .next()
        .ok_or(GatewayError::EmptyResponse)
}

/// Canned translations for tests, keyed by `(text, target_lang)`
#[derive(Default)]
pub struct FakeTranslationGateway {
    entries: HashMap<(String, String), String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl FakeTranslationGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, target_lang: &str, translated: &str) -> Self {
        self.entries.insert(
            (text.to_string(), target_lang.to_string()),
            translated.to_string(),
        );
        self
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TranslationGateway for FakeTranslationGateway {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<Translation, GatewayError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((text.to_string(), target_lang.to_string()));
        }

        self.entries
            .get(&(text.to_string(), target_lang.to_string()))
            .map(|t| Translation {
                text: t.clone(),
                detected_source_language: None,
            })
            .ok_or_else(|| GatewayError::UnexpectedStatus {
                status: 456,
                message: "no canned translation".to_string(),
            })
    }
}
