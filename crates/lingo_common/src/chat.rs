//! Chat gateway - AI tutor backed by a cloud text-generation API.
//!
//! `GeminiChatClient` talks to a `generateContent` endpoint. `FakeChatGateway`
//! returns scripted replies for tests.

use crate::config::ChatSettings;
use crate::error::{GatewayError, LingoError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

/// Instruction sent with every conversation
pub const TUTOR_INSTRUCTION: &str = "You are a friendly language tutor. Answer in the language \
the learner is practising, keep replies short, and correct mistakes gently with a brief \
explanation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Tutor,
}

impl ChatRole {
    /// Role name on the wire
    fn api_role(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Tutor => "model",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn tutor(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tutor,
            text: text.into(),
        }
    }
}

#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send `input` after `history` and return the tutor's reply
    async fn send(&self, history: &[ChatTurn], input: &str) -> Result<String, GatewayError>;
}

// Wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// HTTP client for the text-generation service
pub struct GeminiChatClient {
    settings: ChatSettings,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiChatClient {
    pub fn new(settings: ChatSettings, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LingoError::Config("chat api key is empty".to_string()));
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

    /// Build from config plus an optional loaded credential
    pub fn from_config(settings: &ChatSettings, api_key: Option<&str>) -> Result<Self> {
        let key = api_key
            .ok_or_else(|| LingoError::Config("chat credentials not found".to_string()))?;
        Self::new(settings.clone(), key)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model
        )
    }

    fn build_request<'a>(&self, history: &'a [ChatTurn], input: &'a str) -> GenerateRequest<'a> {
        let mut contents: Vec<Content<'a>> = history
            .iter()
            .map(|turn| Content {
                role: Some(turn.role.api_role()),
                parts: vec![Part { text: &turn.text }],
            })
            .collect();
        contents.push(Content {
            role: Some(ChatRole::User.api_role()),
            parts: vec![Part { text: input }],
        });

        GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: TUTOR_INSTRUCTION,
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: self.settings.effective_temperature(),
                top_k: self.settings.top_k,
                top_p: self.settings.effective_top_p(),
                max_output_tokens: self.settings.max_tokens,
            },
        }
    }
}

#[async_trait]
impl ChatGateway for GeminiChatClient {
    async fn send(&self, history: &[ChatTurn], input: &str) -> Result<String, GatewayError> {
        let body = self.build_request(history, input);
        debug!(
            "Chat request to {} ({} prior turns)",
            self.settings.model,
            history.len()
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            warn!("Chat service returned {}: {}", status, message);
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                message,
            });
        }

        parse_reply(&text)
    }
}

/// Concatenate the text parts of the first candidate
pub(crate) fn parse_reply(body: &str) -> Result<String, GatewayError> {
    let parsed: GenerateResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

    let reply: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if reply.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(reply)
}

/// Scripted chat gateway for tests
pub struct FakeChatGateway {
    responses: Mutex<Vec<Result<String, GatewayError>>>,
    inputs: Mutex<Vec<String>>,
    histories: Mutex<Vec<Vec<ChatRole>>>,
}

impl FakeChatGateway {
    /// Replies are handed out in order; the last one repeats
    pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            inputs: Mutex::new(Vec::new()),
            histories: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: impl Into<String>) -> Self {
        Self::new(vec![Ok(reply.into())])
    }

    pub fn failing(error: GatewayError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Inputs received so far
    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().map(|i| i.clone()).unwrap_or_default()
    }

    /// Roles of the history sent with each request
    pub fn histories(&self) -> Vec<Vec<ChatRole>> {
        self.histories.lock().map(|h| h.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatGateway for FakeChatGateway {
    async fn send(&self, history: &[ChatTurn], input: &str) -> Result<String, GatewayError> {
        if let Ok(mut inputs) = self.inputs.lock() {
            inputs.push(input.to_string());
        }
        if let Ok(mut histories) = self.histories.lock() {
            histories.push(history.iter().map(|t| t.role).collect());
        }

        let mut responses = self
            .responses
            .lock()
            .map_err(|_| GatewayError::RequestFailed("fake gateway poisoned".to_string()))?;
        match responses.len() {
            0 => Err(GatewayError::EmptyResponse),
            1 => responses[0].clone(),
            _ => responses.remove(0),
        }
    }
}
