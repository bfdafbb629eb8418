//! Gateway HTTP tests against local fake services.

use axum::extract::{Form, Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use lingo_common::chat::{ChatGateway, ChatTurn, GeminiChatClient};
use lingo_common::config::{ChatSettings, TranslationSettings};
use lingo_common::translate::{DeepLClient, TranslationGateway};
use lingo_common::GatewayError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
struct Captured {
    requests: Arc<Mutex<Vec<(HashMap<String, String>, Value)>>>,
}

impl Captured {
    fn take(&self) -> Vec<(HashMap<String, String>, Value)> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or("").to_string()))
        .collect()
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// Chat

async fn generate(
    State(captured): State<Captured>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let mut meta = header_map(&headers);
    meta.insert("call".to_string(), call);
    let input = body["contents"]
        .as_array()
        .and_then(|c| c.last())
        .and_then(|c| c["parts"][0]["text"].as_str())
        .unwrap_or("")
        .to_string();
    captured.requests.lock().unwrap().push((meta, body));

    match input.as_str() {
        "quota" => (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({"error": {"code": 429, "message": "Resource exhausted", "status": "RESOURCE_EXHAUSTED"}})),
        ),
        "silence" => (StatusCode::OK, Json(json!({"candidates": []}))),
        _ => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": format!("Echo: {}", input)}]}
                }]
            })),
        ),
    }
}

async fn chat_client() -> (Captured, GeminiChatClient) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v1beta/models/:call", post(generate))
        .with_state(captured.clone());
    let endpoint = serve(app).await;

    let settings = ChatSettings {
        endpoint,
        model: "tutor-1".to_string(),
        temperature: 0.3,
        max_tokens: 200,
        top_k: 16,
        top_p: 0.8,
        timeout_secs: Some(5),
    };
    (captured, GeminiChatClient::new(settings, "chat-secret").unwrap())
}

#[tokio::test]
async fn chat_sends_generation_config_and_key() {
    let (captured, client) = chat_client().await;
    let history = vec![ChatTurn::user("Hallo"), ChatTurn::tutor("Hallo! Wie geht's?")];

    let reply = client.send(&history, "Gut, danke").await.unwrap();
    assert_eq!(reply, "Echo: Gut, danke");

    let requests = captured.take();
    assert_eq!(requests.len(), 1);
    let (meta, body) = &requests[0];
    assert_eq!(meta["call"], "tutor-1:generateContent");
    assert_eq!(meta["x-goog-api-key"], "chat-secret");

    let config = &body["generationConfig"];
    assert_eq!(config["topK"], 16);
    assert_eq!(config["maxOutputTokens"], 200);
    assert!((config["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert!((config["topP"].as_f64().unwrap() - 0.8).abs() < 1e-6);

    let contents = body["contents"].as_array().unwrap();
    assert_eq!(contents.len(), 3);
    assert_eq!(contents[0]["role"], "user");
    assert_eq!(contents[1]["role"], "model");
}

#[tokio::test]
async fn chat_maps_error_status() {
    let (_captured, client) = chat_client().await;
    let err = client.send(&[], "quota").await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::UnexpectedStatus {
            status: 429,
            message: "Resource exhausted".to_string()
        }
    );
}

#[tokio::test]
async fn chat_empty_candidates() {
    let (_captured, client) = chat_client().await;
    let err = client.send(&[], "silence").await.unwrap_err();
    assert_eq!(err, GatewayError::EmptyResponse);
}

#[tokio::test]
async fn chat_unreachable_endpoint_is_request_failure() {
    let settings = ChatSettings {
        endpoint: "http://127.0.0.1:9".to_string(),
        timeout_secs: Some(2),
        ..ChatSettings::default()
    };
    let client = GeminiChatClient::new(settings, "key").unwrap();
    let err = client.send(&[], "hello").await.unwrap_err();
    assert!(matches!(err, GatewayError::RequestFailed(_)), "{:?}", err);
}

// Translation

async fn translate(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let meta = header_map(&headers);
    let text = form.get("text").cloned().unwrap_or_default();
    let target = form.get("target_lang").cloned().unwrap_or_default();
    captured
        .requests
        .lock()
        .unwrap()
        .push((meta.clone(), json!({"text": text, "target_lang": target})));

    if meta.get("authorization").map(String::as_str) != Some("Bearer deepl-secret") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"message": "Wrong endpoint. Use https://api.deepl.com"})),
        );
    }

    match (text.as_str(), target.as_str()) {
        ("good morning", "DE") => (
            StatusCode::OK,
            Json(json!({"translations": [{"detected_source_language": "EN", "text": "Guten Morgen"}]})),
        ),
        _ => (StatusCode::BAD_REQUEST, Json(json!({"message": "Value for 'target_lang' not supported."}))),
    }
}

async fn translation_endpoint() -> (Captured, String) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/v2/translate", post(translate))
        .with_state(captured.clone());
    let endpoint = serve(app).await;
    (captured, endpoint)
}

fn deepl(endpoint: &str, key: &str) -> DeepLClient {
    let settings = TranslationSettings {
        endpoint: endpoint.to_string(),
        timeout_secs: Some(5),
    };
    DeepLClient::new(settings, key).unwrap()
}

#[tokio::test]
async fn translation_posts_form_with_bearer_key() {
    let (captured, endpoint) = translation_endpoint().await;
    let client = deepl(&endpoint, "deepl-secret");

    let result = client.translate("good morning", "DE").await.unwrap();
    assert_eq!(result.text, "Guten Morgen");
    assert_eq!(result.detected_source_language.as_deref(), Some("EN"));

    let requests = captured.take();
    let (meta, form) = &requests[0];
    assert!(meta["content-type"].starts_with("application/x-www-form-urlencoded"));
    assert_eq!(form["text"], "good morning");
    assert_eq!(form["target_lang"], "DE");
}

#[tokio::test]
async fn translation_wrong_key_is_unexpected_status() {
    let (_captured, endpoint) = translation_endpoint().await;
    let client = deepl(&endpoint, "stale");

    let err = client.translate("good morning", "DE").await.unwrap_err();
    match err {
        GatewayError::UnexpectedStatus { status, message } => {
            assert_eq!(status, 403);
            assert!(message.starts_with("Wrong endpoint"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn translation_unsupported_target() {
    let (_captured, endpoint) = translation_endpoint().await;
    let client = deepl(&endpoint, "deepl-secret");

    let err = client.translate("good morning", "XX").await.unwrap_err();
    assert!(matches!(err, GatewayError::UnexpectedStatus { status: 400, .. }));
}
