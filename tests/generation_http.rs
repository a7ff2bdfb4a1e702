//! HTTP provider tests against a local stub server.
//!
//! Each test binds an axum router on an ephemeral port and points a
//! generator at it, so request shape, retry behavior and reply parsing are
//! exercised without a real upstream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use onpage::config::GenerationConfig;
use onpage::generation::{OllamaGenerator, OpenAIGenerator};
use onpage_core::{
    generate_rewrite_suggestions, suggest_keywords, ContentSnapshot, FocusKeyword,
    KeywordTemplates, SeoError, Tier, TextGenerator,
};

// ─── Stub Upstream ──────────────────────────────────────────────────

struct Stub {
    calls: AtomicUsize,
    /// Number of leading requests answered with `fail_status`.
    fail_first: usize,
    fail_status: StatusCode,
    reply: Value,
    last_auth: Mutex<Option<String>>,
    last_body: Mutex<Option<Value>>,
}

impl Stub {
    fn ok(reply: Value) -> Arc<Self> {
        Self::failing(0, StatusCode::OK, reply)
    }

    fn failing(fail_first: usize, fail_status: StatusCode, reply: Value) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail_first,
            fail_status,
            reply,
            last_auth: Mutex::new(None),
            last_body: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

async fn handle(State(stub): State<Arc<Stub>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let n = stub.calls.fetch_add(1, Ordering::SeqCst);
    *stub.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *stub.last_body.lock().unwrap() = Some(body);

    if n < stub.fail_first {
        return (stub.fail_status, "upstream says no").into_response();
    }
    Json(stub.reply.clone()).into_response()
}

/// Serve `stub` on `path` and return the server's base URL.
async fn serve(path: &str, stub: Arc<Stub>) -> String {
    let app = Router::new().route(path, post(handle)).with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn chat_completion(content: &str) -> Value {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}

fn config(url: String, max_retries: u32) -> GenerationConfig {
    GenerationConfig {
        provider: "openai".into(),
        model: Some("gpt-4o-mini".into()),
        url: Some(url),
        max_retries,
        timeout_secs: 5,
        ..GenerationConfig::default()
    }
}

fn snapshot() -> ContentSnapshot {
    ContentSnapshot::new("post-1", "Trail Running Shoes", "<p>Light shoes for rough ground.</p>")
        .with_excerpt("Our picks.")
}

const REWRITE_JSON: &str = r#"{
  "title": "Trail Running Shoes for Rough Ground",
  "meta_description": "  Light trail running shoes that grip.  ",
  "content_notes": ["Add a sizing section", "  "]
}"#;

// ─── OpenAI ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_openai_rewrite_success() {
    let stub = Stub::ok(chat_completion(REWRITE_JSON));
    let base = serve("/v1/chat/completions", stub.clone()).await;
    let generator = OpenAIGenerator::with_api_key(&config(format!("{}/v1/", base), 0), "sk-test").unwrap();

    let bundle = generate_rewrite_suggestions(&generator, &snapshot(), "trail running shoes")
        .await
        .unwrap();
    assert_eq!(bundle.title.as_deref(), Some("Trail Running Shoes for Rough Ground"));
    assert_eq!(
        bundle.meta_description.as_deref(),
        Some("Light trail running shoes that grip.")
    );
    assert_eq!(bundle.content_notes, vec!["Add a sizing section".to_string()]);

    assert_eq!(stub.calls(), 1);
    assert_eq!(stub.last_auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));
    let body = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(body["response_format"]["type"], "json_object");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("trail running shoes"));
}

#[tokio::test]
async fn test_openai_keyword_candidates() {
    let content = r#"{"candidates": [
        {"phrase": "trail running shoes", "score": 92.4, "tier": "primary"},
        {"phrase": "best trail shoes for mud", "score": 71, "tier": "long_tail"}
    ]}"#;
    let stub = Stub::ok(chat_completion(content));
    let base = serve("/v1/chat/completions", stub).await;
    let generator = OpenAIGenerator::with_api_key(&config(format!("{}/v1", base), 0), "k").unwrap();

    let candidates = suggest_keywords(&generator, &snapshot(), &KeywordTemplates::default())
        .await
        .unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].score, 92);
    assert_eq!(candidates[0].tier, Tier::Primary);
    assert_eq!(candidates[1].tier, Tier::LongTail);
}

#[tokio::test]
async fn test_openai_non_json_content_is_malformed() {
    let stub = Stub::ok(chat_completion("Sure! Here are some keywords: shoes, boots"));
    let base = serve("/v1/chat/completions", stub).await;
    let generator = OpenAIGenerator::with_api_key(&config(format!("{}/v1", base), 0), "k").unwrap();

    let err = generator.keyword_candidates(&snapshot()).await.unwrap_err();
    assert!(matches!(err, SeoError::MalformedUpstreamResponse(_)));

    // The suggestion engine falls back to the title templates.
    let candidates = suggest_keywords(&generator, &snapshot(), &KeywordTemplates::default())
        .await
        .unwrap();
    assert_eq!(candidates.len(), 5);
    assert_eq!(candidates[0].phrase, "Trail Running Shoes");
}

#[tokio::test]
async fn test_openai_client_error_is_not_retried() {
    let stub = Stub::failing(usize::MAX, StatusCode::BAD_REQUEST, Value::Null);
    let base = serve("/v1/chat/completions", stub.clone()).await;
    let generator = OpenAIGenerator::with_api_key(&config(format!("{}/v1", base), 3), "k").unwrap();

    let keyword = FocusKeyword::new("shoes").unwrap();
    let err = generator.rewrite(&snapshot(), &keyword).await.unwrap_err();
    assert!(matches!(err, SeoError::UpstreamUnavailable(_)));
    assert!(err.to_string().contains("400"));
    assert_eq!(stub.calls(), 1);
}

#[tokio::test]
async fn test_openai_server_error_is_retried() {
    let stub = Stub::failing(1, StatusCode::INTERNAL_SERVER_ERROR, chat_completion(REWRITE_JSON));
    let base = serve("/v1/chat/completions", stub.clone()).await;
    let generator = OpenAIGenerator::with_api_key(&config(format!("{}/v1", base), 1), "k").unwrap();

    let keyword = FocusKeyword::new("shoes").unwrap();
    let bundle = generator.rewrite(&snapshot(), &keyword).await.unwrap();
    assert!(bundle.title.is_some());
    assert_eq!(stub.calls(), 2);
}

#[tokio::test]
async fn test_openai_missing_choices_is_malformed() {
    let stub = Stub::ok(json!({ "id": "x", "choices": [] }));
    let base = serve("/v1/chat/completions", stub).await;
    let generator = OpenAIGenerator::with_api_key(&config(format!("{}/v1", base), 0), "k").unwrap();

    let keyword = FocusKeyword::new("shoes").unwrap();
    let err = generator.rewrite(&snapshot(), &keyword).await.unwrap_err();
    assert!(matches!(err, SeoError::MalformedUpstreamResponse(_)));
}

#[tokio::test]
async fn test_unreachable_upstream_is_unavailable() {
    // Bind then drop to get a port with nothing listening.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let generator =
        OpenAIGenerator::with_api_key(&config(format!("http://{}/v1", addr), 0), "k").unwrap();
    let keyword = FocusKeyword::new("shoes").unwrap();
    let err = generator.rewrite(&snapshot(), &keyword).await.unwrap_err();
    assert!(err.is_retryable());
}

// ─── Ollama ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ollama_rewrite_success() {
    let reply = json!({
        "model": "llama3.1",
        "message": { "role": "assistant", "content": REWRITE_JSON },
        "done": true
    });
    let stub = Stub::ok(reply);
    let base = serve("/api/chat", stub.clone()).await;
    let generator = OllamaGenerator::new(&GenerationConfig {
        provider: "ollama".into(),
        ..config(base, 0)
    })
    .unwrap();

    let bundle = generate_rewrite_suggestions(&generator, &snapshot(), "trail shoes")
        .await
        .unwrap();
    assert_eq!(bundle.content_notes.len(), 1);

    let body = stub.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["stream"], false);
    assert_eq!(body["format"], "json");
    assert!(stub.last_auth.lock().unwrap().is_none());
}
