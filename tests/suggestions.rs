use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
use chunk_tracker::handlers::{dismiss_suggestions, suggest};
use chunk_tracker::models::{AppData, SuggestionRequest};
use chunk_tracker::suggestions::{SuggestionClient, SuggestionConfig, SuggestionError};
use chunk_tracker::{AppState, KvStore};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Clone)]
struct Mock {
    status: StatusCode,
    text: String,
    delay: Duration,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn generate(State(mock): State<Mock>, headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    mock.seen.lock().await.push((key, body));
    sleep(mock.delay).await;

    let reply = json!({
        "candidates": [{ "content": { "parts": [{ "text": mock.text }] } }]
    });
    (mock.status, Json(reply))
}

async fn spawn_mock(status: StatusCode, text: &str) -> (String, Mock) {
    spawn_slow_mock(status, text, Duration::ZERO).await
}

async fn spawn_slow_mock(status: StatusCode, text: &str, delay: Duration) -> (String, Mock) {
    let mock = Mock {
        status,
        text: text.to_string(),
        delay,
        seen: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/v1beta/models/:call", post(generate))
        .with_state(mock.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), mock)
}

fn client_for(base_url: String) -> SuggestionClient {
    SuggestionClient::new(SuggestionConfig {
        api_key: Some("test-key".to_string()),
        model: "gemini-test".to_string(),
        base_url,
    })
}

#[tokio::test]
async fn returns_suggestions_from_structured_reply() {
    let (base_url, mock) = spawn_mock(
        StatusCode::OK,
        r#"{"suggestions": ["Learn three chords", "Practice 10 minutes", "Find a tutorial"]}"#,
    )
    .await;

    let suggestions = client_for(base_url).suggest("learn guitar").await.unwrap();
    assert_eq!(
        suggestions,
        ["Learn three chords", "Practice 10 minutes", "Find a tutorial"]
    );

    let seen = mock.seen.lock().await;
    assert_eq!(seen.len(), 1);
    let (key, body) = &seen[0];
    assert_eq!(key.as_deref(), Some("test-key"));
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("learn guitar"));
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn empty_reply_is_an_empty_list() {
    let (base_url, _mock) = spawn_mock(StatusCode::OK, "").await;
    let suggestions = client_for(base_url).suggest("learn guitar").await.unwrap();
    assert!(suggestions.is_empty());
}

#[tokio::test]
async fn prose_reply_is_an_error() {
    let (base_url, _mock) = spawn_mock(StatusCode::OK, "Here are a few ideas!").await;
    let err = client_for(base_url).suggest("learn guitar").await.unwrap_err();
    assert!(matches!(err, SuggestionError::InvalidResponse(_)));
}

#[tokio::test]
async fn service_failure_is_an_error() {
    let (base_url, _mock) = spawn_mock(StatusCode::INTERNAL_SERVER_ERROR, "").await;
    let err = client_for(base_url).suggest("learn guitar").await.unwrap_err();
    assert!(matches!(err, SuggestionError::Status { status: 500, .. }));
}

#[tokio::test]
async fn unreachable_service_is_an_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(format!("http://{addr}"))
        .suggest("learn guitar")
        .await
        .unwrap_err();
    assert!(matches!(err, SuggestionError::Request(_)));
}

fn state_for(base_url: String) -> AppState {
    let mut path = std::env::temp_dir();
    path.push(format!("chunk_tracker_suggest_{}.json", std::process::id()));
    AppState::new(KvStore::new(path), AppData::default(), client_for(base_url))
}

fn request(topic: &str) -> Json<SuggestionRequest> {
    Json(SuggestionRequest {
        topic: topic.to_string(),
    })
}

#[tokio::test]
async fn dismissed_request_comes_back_stale() {
    let (base_url, mock) = spawn_slow_mock(
        StatusCode::OK,
        r#"{"suggestions": ["Stretch for five minutes"]}"#,
        Duration::from_millis(300),
    )
    .await;
    let state = state_for(base_url);

    let pending = tokio::spawn(suggest(State(state.clone()), request("get flexible")));
    sleep(Duration::from_millis(50)).await;
    let dismissed = dismiss_suggestions(State(state.clone())).await;
    assert!(dismissed.0.suggestions.is_empty());

    let Json(response) = pending.await.unwrap().unwrap();
    assert!(response.stale);
    assert!(response.suggestions.is_empty());
    assert_eq!(mock.seen.lock().await.len(), 1);
}

#[tokio::test]
async fn newer_request_supersedes_the_older_one() {
    let (base_url, mock) = spawn_slow_mock(
        StatusCode::OK,
        r#"{"suggestions": ["Walk after lunch"]}"#,
        Duration::from_millis(300),
    )
    .await;
    let state = state_for(base_url);

    let first = tokio::spawn(suggest(State(state.clone()), request("move more")));
    sleep(Duration::from_millis(50)).await;
    let second = tokio::spawn(suggest(State(state.clone()), request("move more daily")));

    let Json(older) = first.await.unwrap().unwrap();
    assert!(older.stale);
    assert!(older.suggestions.is_empty());

    let Json(newer) = second.await.unwrap().unwrap();
    assert!(!newer.stale);
    assert_eq!(newer.suggestions, ["Walk after lunch"]);
    assert_eq!(mock.seen.lock().await.len(), 2);
}
