use crate::AppConfig;
use crate::app::create_app;
use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use solace_core::groq::GroqConfig;
use solace_core::provider::{ChatRequest, Provider, ProviderError, SpeechRequest, TranscriptionRequest};
use std::sync::Arc;
use test_log::test;
use tower::ServiceExt;

const BOUNDARY: &str = "x-test-boundary";

/// Deterministic provider: JSON-mode requests get a fixed sentiment
/// payload, plain chat a fixed reply, audio endpoints fixed outputs.
struct MockProvider;

#[async_trait]
impl Provider for MockProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, ProviderError> {
        if request.json_object {
            Ok(r#"{"mood": "content", "anxietyScore": 2}"#.to_owned())
        } else {
            Ok("A thoughtful reply.".to_owned())
        }
    }

    async fn transcribe(&self, _request: TranscriptionRequest) -> Result<String, ProviderError> {
        Ok("spoken note".to_owned())
    }

    async fn synthesize(&self, _request: SpeechRequest) -> Result<Vec<u8>, ProviderError> {
        Ok(vec![1, 2, 3, 4])
    }
}

/// Chat is down while transcription still works, as when only the
/// completion endpoint of the upstream misbehaves.
struct ChatOutageProvider;

#[async_trait]
impl Provider for ChatOutageProvider {
    async fn chat(&self, _request: ChatRequest) -> Result<String, ProviderError> {
        Err(ProviderError::EmptyResponse)
    }

    async fn transcribe(&self, _request: TranscriptionRequest) -> Result<String, ProviderError> {
        Ok("spoken note".to_owned())
    }

    async fn synthesize(&self, _request: SpeechRequest) -> Result<Vec<u8>, ProviderError> {
        Err(ProviderError::EmptyResponse)
    }
}

async fn test_app() -> Router {
    test_app_with(Arc::new(MockProvider)).await
}

async fn test_app_with(provider: Arc<dyn Provider>) -> Router {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let conn = Database::connect(options).await.unwrap();
    solace_db::schema::setup(&conn).await.unwrap();

    let groq = GroqConfig::builder().api_key("test-key").build();
    let app_config = AppConfig::new(&groq, "test-secret".to_owned(), 3600);
    create_app(app_config, &["http://localhost:5173".to_owned()], conn, provider).unwrap()
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Hand-rolled multipart encoder for test requests.
fn multipart_request(uri: &str, token: &str, parts: &[(&str, Option<(&str, &str)>, Vec<u8>)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, file, bytes) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file {
            Some((filename, mime_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {mime_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
            }
        }
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

async fn register(app: &Router, username: &str, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": username, "email": email, "password": "hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::CREATED, response.status());
    let body = read_json(response).await;
    body["access_token"].as_str().unwrap().to_owned()
}

#[test(tokio::test)]
async fn test_register_and_me() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("ada", body["username"]);
    assert_eq!(false, body["hasProfileImage"]);
}

#[test(tokio::test)]
async fn test_register_duplicate_email() {
    let app = test_app().await;
    register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "other", "email": "ada@example.com", "password": "hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
}

#[test(tokio::test)]
async fn test_login_wrong_password() {
    let app = test_app().await;
    register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[test(tokio::test)]
async fn test_login_issues_token() {
    let app = test_app().await;
    register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "ada@example.com", "password": "hunter2"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert_eq!("ada", body["user"]["username"]);
}

#[test(tokio::test)]
async fn test_journal_requires_auth() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(Request::get("/api/journals").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(StatusCode::UNAUTHORIZED, response.status());
}

#[test(tokio::test)]
async fn test_text_only_journal_round_trip() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/journals",
        &token,
        &[("textEntry", None, b"Today went better than expected.".to_vec())],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::CREATED, response.status());

    let body = read_json(response).await;
    assert_eq!("analyzed", body["analysisState"]);
    assert_eq!("content", body["textAnalysis"]["mood"]);
    assert_eq!(2.0, body["textAnalysis"]["anxietyScore"]);
    assert!(body["images"].as_array().unwrap().is_empty());
    assert!(body.get("audioAnalysis").is_none());
    assert!(body.get("visionAnalysis").is_none());

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/journals")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!(1, body.as_array().unwrap().len());
    assert_eq!("Today went better than expected.", body[0]["text"]);
}

#[test(tokio::test)]
async fn test_journal_with_audio_stores_transcription() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/journals",
        &token,
        &[
            ("textEntry", None, b"Recorded a voice note.".to_vec()),
            ("audio", Some(("note.webm", "audio/webm")), vec![0u8; 512]),
        ],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::CREATED, response.status());

    let body = read_json(response).await;
    assert_eq!("spoken note", body["audioAnalysis"]["transcription"]);
    assert_eq!("content", body["audioAnalysis"]["mood"]);
    assert_eq!("audio", body["audio"]["kind"]);
}

#[test(tokio::test)]
async fn test_journal_without_text_is_rejected() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/journals",
        &token,
        &[("images", Some(("pic.png", "image/png")), vec![1u8; 16])],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
}

#[test(tokio::test)]
async fn test_foreign_journal_entry_is_forbidden() {
    let app = test_app().await;
    let owner = register(&app, "ada", "ada@example.com").await;
    let other = register(&app, "bob", "bob@example.com").await;

    let request = multipart_request("/api/journals", &owner, &[("textEntry", None, b"private thoughts".to_vec())]);
    let response = app.clone().oneshot(request).await.unwrap();
    let body = read_json(response).await;
    let id = body["id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/journals/{id}"))
                .header(header::AUTHORIZATION, format!("Bearer {other}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::FORBIDDEN, response.status());

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/journals/{}", uuid::Uuid::new_v4()))
                .header(header::AUTHORIZATION, format!("Bearer {other}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::NOT_FOUND, response.status());
}

#[test(tokio::test)]
async fn test_journal_media_serves_stored_bytes() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/journals",
        &token,
        &[
            ("textEntry", None, b"with a picture".to_vec()),
            ("images", Some(("pic.png", "image/png")), vec![7u8; 32]),
        ],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let body = read_json(response).await;
    let id = body["id"].as_str().unwrap().to_owned();
    assert_eq!(1, body["images"].as_array().unwrap().len());

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/journals/{id}/media/image/0"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!("image/png", response.headers()[header::CONTENT_TYPE]);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(vec![7u8; 32], bytes.to_vec());
}

#[test(tokio::test)]
async fn test_journal_media_defaults_to_first_attachment() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/journals",
        &token,
        &[
            ("textEntry", None, b"with a recording".to_vec()),
            ("audio", Some(("note.webm", "audio/webm")), vec![9u8; 256]),
        ],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    let body = read_json(response).await;
    let id = body["id"].as_str().unwrap().to_owned();

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/journals/{id}/media/audio"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    assert_eq!("audio/webm", response.headers()[header::CONTENT_TYPE]);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(vec![9u8; 256], bytes.to_vec());
}

#[test(tokio::test)]
async fn test_journal_survives_analyzer_outage() {
    let app = test_app_with(Arc::new(ChatOutageProvider)).await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/journals",
        &token,
        &[
            ("textEntry", None, b"written during the outage".to_vec()),
            ("audio", Some(("note.webm", "audio/webm")), vec![0u8; 512]),
        ],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::CREATED, response.status());

    // The entry is stored without made-up sentiment values.
    let body = read_json(response).await;
    assert_eq!("written during the outage", body["text"]);
    assert!(body.get("textAnalysis").is_none());
    assert!(body.get("audioAnalysis").is_none());
    assert!(body.get("visionAnalysis").is_none());
    assert_eq!("audio", body["audio"]["kind"]);
}

#[test(tokio::test)]
async fn test_text_analysis_fails_loudly_during_outage() {
    let app = test_app_with(Arc::new(ChatOutageProvider)).await;
    let token = register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ai/text",
            Some(&token),
            json!({"text": "feeling alright"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::BAD_GATEWAY, response.status());
}

#[test(tokio::test)]
async fn test_standalone_text_analysis() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ai/text",
            Some(&token),
            json!({"text": "feeling alright"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("content", body["mood"]);
    assert_eq!(2.0, body["anxietyScore"]);
}

#[test(tokio::test)]
async fn test_positivity_chat_turns() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/positivity-chat")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("A thoughtful reply.", body["reply"]);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/positivity-chat",
            Some(&token),
            json!({"message": "hello", "history": [{"role": "assistant", "content": "hi"}]}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
}

#[test(tokio::test)]
async fn test_call_process_and_response() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/call/process",
        &token,
        &[("audio", Some(("turn.webm", "audio/webm")), vec![0u8; 512])],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("spoken note", body["transcript"]);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/call/response",
            Some(&token),
            json!({"message": "spoken note"}),
        ))
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("A thoughtful reply.", body["reply"]);
    assert_eq!(false, body["useBrowserTts"]);
    // base64 of the mock synthesis bytes
    assert_eq!("AQIDBA==", body["audio"]);
}

#[test(tokio::test)]
async fn test_call_process_rejects_tiny_recording() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let request = multipart_request(
        "/api/call/process",
        &token,
        &[("audio", Some(("turn.webm", "audio/webm")), vec![0u8; 10])],
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::BAD_REQUEST, response.status());
}

#[test(tokio::test)]
async fn test_status_reports_components() {
    let app = test_app().await;
    let response = app
        .clone()
        .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("ok", body["database"]);
    assert_eq!("ok", body["provider"]);
}

#[test(tokio::test)]
async fn test_profile_update_changes_username() {
    let app = test_app().await;
    let token = register(&app, "ada", "ada@example.com").await;

    let mut request = multipart_request("/api/auth/profile", &token, &[("username", None, b"lovelace".to_vec())]);
    *request.method_mut() = http::Method::PUT;
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(StatusCode::OK, response.status());
    let body = read_json(response).await;
    assert_eq!("lovelace", body["username"]);
}
