//! Integration tests for [`ImageEditApi`] against an in-process HTTP
//! server.
//!
//! Each test binds an axum router to an ephemeral port and points the
//! client at one of its routes.

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use stager_core::compression::CompressedImage;
use stager_core::prompt::{build_prompt, ConversionMode, Prompt, Style};
use stager_imagegen::api::{GenerationError, ImageEditApi, ImageGenerator};
use stager_imagegen::config::GenerationConfig;
use tokio::sync::Mutex;

// ---------------------------------------------------------------------------
// Test server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
struct ReceivedField {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Debug, Default)]
struct Received {
    authorization: Option<String>,
    fields: Vec<ReceivedField>,
}

impl Received {
    fn field(&self, name: &str) -> Option<&ReceivedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn text(&self, name: &str) -> Option<String> {
        self.field(name)
            .map(|f| String::from_utf8_lossy(&f.data).into_owned())
    }
}

type Shared = Arc<Mutex<Received>>;

async fn record(shared: &Shared, headers: &HeaderMap, mut multipart: Multipart) {
    let mut received = shared.lock().await;
    received.authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.expect("field bytes").to_vec();
        received.fields.push(ReceivedField {
            name,
            file_name,
            content_type,
            data,
        });
    }
}

async fn ok_handler(
    State(shared): State<Shared>,
    headers: HeaderMap,
    multipart: Multipart,
) -> impl IntoResponse {
    record(&shared, &headers, multipart).await;
    // "PNGDATA" base64-encoded.
    Json(json!({ "created": 1, "data": [ { "b64_json": "UE5HREFUQQ==" } ] }))
}

async fn json_error_handler() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "message": "prompt rejected by safety filter" })),
    )
}

async fn plain_error_handler() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream unavailable")
}

async fn missing_data_handler() -> impl IntoResponse {
    Json(json!({ "created": 1, "data": [] }))
}

async fn bad_base64_handler() -> impl IntoResponse {
    Json(json!({ "data": [ { "b64_json": "***not base64***" } ] }))
}

async fn spawn_server() -> (String, Shared) {
    let shared: Shared = Arc::new(Mutex::new(Received::default()));
    let router = Router::new()
        .route("/ok", post(ok_handler))
        .route("/json-error", post(json_error_handler))
        .route("/plain-error", post(plain_error_handler))
        .route("/missing-data", post(missing_data_handler))
        .route("/bad-base64", post(bad_base64_handler))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });

    (format!("http://{addr}"), shared)
}

fn client_for(base: &str, route: &str) -> ImageEditApi {
    ImageEditApi::new(GenerationConfig::new(format!("{base}{route}"), "test-token"))
}

fn upload() -> CompressedImage {
    CompressedImage::new(b"\xFF\xD8\xFFfake-jpeg".to_vec(), "image/jpeg", "room.jpg")
}

fn modern_prompt() -> Prompt {
    build_prompt(ConversionMode::AddFurniture, Style::Modern, "", None, None)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn success_decodes_png_payload() {
    let (base, _) = spawn_server().await;
    let api = client_for(&base, "/ok");

    let image = api
        .generate(&upload(), &modern_prompt())
        .await
        .expect("generation should succeed");

    assert_eq!(image.bytes(), b"PNGDATA");
    assert_eq!(image.media_type(), "image/png");
    assert!(image.data_uri().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn request_carries_all_form_fields_and_bearer_token() {
    let (base, shared) = spawn_server().await;
    let api = client_for(&base, "/ok");
    let prompt = modern_prompt();

    api.generate(&upload(), &prompt).await.expect("generation");

    let received = shared.lock().await;
    assert_eq!(received.authorization.as_deref(), Some("Bearer test-token"));

    let image = received.field("image").expect("image field");
    assert_eq!(image.file_name.as_deref(), Some("room.jpg"));
    assert_eq!(image.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(image.data, b"\xFF\xD8\xFFfake-jpeg");

    assert_eq!(received.text("prompt").as_deref(), Some(prompt.as_str()));
    assert_eq!(received.text("model").as_deref(), Some("nano-banana"));
    assert_eq!(received.text("n").as_deref(), Some("1"));
    assert_eq!(received.text("response_format").as_deref(), Some("b64_json"));
}

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let (base, _) = spawn_server().await;
    let api = client_for(&base, "/json-error");

    let err = api.generate(&upload(), &modern_prompt()).await.unwrap_err();

    assert_matches!(
        &err,
        GenerationError::Api { status: 400, message } if message == "prompt rejected by safety filter"
    );
    assert!(err.is_transport());
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_message() {
    let (base, _) = spawn_server().await;
    let api = client_for(&base, "/plain-error");

    let err = api.generate(&upload(), &modern_prompt()).await.unwrap_err();

    assert_matches!(&err, GenerationError::Api { status: 503, .. });
    assert_eq!(err.to_string(), "API Error: 503");
}

#[tokio::test]
async fn success_without_image_is_malformed() {
    let (base, _) = spawn_server().await;
    let api = client_for(&base, "/missing-data");

    let err = api.generate(&upload(), &modern_prompt()).await.unwrap_err();

    assert_matches!(&err, GenerationError::MalformedResponse(msg) if msg == "no image data found");
    assert!(!err.is_transport());
}

#[tokio::test]
async fn undecodable_payload_is_malformed() {
    let (base, _) = spawn_server().await;
    let api = client_for(&base, "/bad-base64");

    let err = api.generate(&upload(), &modern_prompt()).await.unwrap_err();

    assert_matches!(err, GenerationError::MalformedResponse(_));
}

#[tokio::test]
async fn empty_prompt_rejected_before_sending() {
    let (base, shared) = spawn_server().await;
    let api = client_for(&base, "/ok");

    let err = api.generate(&upload(), &Prompt::empty()).await.unwrap_err();

    assert_matches!(err, GenerationError::EmptyPrompt);
    assert!(shared.lock().await.fields.is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_request_error() {
    // Bind then drop to obtain a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = ImageEditApi::new(GenerationConfig::new(format!("http://{addr}/edits"), "k"));
    let err = api.generate(&upload(), &modern_prompt()).await.unwrap_err();

    assert_matches!(err, GenerationError::Request(_));
}
