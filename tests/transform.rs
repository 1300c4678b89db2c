use restyle::{GeminiEditor, ImageEditorExt, ImagePayload, RestyleError, StyleId};
use serde_json::{json, Value};
use std::error::Error as _;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

fn photo() -> ImagePayload {
    ImagePayload::new("/9j/4AAQSkZJRg==", "image/jpeg").unwrap()
}

fn editor_for(server: &MockServer) -> GeminiEditor {
    GeminiEditor::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .unwrap()
}

async fn mount_response(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn apply_style_returns_inline_image_as_data_uri() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        200,
        json!({
            "candidates": [{
                "content": {
                    "parts": [{"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}]
                },
                "finishReason": "STOP"
            }]
        }),
    )
    .await;

    let image = editor_for(&server)
        .apply_style(&photo(), StyleId::OilPainting)
        .await
        .unwrap()
        .expect("image in response");

    assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");

    let body = sent_body(&server).await;
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
    assert_eq!(parts[0]["inlineData"]["data"], "/9j/4AAQSkZJRg==");
    assert_eq!(parts[1]["text"], StyleId::OilPainting.instruction());
}

#[tokio::test]
async fn text_only_response_is_absent_not_an_error() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        200,
        json!({
            "candidates": [{
                "content": {"parts": [{"text": "I cannot edit this image."}]},
                "finishReason": "STOP"
            }]
        }),
    )
    .await;

    let result = editor_for(&server)
        .apply_style(&photo(), StyleId::Charcoal)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn first_inline_image_is_returned_after_text_parts() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        200,
        json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is the restyled photo."},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/2wBD"}},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                }
            }]
        }),
    )
    .await;

    let image = editor_for(&server)
        .apply_style(&photo(), StyleId::PopArt)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(image.to_data_uri(), "data:image/jpeg;base64,/9j/2wBD");
}

#[tokio::test]
async fn outfit_description_is_sent_verbatim() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        200,
        json!({
            "candidates": [{
                "content": {
                    "parts": [{"inlineData": {"mimeType": "image/png", "data": "AAAA"}}]
                }
            }]
        }),
    )
    .await;

    let description = "a navy double-breasted suit with brass buttons";
    let image = editor_for(&server)
        .apply_outfit_description(&photo(), description)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(image.mime_type(), "image/png");

    let body = sent_body(&server).await;
    let instruction = body["contents"][0]["parts"][1]["text"].as_str().unwrap();
    assert!(instruction.contains(description));
}

#[tokio::test]
async fn service_error_is_propagated() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        500,
        json!({"error": {"code": 500, "message": "Internal error encountered.", "status": "INTERNAL"}}),
    )
    .await;

    let err = editor_for(&server)
        .apply_style(&photo(), StyleId::Watercolor)
        .await
        .unwrap_err();

    match err {
        RestyleError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal error encountered.");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rejected_key_is_an_auth_error() {
    let server = MockServer::start().await;
    mount_response(
        &server,
        403,
        json!({"error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}}),
    )
    .await;

    let err = editor_for(&server)
        .apply_style(&photo(), StyleId::Pencil)
        .await
        .unwrap_err();
    assert!(matches!(err, RestyleError::Auth(ref m) if m == "API key not valid."));
}

#[tokio::test]
async fn non_json_success_body_is_unexpected_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>proxy</html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let err = editor_for(&server)
        .apply_style(&photo(), StyleId::Watercolor)
        .await
        .unwrap_err();

    match err {
        RestyleError::UnexpectedResponse(message) => {
            assert!(message.contains("<html>proxy</html>"), "got: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn transport_failure_preserves_cause() {
    // Grab a free port, then close it so the connection is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let editor = GeminiEditor::builder()
        .api_key("test-key")
        .base_url(format!("http://{addr}"))
        .build()
        .unwrap();

    let err = editor
        .apply_style(&photo(), StyleId::Cyberpunk)
        .await
        .unwrap_err();

    assert!(matches!(err, RestyleError::Network(_)));
    assert!(err.source().is_some(), "underlying cause should be kept");
}

#[tokio::test]
async fn health_check_reports_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models/not-a-model"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let editor = GeminiEditor::builder()
        .api_key("test-key")
        .model("not-a-model")
        .base_url(server.uri())
        .build()
        .unwrap();

    let err = editor.health_check().await.unwrap_err();
    assert!(matches!(err, RestyleError::InvalidRequest(_)));
}
