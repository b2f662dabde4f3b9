use crate::gateway_harness::{GatewayTestServer, png_bytes};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

const UPLOAD_PREFIX: &str = "/storage/v1/object/landing-page-screenshots/";

fn screenshot_form(data: Vec<u8>, filename: &str, mime: &str) -> Form {
    Form::new().part(
        "screenshot",
        Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(mime)
            .expect("mime should parse"),
    )
}

async fn upload(server: &GatewayTestServer, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(server.url("/api/analyze-screenshot"))
        .multipart(form)
        .send()
        .await
        .expect("upload should complete")
}

async fn stored_image(server: &GatewayTestServer) -> image::DynamicImage {
    let requests = server.mocks.received_requests().await.unwrap_or_default();
    let stored = requests
        .iter()
        .find(|request| request.url.path().starts_with(UPLOAD_PREFIX))
        .expect("image should have been stored");
    image::load_from_memory(&stored.body).expect("stored bytes should decode")
}

#[tokio::test]
async fn upload_at_max_width_is_stored_unchanged() {
    let server = GatewayTestServer::start().await;
    let original = png_bytes(1920, 40);

    let response = upload(&server, screenshot_form(original.clone(), "shot.png", "image/png")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("analyze json");
    assert_eq!(body["grade"], "C-");
    assert!(body.get("fullRoast").is_none());

    let requests = server.mocks.received_requests().await.unwrap_or_default();
    let stored = requests
        .iter()
        .find(|request| request.url.path().starts_with(UPLOAD_PREFIX))
        .expect("image should have been stored");
    assert_eq!(stored.body, original);
}

#[tokio::test]
async fn wide_upload_is_downscaled_to_max_width() {
    let server = GatewayTestServer::start().await;

    let response = upload(&server, screenshot_form(png_bytes(1921, 1000), "wide.png", "image/png")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stored = stored_image(&server).await;
    assert_eq!(stored.width(), 1920);
    assert_eq!(stored.height(), 999);
}

#[tokio::test]
async fn oversize_upload_is_rejected() {
    let server = GatewayTestServer::start().await;
    let data = vec![0_u8; 5 * 1024 * 1024 + 1];

    let response = upload(&server, screenshot_form(data, "huge.png", "image/png")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error json");
    assert!(body["error"].as_str().expect("message").starts_with("File too large"));
    assert!(server.requests_to("/v1/chat/completions").await.is_empty());
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let server = GatewayTestServer::start().await;
    let response = upload(
        &server,
        screenshot_form(b"hello".to_vec(), "notes.txt", "text/plain"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["error"], "Only image files are allowed");
}

#[tokio::test]
async fn missing_screenshot_field_is_rejected() {
    let server = GatewayTestServer::start().await;
    let form = Form::new().text("comment", "forgot the file");

    let response = upload(&server, form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["error"], "Screenshot file is required");
}

#[tokio::test]
async fn non_multipart_request_gets_json_error() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/analyze-screenshot"))
        .header("content-type", "application/json")
        .body("{}")
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error body should be json");
    assert!(
        body["error"]
            .as_str()
            .expect("message")
            .starts_with("Expected a multipart/form-data upload")
    );
}
