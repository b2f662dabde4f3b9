use crate::gateway_harness::{EMAILS_PATH, GatewayTestServer};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn capture(
    server: &GatewayTestServer,
    client: &reqwest::Client,
    email: &str,
    roast_id: &str,
) -> reqwest::Response {
    client
        .post(server.url("/api/capture-email"))
        .json(&json!({"email": email, "roastId": roast_id}))
        .send()
        .await
        .expect("capture request should complete")
}

#[tokio::test]
async fn capture_unlocks_full_roast_idempotently() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let analyzed = server.analyze_url(&client, "example.com").await;
    let id = analyzed["roastId"].as_str().expect("roast id");

    let first = capture(&server, &client, "a@b.co", id).await;
    assert_eq!(first.status(), StatusCode::OK);
    let first: Value = first.json().await.expect("capture json");
    assert_eq!(first["success"], true);
    assert_eq!(first["fullRoast"]["headline"]["grade"], "B");
    assert_eq!(first["fullRoast"]["trustSignals"]["critique"], "Fine.");
    assert_eq!(
        first["fullRoast"]["actionableRecommendations"]
            .as_array()
            .expect("recommendations")
            .len(),
        3
    );

    let second: Value = capture(&server, &client, "a@b.co", id)
        .await
        .json()
        .await
        .expect("capture json");
    assert_eq!(second["fullRoast"], first["fullRoast"]);

    let view: Value = client
        .get(server.url(&format!("/api/roast/{id}")))
        .send()
        .await
        .expect("get roast should complete")
        .json()
        .await
        .expect("roast view json");
    assert_eq!(view["isEmailCaptured"], true);
    assert_eq!(view["fullRoast"], first["fullRoast"]);

    let emails = server.wait_for_requests_to(EMAILS_PATH, 2).await;
    assert_eq!(emails.len(), 2);
    let sent: Value = serde_json::from_slice(&emails[0].body).expect("email payload json");
    assert_eq!(sent["to"], json!(["a@b.co"]));
    assert_eq!(sent["subject"], "Your Landing Page Roast Report - Grade: C-");
    assert_eq!(sent["attachments"][0]["filename"], "roast-report.txt");
}

#[tokio::test]
async fn report_failure_does_not_affect_capture() {
    let server = GatewayTestServer::start_with_report_status(500).await;
    let client = reqwest::Client::new();
    let analyzed = server.analyze_url(&client, "example.com").await;
    let id = analyzed["roastId"].as_str().expect("roast id");

    let response = capture(&server, &client, "a@b.co", id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("capture json");
    assert_eq!(body["success"], true);
    assert!(body["fullRoast"].is_object());

    assert_eq!(server.wait_for_requests_to(EMAILS_PATH, 1).await.len(), 1);
}

#[tokio::test]
async fn capture_validates_before_touching_the_store() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/api/capture-email"))
        .json(&json!({"email": "a@b.co"}))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["error"], "Email and roastId are required");

    let response = capture(&server, &client, "a@b", "anything").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error json");
    assert_eq!(body["error"], "Invalid email format");

    let response = capture(&server, &client, "a@b.co", "missing-roast").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(server.requests_to(EMAILS_PATH).await.is_empty());
}
