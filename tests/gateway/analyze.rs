use crate::gateway_harness::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn analyze_url_returns_teaser_and_hides_full_roast() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let body = server.analyze_url(&client, "example.com").await;
    assert_eq!(body["grade"], "C-");
    assert_eq!(body["partialRoast"], "Meh.");
    assert!(body.get("fullRoast").is_none());

    let screenshot_url = body["screenshotUrl"].as_str().expect("screenshot url");
    assert!(screenshot_url.starts_with(&format!(
        "{}/storage/v1/object/public/landing-page-screenshots/",
        server.mocks.uri()
    )));
    assert!(screenshot_url.ends_with(".png"));

    let shots = server.requests_to("/screenshot").await;
    assert_eq!(shots.len(), 1);
    let query: Vec<(String, String)> = shots[0].url.query_pairs().into_owned().collect();
    assert!(query.contains(&("url".into(), "https://example.com/".into())));
    assert!(query.contains(&("width".into(), "1440".into())));
    assert!(query.contains(&("height".into(), "900".into())));

    assert_eq!(server.requests_to("/v1/chat/completions").await.len(), 2);
}

#[tokio::test]
async fn get_roast_before_capture_has_null_full_roast() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let analyzed = server.analyze_url(&client, "https://example.com/pricing").await;
    let id = analyzed["roastId"].as_str().expect("roast id");

    let response = client
        .get(server.url(&format!("/api/roast/{id}")))
        .send()
        .await
        .expect("get roast should complete");
    assert_eq!(response.status(), StatusCode::OK);
    let view: Value = response.json().await.expect("roast view json");

    assert_eq!(view["roastId"], id);
    assert_eq!(view["url"], "https://example.com/pricing");
    assert_eq!(view["grade"], "C-");
    assert_eq!(view["partialRoast"], "Meh.");
    assert_eq!(view["isEmailCaptured"], false);
    assert!(view["fullRoast"].is_null());
    assert!(view["createdAt"].is_string());
}

#[tokio::test]
async fn analyze_url_rejects_missing_and_malformed_urls() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    for (payload, message) in [
        (json!({}), "URL is required"),
        (json!({"url": "not a url"}), "Invalid URL format"),
        (json!({"url": "ftp://example.com"}), "Invalid URL format"),
    ] {
        let response = client
            .post(server.url("/api/analyze-url"))
            .json(&payload)
            .send()
            .await
            .expect("request should complete");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.expect("error json");
        assert_eq!(body["error"], message);
    }

    assert!(server.requests_to("/screenshot").await.is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/analyze-url"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_roast_is_not_found() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .get(server.url("/api/roast/does-not-exist"))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("error json");
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn stats_and_banner_are_served() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    server.analyze_url(&client, "example.com").await;

    let stats: Value = client
        .get(server.url("/api/stats"))
        .send()
        .await
        .expect("stats should complete")
        .json()
        .await
        .expect("stats json");
    assert_eq!(stats, json!({"totalRoasts": 1}));

    let banner: Value = client
        .get(server.url("/"))
        .send()
        .await
        .expect("banner should complete")
        .json()
        .await
        .expect("banner json");
    assert_eq!(banner["service"], "pageroast");
}
