use pageroast::config::{Config, StorageBackend};
use pageroast::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EMAILS_PATH: &str = "/emails";

/// Encode a blank PNG of the given size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::DynamicImage::new_rgb8(width, height);
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("png should encode");
    out.into_inner()
}

fn completion(content: &Value) -> Value {
    json!({
        "model": "gpt-4o",
        "choices": [{"message": {"role": "assistant", "content": content.to_string()}}],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50}
    })
}

pub fn teaser_body() -> Value {
    json!({"grade": "C-", "partialRoast": "Meh."})
}

pub fn full_body() -> Value {
    let dim = json!({"grade": "B", "critique": "Fine."});
    json!({
        "headline": dim,
        "valueProposition": dim,
        "visualHierarchy": dim,
        "cta": dim,
        "trustSignals": dim,
        "actionableRecommendations": ["Lead with the outcome", "Add a testimonial", "Shorten the form"]
    })
}

/// One mock server playing every external collaborator.
pub async fn mock_collaborators(report_status: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/screenshot"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(png_bytes(1440, 900)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("partialRoast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&teaser_body())))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("actionableRecommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&full_body())))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path_regex(r"^/storage/v1/object/landing-page-screenshots/.+$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Key": "ok"})))
        .mount(&server)
        .await;

    let report = if report_status < 300 {
        ResponseTemplate::new(report_status).set_body_json(json!({"id": "email-1"}))
    } else {
        ResponseTemplate::new(report_status).set_body_json(json!({"message": "provider down"}))
    };
    Mock::given(method("POST"))
        .and(path(EMAILS_PATH))
        .respond_with(report)
        .mount(&server)
        .await;

    server
}

pub struct GatewayTestServer {
    pub port: u16,
    pub mocks: MockServer,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _workspace: TempDir,
}

impl GatewayTestServer {
    pub async fn start() -> Self {
        Self::start_with_report_status(200).await
    }

    pub async fn start_with_report_status(report_status: u16) -> Self {
        let mocks = mock_collaborators(report_status).await;
        let workspace = TempDir::new().expect("temp workspace should be created");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config {
            workspace_dir: workspace.path().to_path_buf(),
            config_path: workspace.path().join("config.toml"),
            ..Config::default()
        };
        config.llm.api_key = Some("sk-test".into());
        config.llm.base_url = format!("{}/v1", mocks.uri());
        config.capture.api_key = Some("shot-test".into());
        config.capture.endpoint = format!("{}/screenshot", mocks.uri());
        config.storage.backend = StorageBackend::Supabase;
        config.storage.supabase_url = Some(mocks.uri());
        config.storage.supabase_key = Some("anon-test".into());
        config.database.url = Some("sqlite::memory:".into());
        config.report.api_key = Some("re_test".into());
        config.report.endpoint = format!("{}{EMAILS_PATH}", mocks.uri());

        let handle = tokio::spawn(async move {
            run_gateway_with_listener(listener, Arc::new(config), std::future::pending()).await
        });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            mocks,
            handle,
            _workspace: workspace,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }

    /// Requests the mock server received on `path`.
    pub async fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.mocks
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == path)
            .collect()
    }

    /// Report delivery is detached from the request, so poll for it.
    pub async fn wait_for_requests_to(&self, path: &str, count: usize) -> Vec<wiremock::Request> {
        for _ in 0..100 {
            let requests = self.requests_to(path).await;
            if requests.len() >= count {
                return requests;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.requests_to(path).await
    }

    pub async fn analyze_url(&self, client: &reqwest::Client, url: &str) -> Value {
        let response = client
            .post(self.url("/api/analyze-url"))
            .json(&json!({"url": url}))
            .send()
            .await
            .expect("analyze request should complete");
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.expect("analyze response should be json")
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..200 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if matches!(health, Ok(resp) if resp.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("gateway did not become ready on port {port}");
}
