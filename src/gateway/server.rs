use super::handlers::{
    handle_analyze_screenshot, handle_analyze_url, handle_capture_email, handle_get_roast,
    handle_health, handle_root, handle_stats,
};
use super::{AppState, MAX_BODY_SIZE, REQUEST_TIMEOUT_SECS};

use crate::config::{Config, GatewayConfig};
use crate::gating::RoastWorkflow;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Returns true when the bind address is not a loopback address.
pub fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run_gateway(config: Arc<Config>) -> Result<()> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;

    // ── Security: refuse public bind without explicit opt-in ──
    if is_public_bind(&host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the API would be reachable from other machines.\n\
             Fix: use HOST=127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    run_gateway_with_listener(listener, config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

/// Serve from a pre-bound listener until `shutdown` resolves, then wait for
/// outstanding report deliveries.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("get gateway listener local address")?;

    let workflow = Arc::new(
        RoastWorkflow::from_config(&config)
            .await
            .context("initialize roast workflow")?,
    );
    let state = AppState {
        workflow: Arc::clone(&workflow),
    };

    print_gateway_banner(&local_addr.to_string(), workflow.reports().is_enabled());
    tracing::info!(addr = %local_addr, "gateway listening");

    let app = build_app(state, &config.gateway);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("serve HTTP gateway")?;

    let pending = workflow.reports().pending();
    if pending > 0 {
        tracing::info!(pending, "waiting for report deliveries");
    }
    workflow.reports().shutdown().await;
    Ok(())
}

fn print_gateway_banner(display_addr: &str, reports_enabled: bool) {
    println!("pageroast listening on {display_addr}");
    println!("  POST /api/analyze-url");
    println!("  POST /api/analyze-screenshot");
    println!("  POST /api/capture-email");
    println!("  GET  /api/roast/{{id}}");
    println!("  GET  /api/stats");
    println!("  GET  /health");
    if reports_enabled {
        println!("  Report emails enabled");
    } else {
        println!("  Report emails disabled (no RESEND_API_KEY)");
    }
}

fn build_cors(gateway: &GatewayConfig) -> Option<CorsLayer> {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if gateway.allows_any_origin() {
        return Some(base.allow_origin(Any));
    }
    if gateway.cors_origins.is_empty() {
        return None;
    }

    let origins: Vec<HeaderValue> = gateway
        .cors_origins
        .iter()
        .filter_map(|origin| {
            let parsed: Option<HeaderValue> = origin.trim().parse().ok();
            if parsed.is_none() {
                tracing::warn!(origin = %origin, "ignoring unparsable CORS origin");
            }
            parsed
        })
        .collect();
    Some(base.allow_origin(origins))
}

/// Assemble routes and middleware.
pub fn build_app(state: AppState, gateway: &GatewayConfig) -> Router {
    let api = Router::new()
        .route("/analyze-url", post(handle_analyze_url))
        .route("/analyze-screenshot", post(handle_analyze_screenshot))
        .route("/capture-email", post(handle_capture_email))
        .route("/roast/{id}", get(handle_get_roast))
        .route("/stats", get(handle_stats));

    let mut app = Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .nest("/api", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

    if let Some(cors) = build_cors(gateway) {
        app = app.layer(cors);
    }

    app
}
