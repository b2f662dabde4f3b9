use super::{AnalyzeUrlBody, AppState, CaptureEmailBody};
use crate::error::RoastError;
use crate::gating::{AnalyzeResponse, CaptureResponse, RoastView};
use crate::media::UploadMeta;
use axum::{
    extract::{
        Multipart, Path, State,
        multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

const UPLOAD_FIELD: &str = "screenshot";

impl IntoResponse for RoastError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "request failed");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

fn invalid_json_response(rejection: &JsonRejection) -> Response {
    tracing::debug!(error = %rejection, "invalid JSON body");
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": "Invalid JSON body"})),
    )
        .into_response()
}

/// GET / service banner
pub async fn handle_root() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "pageroast",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /api/analyze-url",
            "POST /api/analyze-screenshot",
            "POST /api/capture-email",
            "GET /api/roast/{id}",
            "GET /api/stats",
            "GET /health",
        ],
    }))
}

/// GET /health, always public
pub async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// POST /api/analyze-url
pub async fn handle_analyze_url(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeUrlBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_json_response(&rejection),
    };

    match state.workflow.analyze_url(body.url.as_deref()).await {
        Ok(analyzed) => Json::<AnalyzeResponse>(analyzed).into_response(),
        Err(error) => error.into_response(),
    }
}

/// POST /api/analyze-screenshot (multipart field `screenshot`)
pub async fn handle_analyze_screenshot(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "invalid multipart request");
            return RoastError::validation(format!(
                "Expected a multipart/form-data upload: {}",
                rejection.body_text()
            ))
            .into_response();
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                return RoastError::validation(format!("Invalid multipart body: {}", error.body_text()))
                    .into_response();
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(ToOwned::to_owned);
        let filename = field.file_name().map(ToOwned::to_owned);
        let data = match field.bytes().await {
            Ok(data) => data,
            Err(error) => {
                return RoastError::validation(format!("Invalid multipart body: {}", error.body_text()))
                    .into_response();
            }
        };
        let meta = UploadMeta {
            content_type: content_type.as_deref(),
            filename: filename.as_deref(),
        };

        return match state.workflow.analyze_upload(data.to_vec(), &meta).await {
            Ok(analyzed) => Json::<AnalyzeResponse>(analyzed).into_response(),
            Err(error) => error.into_response(),
        };
    }

    RoastError::validation("Screenshot file is required").into_response()
}

/// POST /api/capture-email
pub async fn handle_capture_email(
    State(state): State<AppState>,
    body: Result<Json<CaptureEmailBody>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return invalid_json_response(&rejection),
    };

    match state
        .workflow
        .capture_email(body.email.as_deref(), body.roast_id.as_deref())
        .await
    {
        Ok(captured) => Json::<CaptureResponse>(captured).into_response(),
        Err(error) => error.into_response(),
    }
}

/// GET /api/roast/{id}
pub async fn handle_get_roast(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.workflow.get_roast(&id).await {
        Ok(view) => Json::<RoastView>(view).into_response(),
        Err(error) => error.into_response(),
    }
}

/// GET /api/stats
pub async fn handle_stats(State(state): State<AppState>) -> Response {
    match state.workflow.total_roasts().await {
        Ok(total) => Json(serde_json::json!({ "totalRoasts": total })).into_response(),
        Err(error) => error.into_response(),
    }
}
