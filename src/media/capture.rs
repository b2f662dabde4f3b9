use super::detection::detect_image_mime;
use crate::config::CaptureConfig;
use crate::error::RoastError;
use crate::utils::{build_client_with_timeout, sanitize_api_error};
use std::future::Future;
use std::pin::Pin;

/// Renders a live page into PNG bytes.
pub trait ScreenshotCapture: Send + Sync {
    fn capture<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RoastError>> + Send + 'a>>;
}

/// Client for a screenshotapi.net-style rendering endpoint.
pub struct ScreenshotApiClient {
    token: Option<String>,
    endpoint: String,
    viewport_width: u32,
    viewport_height: u32,
    client: reqwest::Client,
}

impl ScreenshotApiClient {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            token: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(ToOwned::to_owned),
            endpoint: config.endpoint.clone(),
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            client: build_client_with_timeout(config.timeout_secs),
        }
    }

    async fn capture_impl(&self, url: &str) -> Result<Vec<u8>, RoastError> {
        let token = self.token.as_deref().ok_or_else(|| {
            RoastError::capture("screenshot API key not set. Set SCREENSHOTAPI_KEY or edit config.toml.")
        })?;

        tracing::info!(url, "capturing screenshot");
        let width = self.viewport_width.to_string();
        let height = self.viewport_height.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("token", token),
                ("url", url),
                ("width", width.as_str()),
                ("height", height.as_str()),
                ("output", "image"),
                ("file_type", "png"),
                ("wait_for_event", "load"),
            ])
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    RoastError::capture("screenshot service timed out")
                } else {
                    RoastError::capture(format!("screenshot request failed: {error}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RoastError::capture(format!(
                "screenshot service returned {status}: {}",
                sanitize_api_error(&body)
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|error| RoastError::capture(format!("failed to read screenshot: {error}")))?;
        if detect_image_mime(&bytes).is_none() {
            return Err(RoastError::capture("screenshot service did not return an image"));
        }

        tracing::info!(bytes = bytes.len(), "screenshot captured");
        Ok(bytes.to_vec())
    }
}

impl ScreenshotCapture for ScreenshotApiClient {
    fn capture<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, RoastError>> + Send + 'a>> {
        Box::pin(self.capture_impl(url))
    }
}
