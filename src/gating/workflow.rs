use super::validation::{is_valid_email, validate_target_url};
use super::views::{AnalyzeResponse, CaptureResponse, RoastView};
use crate::config::{Config, UploadConfig};
use crate::error::RoastError;
use crate::media::detection::detect_image_mime;
use crate::media::{ScreenshotApiClient, ScreenshotCapture, UploadMeta, prepare_upload};
use crate::report::ReportDispatcher;
use crate::roast::{CritiqueEngine, ImageInput};
use crate::storage::{ObjectStore, create_object_store, store_image};
use crate::store::{NewRoast, RoastStore, SqliteRoastStore};
use std::sync::Arc;

/// Ties capture, storage, critique and persistence into the teaser/full
/// disclosure protocol.
pub struct RoastWorkflow {
    capture: Arc<dyn ScreenshotCapture>,
    objects: Arc<dyn ObjectStore>,
    engine: Arc<CritiqueEngine>,
    store: Arc<dyn RoastStore>,
    reports: Arc<ReportDispatcher>,
    upload: UploadConfig,
}

/// Collaborators for [`RoastWorkflow::new`].
pub struct WorkflowParts {
    pub capture: Arc<dyn ScreenshotCapture>,
    pub objects: Arc<dyn ObjectStore>,
    pub engine: Arc<CritiqueEngine>,
    pub store: Arc<dyn RoastStore>,
    pub reports: Arc<ReportDispatcher>,
    pub upload: UploadConfig,
}

impl RoastWorkflow {
    pub fn new(parts: WorkflowParts) -> Self {
        Self {
            capture: parts.capture,
            objects: parts.objects,
            engine: parts.engine,
            store: parts.store,
            reports: parts.reports,
            upload: parts.upload,
        }
    }

    /// Validate configuration and build every collaborator once.
    pub async fn from_config(config: &Config) -> Result<Self, RoastError> {
        config.validate()?;

        let engine = CritiqueEngine::from_config(&config.llm)?;
        let objects = create_object_store(&config.storage, &config.workspace_dir)?;
        let store =
            SqliteRoastStore::connect(&config.database.resolved_url(&config.workspace_dir)).await?;
        let reports = ReportDispatcher::from_config(&config.report)?;

        Ok(Self::new(WorkflowParts {
            capture: Arc::new(ScreenshotApiClient::new(&config.capture)),
            objects,
            engine: Arc::new(engine),
            store: Arc::new(store),
            reports: Arc::new(reports),
            upload: config.upload.clone(),
        }))
    }

    pub fn reports(&self) -> &ReportDispatcher {
        &self.reports
    }

    /// Capture a live page, then run the shared analysis tail.
    pub async fn analyze_url(&self, raw_url: Option<&str>) -> Result<AnalyzeResponse, RoastError> {
        let target = validate_target_url(raw_url)?;
        tracing::info!(url = %target.submitted, "analyzing url");

        let shot = self.capture.capture(&target.capture).await?;
        let mime = detect_image_mime(&shot).unwrap_or("image/png");
        self.analyze_image(shot, mime, Some(target.submitted)).await
    }

    /// Validate (and possibly downscale) an upload, then analyze it.
    pub async fn analyze_upload(
        &self,
        data: Vec<u8>,
        meta: &UploadMeta<'_>,
    ) -> Result<AnalyzeResponse, RoastError> {
        tracing::info!(bytes = data.len(), "analyzing upload");
        let prepared = prepare_upload(data, meta, &self.upload).await?;
        let mime = prepared.mime;
        self.analyze_image(prepared.bytes, &mime, None).await
    }

    async fn analyze_image(
        &self,
        bytes: Vec<u8>,
        mime: &str,
        source_url: Option<String>,
    ) -> Result<AnalyzeResponse, RoastError> {
        let image_url = store_image(self.objects.as_ref(), bytes.clone(), mime).await?;

        // Both critiques finish before anything is persisted or returned.
        let analysis = self
            .engine
            .analyze(ImageInput::Bytes {
                data: bytes,
                mime: mime.to_string(),
            })
            .await?;

        let record = self
            .store
            .create(NewRoast {
                source_url,
                image_url,
                analysis,
            })
            .await?;
        Ok(AnalyzeResponse::from(&record))
    }

    /// Unlock the full critique for `roast_id`. Repeating the call is safe.
    pub async fn capture_email(
        &self,
        email: Option<&str>,
        roast_id: Option<&str>,
    ) -> Result<CaptureResponse, RoastError> {
        let email = email.map(str::trim).unwrap_or_default();
        let roast_id = roast_id.map(str::trim).unwrap_or_default();
        if email.is_empty() || roast_id.is_empty() {
            return Err(RoastError::validation("Email and roastId are required"));
        }
        if !is_valid_email(email) {
            return Err(RoastError::validation("Invalid email format"));
        }

        self.store.get(roast_id).await?;
        self.store.create_email_capture(roast_id, email).await?;
        self.store.mark_email_captured(roast_id).await?;
        let record = self.store.get(roast_id).await?;
        tracing::info!(roast_id, "email captured, full critique unlocked");

        let full_roast = record.full_critique.clone();
        self.reports.dispatch(email.to_string(), record);

        Ok(CaptureResponse {
            success: true,
            full_roast,
        })
    }

    pub async fn get_roast(&self, id: &str) -> Result<RoastView, RoastError> {
        let record = self.store.get(id).await?;
        Ok(RoastView::from(record))
    }

    pub async fn total_roasts(&self) -> Result<u64, RoastError> {
        self.store.count().await
    }
}
