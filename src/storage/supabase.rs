use super::ObjectStore;
use crate::config::StorageConfig;
use crate::error::RoastError;
use crate::utils::{build_client_with_timeout, error_from_response};
use std::future::Future;
use std::pin::Pin;

const UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Supabase Storage REST backend.
pub struct SupabaseObjectStore {
    base_url: String,
    api_key: String,
    bucket: String,
    client: reqwest::Client,
}

impl SupabaseObjectStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            bucket: bucket.into(),
            client: build_client_with_timeout(UPLOAD_TIMEOUT_SECS),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, RoastError> {
        let url = config
            .supabase_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| RoastError::configuration("storage.supabase_url (SUPABASE_URL) is not set"))?;
        let key = config
            .supabase_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                RoastError::configuration("storage.supabase_key (SUPABASE_ANON_KEY) is not set")
            })?;
        Ok(Self::new(url, key, config.bucket.clone()))
    }

    fn upload_url(&self, key: &str) -> String {
        format!("{}/storage/v1/object/{}/{key}", self.base_url, self.bucket)
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{key}",
            self.base_url, self.bucket
        )
    }

    async fn put_impl(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, RoastError> {
        let response = self
            .client
            .post(self.upload_url(key))
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|error| RoastError::storage(format!("upload request failed: {error}")))?;

        if !response.status().is_success() {
            let error = error_from_response("Supabase Storage", response).await;
            return Err(RoastError::storage(error.to_string()));
        }

        Ok(self.public_url(key))
    }
}

impl ObjectStore for SupabaseObjectStore {
    fn name(&self) -> &str {
        "supabase"
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RoastError>> + Send + 'a>> {
        Box::pin(self.put_impl(key, bytes, content_type))
    }
}
