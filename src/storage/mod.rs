//! Object Store Adapter: image bytes in, public URL out.

pub mod keys;
pub mod local;
pub mod supabase;

pub use keys::object_key;
pub use local::LocalObjectStore;
pub use supabase::SupabaseObjectStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::RoastError;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

/// Write-once blob storage. Existing keys are never overwritten.
pub trait ObjectStore: Send + Sync {
    fn name(&self) -> &str;

    /// Store `bytes` under `key` and return a publicly fetchable URL.
    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Vec<u8>,
        content_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RoastError>> + Send + 'a>>;
}

/// Store an image under a freshly generated key.
pub async fn store_image(
    store: &dyn ObjectStore,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, RoastError> {
    let key = object_key(content_type);
    let size = bytes.len();
    let url = store.put(&key, bytes, content_type).await?;
    tracing::info!(backend = store.name(), key = %key, bytes = size, "stored screenshot");
    Ok(url)
}

/// Build the configured backend.
pub fn create_object_store(
    config: &StorageConfig,
    workspace_dir: &Path,
) -> Result<Arc<dyn ObjectStore>, RoastError> {
    match config.backend {
        StorageBackend::Supabase => Ok(Arc::new(SupabaseObjectStore::from_config(config)?)),
        StorageBackend::Local => Ok(Arc::new(LocalObjectStore::from_config(
            config,
            workspace_dir,
        )?)),
    }
}
