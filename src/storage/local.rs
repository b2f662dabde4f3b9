use super::ObjectStore;
use crate::config::StorageConfig;
use crate::error::RoastError;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::AsyncWriteExt;

/// Filesystem backend for development and self-hosting.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: PathBuf, public_base_url: Option<String>) -> Result<Self, RoastError> {
        std::fs::create_dir_all(&root).map_err(|error| {
            RoastError::storage(format!(
                "failed to create storage directory {}: {error}",
                root.display()
            ))
        })?;
        let public_base_url = public_base_url
            .unwrap_or_else(|| format!("file://{}", root.display()))
            .trim_end_matches('/')
            .to_string();
        Ok(Self {
            root,
            public_base_url,
        })
    }

    pub fn from_config(config: &StorageConfig, workspace_dir: &Path) -> Result<Self, RoastError> {
        let root = config
            .local_dir
            .as_deref()
            .map_or_else(|| workspace_dir.join("screenshots"), PathBuf::from);
        Self::new(root, config.public_base_url.clone())
    }

    async fn put_impl(&self, key: &str, bytes: Vec<u8>) -> Result<String, RoastError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(RoastError::storage(format!("invalid object key {key:?}")));
        }

        let path = self.root.join(key);
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|error| {
                if error.kind() == ErrorKind::AlreadyExists {
                    RoastError::storage(format!("object {key} already exists"))
                } else {
                    RoastError::storage(format!("failed to open {}: {error}", path.display()))
                }
            })?;
        file.write_all(&bytes)
            .await
            .map_err(|error| RoastError::storage(format!("failed to write {key}: {error}")))?;
        file.flush()
            .await
            .map_err(|error| RoastError::storage(format!("failed to flush {key}: {error}")))?;

        Ok(format!("{}/{key}", self.public_base_url))
    }
}

impl ObjectStore for LocalObjectStore {
    fn name(&self) -> &str {
        "local"
    }

    fn put<'a>(
        &'a self,
        key: &'a str,
        bytes: Vec<u8>,
        _content_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, RoastError>> + Send + 'a>> {
        Box::pin(self.put_impl(key, bytes))
    }
}
