use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Supabase,
    Local,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Supabase project URL, e.g. `https://abc.supabase.co`
    #[serde(default)]
    pub supabase_url: Option<String>,
    /// Supabase API key used for storage uploads.
    #[serde(default)]
    pub supabase_key: Option<String>,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Directory for the `local` backend (default: `<workspace>/screenshots`)
    #[serde(default)]
    pub local_dir: Option<String>,
    /// Public URL prefix for the `local` backend (default: `file://<local_dir>`)
    #[serde(default)]
    pub public_base_url: Option<String>,
}

fn default_bucket() -> String {
    "landing-page-screenshots".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            supabase_url: None,
            supabase_key: None,
            bucket: default_bucket(),
            local_dir: None,
            public_base_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DatabaseConfig {
    /// sqlx connection URL (default: `sqlite:<workspace>/roasts.db?mode=rwc`)
    #[serde(default)]
    pub url: Option<String>,
}

impl DatabaseConfig {
    pub fn resolved_url(&self, workspace_dir: &Path) -> String {
        self.url.clone().unwrap_or_else(|| {
            format!("sqlite:{}?mode=rwc", workspace_dir.join("roasts.db").display())
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
    /// Wider uploads are downscaled to this width.
    #[serde(default = "default_max_width")]
    pub max_width: u32,
}

fn default_max_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_max_width() -> u32 {
    1920
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            max_width: default_max_width(),
        }
    }
}
