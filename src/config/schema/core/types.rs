use super::super::{
    CaptureConfig, DatabaseConfig, GatewayConfig, LlmConfig, ObservabilityConfig, ReportConfig,
    StorageBackend, StorageConfig, UploadConfig,
};
use crate::error::RoastError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from the config location, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("."),
            config_path: PathBuf::from("config.toml"),
            gateway: GatewayConfig::default(),
            llm: LlmConfig::default(),
            capture: CaptureConfig::default(),
            storage: StorageConfig::default(),
            database: DatabaseConfig::default(),
            upload: UploadConfig::default(),
            report: ReportConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

fn is_blank(value: Option<&String>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

impl Config {
    /// Check every credential the gateway needs before serving requests.
    ///
    /// All missing settings are reported together so a single restart fixes
    /// the deployment.
    pub fn validate(&self) -> Result<(), RoastError> {
        let mut missing = Vec::new();

        if is_blank(self.llm.api_key.as_ref()) {
            missing.push("llm.api_key (OPENAI_API_KEY)");
        }
        if is_blank(self.capture.api_key.as_ref()) {
            missing.push("capture.api_key (SCREENSHOTAPI_KEY)");
        }
        if self.storage.backend == StorageBackend::Supabase {
            if is_blank(self.storage.supabase_url.as_ref()) {
                missing.push("storage.supabase_url (SUPABASE_URL)");
            }
            if is_blank(self.storage.supabase_key.as_ref()) {
                missing.push("storage.supabase_key (SUPABASE_ANON_KEY)");
            }
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(RoastError::configuration(format!(
                "missing required settings: {}",
                missing.join(", ")
            )))
        }
    }
}
