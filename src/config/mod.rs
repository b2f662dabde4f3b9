pub mod schema;

pub use schema::{
    CaptureConfig, Config, DatabaseConfig, GatewayConfig, LlmConfig, ObservabilityConfig,
    ReportConfig, StorageBackend, StorageConfig, UploadConfig,
};
