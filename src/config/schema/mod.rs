mod capture;
mod core;
mod gateway;
mod llm;
mod observability;
mod report;
mod storage;

pub use capture::CaptureConfig;
pub use core::Config;
pub use gateway::GatewayConfig;
pub use llm::LlmConfig;
pub use observability::ObservabilityConfig;
pub use report::ReportConfig;
pub use storage::{DatabaseConfig, StorageBackend, StorageConfig, UploadConfig};
