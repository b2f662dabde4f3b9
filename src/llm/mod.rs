// ── Infrastructure ───────────────────────────────────────────────────────────
pub mod factory;
pub mod traits;
pub mod types;

// ── Provider implementations ────────────────────────────────────────────────
pub mod openai;

// ── Re-exports ──────────────────────────────────────────────────────────────
pub use factory::create_provider;
pub use openai::OpenAiProvider;
pub use traits::{Provider, ProviderCapabilities};
pub use types::{
    ChatOptions, ContentBlock, ImageSource, ProviderMessage, ProviderResponse,
    ResponseFormat,
};
