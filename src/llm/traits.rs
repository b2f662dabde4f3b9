use super::types::{ChatOptions, ProviderMessage, ProviderResponse};
use std::future::Future;
use std::pin::Pin;

/// Provider capabilities reported at runtime.
#[derive(Debug, Clone, Default)]
pub struct ProviderCapabilities {
    pub vision: bool,
    pub json_mode: bool,
}

pub trait Provider: Send + Sync {
    /// Provider identifier (e.g. "openai").
    fn name(&self) -> &str;

    /// Runtime capability flags.
    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::default()
    }

    /// Single non-streaming completion over `messages`.
    fn chat<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        options: &'a ChatOptions,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>>;

    fn supports_vision(&self) -> bool {
        self.capabilities().vision
    }
}
