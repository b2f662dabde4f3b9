use super::openai::OpenAiProvider;
use super::traits::Provider;
use crate::config::LlmConfig;
use crate::error::RoastError;
use std::sync::Arc;

/// Trimmed key from config, `None` when absent or blank.
pub fn resolve_api_key(explicit_api_key: Option<&str>) -> Option<String> {
    explicit_api_key
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(ToOwned::to_owned)
}

/// Build the vision provider described by `config`.
///
/// Fails with a configuration error when no key is available so a broken
/// deployment surfaces at startup instead of on the first request.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn Provider>, RoastError> {
    let api_key = resolve_api_key(config.api_key.as_deref()).ok_or_else(|| {
        RoastError::configuration("OpenAI API key not set. Set OPENAI_API_KEY or edit config.toml.")
    })?;

    let provider = OpenAiProvider::new(
        Some(&api_key),
        config.chat_completions_url(),
        config.timeout_secs,
    );
    Ok(Arc::new(provider))
}
