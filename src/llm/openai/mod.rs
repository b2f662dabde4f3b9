pub(super) mod compat;
pub(super) mod types;

use crate::llm::traits::{Provider, ProviderCapabilities};
use crate::llm::types::{ChatOptions, ProviderMessage, ProviderResponse};
use crate::utils::build_client_with_timeout;
use compat as openai_compat;
use reqwest::Client;
use std::future::Future;
use std::pin::Pin;

const OPENAI_MISSING_API_KEY_MESSAGE: &str =
    "OpenAI API key not set. Set OPENAI_API_KEY or edit config.toml.";

/// Chat Completions client for OpenAI and wire-compatible endpoints.
pub struct OpenAiProvider {
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    chat_completions_url: String,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<&str>, chat_completions_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            chat_completions_url: chat_completions_url.into(),
            client: build_client_with_timeout(timeout_secs),
        }
    }

    async fn chat_impl(
        &self,
        messages: &[ProviderMessage],
        options: &ChatOptions,
    ) -> anyhow::Result<ProviderResponse> {
        let request = openai_compat::build_request(messages, options);
        let chat_response = openai_compat::send_chat_completions_json(
            &self.client,
            self.cached_auth_header.as_ref(),
            &request,
            openai_compat::ChatCompletionsEndpoint {
                provider_name: "OpenAI",
                url: &self.chat_completions_url,
                missing_api_key_message: OPENAI_MISSING_API_KEY_MESSAGE,
            },
        )
        .await?;
        openai_compat::build_text_provider_response(chat_response, "OpenAI")
    }
}

impl Provider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            vision: true,
            json_mode: true,
        }
    }

    fn chat<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        options: &'a ChatOptions,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ProviderResponse>> + Send + 'a>> {
        Box::pin(self.chat_impl(messages, options))
    }
}
