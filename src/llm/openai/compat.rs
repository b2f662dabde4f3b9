use super::types::{
    ChatRequest, ChatResponse, ContentPart, ImageUrlContent, Message, MessageContent,
    ResponseFormatSpec, Usage,
};
use crate::llm::types::{
    ChatOptions, ContentBlock, ProviderMessage, ProviderResponse, ResponseFormat,
};
use crate::utils::error_from_response;

pub(in crate::llm) fn map_provider_message(provider_message: &ProviderMessage) -> Message {
    let mut text_parts = Vec::new();
    let mut image_parts = Vec::new();

    for block in &provider_message.content {
        match block {
            ContentBlock::Text { text } => {
                text_parts.push(text.as_str());
            }
            ContentBlock::Image { source } => {
                image_parts.push(ContentPart::ImageUrl {
                    image_url: ImageUrlContent {
                        url: source.to_url(),
                    },
                });
            }
        }
    }

    let text = text_parts.join("\n");
    let content = if image_parts.is_empty() {
        MessageContent::Text(text)
    } else {
        let mut parts = Vec::with_capacity(image_parts.len() + 1);
        if !text.is_empty() {
            parts.push(ContentPart::Text { text });
        }
        parts.extend(image_parts);
        MessageContent::Parts(parts)
    };

    Message {
        role: "user",
        content,
    }
}

pub(in crate::llm) fn build_request(
    messages: &[ProviderMessage],
    options: &ChatOptions,
) -> ChatRequest {
    ChatRequest {
        model: options.model.clone(),
        messages: messages.iter().map(map_provider_message).collect(),
        max_tokens: options.max_tokens,
        temperature: options.temperature,
        response_format: match options.response_format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(ResponseFormatSpec {
                r#type: "json_object",
            }),
        },
    }
}

pub(in crate::llm) fn extract_text(
    chat_response: &ChatResponse,
    provider_name: &str,
) -> anyhow::Result<String> {
    chat_response
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("No response from {provider_name}"))
}

pub(in crate::llm) struct ChatCompletionsEndpoint<'a> {
    pub(in crate::llm) provider_name: &'a str,
    pub(in crate::llm) url: &'a str,
    pub(in crate::llm) missing_api_key_message: &'a str,
}

pub(in crate::llm) async fn send_chat_completions_json(
    client: &reqwest::Client,
    cached_auth_header: Option<&String>,
    request: &ChatRequest,
    endpoint: ChatCompletionsEndpoint<'_>,
) -> anyhow::Result<ChatResponse> {
    let auth_header = cached_auth_header
        .ok_or_else(|| anyhow::anyhow!("{}", endpoint.missing_api_key_message))?;

    let response = client
        .post(endpoint.url)
        .header("Authorization", auth_header)
        .json(request)
        .send()
        .await
        .map_err(|error| anyhow::anyhow!("{} request failed: {error}", endpoint.provider_name))?;

    if !response.status().is_success() {
        return Err(error_from_response(endpoint.provider_name, response).await);
    }

    let provider_name = endpoint.provider_name;
    response
        .json()
        .await
        .map_err(|error| anyhow::anyhow!("{provider_name} response JSON decode failed: {error}"))
}

fn provider_response_with_usage(text: String, usage: Option<&Usage>) -> ProviderResponse {
    if let Some(usage) = usage {
        ProviderResponse::with_usage(text, usage.prompt_tokens, usage.completion_tokens)
    } else {
        ProviderResponse::text_only(text)
    }
}

pub(in crate::llm) fn build_text_provider_response(
    chat_response: ChatResponse,
    provider_name: &str,
) -> anyhow::Result<ProviderResponse> {
    let text = extract_text(&chat_response, provider_name)?;
    let mut provider_response = provider_response_with_usage(text, chat_response.usage.as_ref());

    if let Some(api_model) = chat_response.model {
        provider_response = provider_response.with_model(api_model);
    }

    Ok(provider_response)
}
