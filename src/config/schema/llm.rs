use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Vision model API key. `OPENAI_API_KEY` overrides this.
    #[serde(default)]
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL (default: `https://api.openai.com/v1`)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_teaser_max_tokens")]
    pub teaser_max_tokens: u32,
    #[serde(default = "default_full_max_tokens")]
    pub full_max_tokens: u32,
    /// Per model call timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Budget for downloading a remote image before analysis.
    #[serde(default = "default_image_fetch_timeout_secs")]
    pub image_fetch_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

fn default_teaser_max_tokens() -> u32 {
    500
}

fn default_full_max_tokens() -> u32 {
    2000
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_image_fetch_timeout_secs() -> u64 {
    15
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            teaser_max_tokens: default_teaser_max_tokens(),
            full_max_tokens: default_full_max_tokens(),
            timeout_secs: default_timeout_secs(),
            image_fetch_timeout_secs: default_image_fetch_timeout_secs(),
        }
    }
}

impl LlmConfig {
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
