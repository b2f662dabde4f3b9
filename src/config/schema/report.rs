use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Send the full report by email after capture (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Resend API key. `RESEND_API_KEY` overrides this.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_from")]
    pub from: String,
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://api.resend.com/emails".into()
}

fn default_from() -> String {
    "Page Roast <onboarding@resend.dev>".into()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            endpoint: default_endpoint(),
            from: default_from(),
        }
    }
}

impl ReportConfig {
    /// Delivery runs only when enabled and a key is present.
    pub fn delivery_key(&self) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
