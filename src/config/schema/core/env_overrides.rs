use super::super::StorageBackend;
use super::Config;

fn first_non_empty(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

impl Config {
    /// Apply process environment variables on top of the loaded file.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. `PAGEROAST_*` names win over
    /// the conventional provider variable names.
    pub fn apply_env_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = first_non_empty(&lookup, &["PAGEROAST_LLM_API_KEY", "OPENAI_API_KEY"]) {
            self.llm.api_key = Some(key);
        }

        if let Some(model) = first_non_empty(&lookup, &["PAGEROAST_MODEL"]) {
            self.llm.model = model;
        }

        if let Some(key) = first_non_empty(
            &lookup,
            &["PAGEROAST_CAPTURE_API_KEY", "SCREENSHOTAPI_KEY"],
        ) {
            self.capture.api_key = Some(key);
        }

        if let Some(backend) = first_non_empty(&lookup, &["PAGEROAST_STORAGE_BACKEND"]) {
            match backend.to_ascii_lowercase().as_str() {
                "local" => self.storage.backend = StorageBackend::Local,
                "supabase" => self.storage.backend = StorageBackend::Supabase,
                other => tracing::warn!(backend = other, "ignoring unknown storage backend"),
            }
        }

        if let Some(url) = first_non_empty(&lookup, &["PAGEROAST_SUPABASE_URL", "SUPABASE_URL"]) {
            self.storage.supabase_url = Some(url);
        }

        if let Some(key) = first_non_empty(
            &lookup,
            &[
                "PAGEROAST_SUPABASE_KEY",
                "SUPABASE_SERVICE_ROLE_KEY",
                "SUPABASE_ANON_KEY",
            ],
        ) {
            self.storage.supabase_key = Some(key);
        }

        if let Some(key) = first_non_empty(&lookup, &["PAGEROAST_REPORT_API_KEY", "RESEND_API_KEY"])
        {
            self.report.api_key = Some(key);
        }

        if let Some(url) = first_non_empty(&lookup, &["PAGEROAST_DATABASE_URL", "DATABASE_URL"]) {
            self.database.url = Some(url);
        }

        if let Some(port) = first_non_empty(&lookup, &["PAGEROAST_GATEWAY_PORT", "PORT"])
            .and_then(|raw| raw.parse::<u16>().ok())
        {
            self.gateway.port = port;
        }

        if let Some(host) = first_non_empty(&lookup, &["PAGEROAST_GATEWAY_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Some(origins) = first_non_empty(&lookup, &["PAGEROAST_ALLOWED_ORIGINS", "ALLOWED_ORIGINS"])
        {
            self.gateway.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToOwned::to_owned)
                .collect();
        }

        if let Some(level) = first_non_empty(&lookup, &["PAGEROAST_LOG_LEVEL"]) {
            self.observability.log_level = level;
        }
    }
}
