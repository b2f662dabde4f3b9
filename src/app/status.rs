use pageroast::config::{Config, StorageBackend};

fn presence(value: Option<&String>) -> &'static str {
    if value.is_some_and(|v| !v.trim().is_empty()) {
        "set"
    } else {
        "missing"
    }
}

/// Human-readable configuration summary. Secrets are reported as set/missing only.
pub fn render_status(config: &Config) -> String {
    let mut lines = vec![
        "◆ pageroast".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Workspace   {}", config.workspace_dir.display()),
        format!("Config      {}", config.config_path.display()),
        String::new(),
        format!("  Gateway     {}:{}", config.gateway.host, config.gateway.port),
        format!("  CORS        {}", config.gateway.cors_origins.join(", ")),
        format!("  Model       {} ({})", config.llm.model, config.llm.base_url),
        format!("  Model key   {}", presence(config.llm.api_key.as_ref())),
        format!("  Capture key {}", presence(config.capture.api_key.as_ref())),
    ];

    match config.storage.backend {
        StorageBackend::Supabase => {
            lines.push(format!(
                "  Storage     supabase bucket={} url={} key={}",
                config.storage.bucket,
                config.storage.supabase_url.as_deref().unwrap_or("(unset)"),
                presence(config.storage.supabase_key.as_ref())
            ));
        }
        StorageBackend::Local => {
            lines.push(format!(
                "  Storage     local dir={}",
                config.storage.local_dir.clone().unwrap_or_else(|| {
                    config.workspace_dir.join("screenshots").display().to_string()
                })
            ));
        }
    }

    lines.push(format!(
        "  Reports     {}",
        if config.report.delivery_key().is_some() {
            "enabled"
        } else {
            "disabled"
        }
    ));
    lines.push(format!(
        "  Upload      max {} bytes, width <= {}px",
        config.upload.max_bytes, config.upload.max_width
    ));

    lines.join("\n")
}
