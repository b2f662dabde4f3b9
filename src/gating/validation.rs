use crate::error::RoastError;
use url::Url;

/// A target page accepted for capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    /// Exactly what the caller submitted, trimmed. Persisted on the record.
    pub submitted: String,
    /// Absolute URL handed to the screenshot service.
    pub capture: String,
}

/// Loose landing-page URL check: optional http(s) scheme, a dotted host
/// with an alphabetic top-level label, optional path.
pub fn validate_target_url(raw: Option<&str>) -> Result<TargetUrl, RoastError> {
    let submitted = raw.map(str::trim).unwrap_or_default();
    if submitted.is_empty() {
        return Err(RoastError::validation("URL is required"));
    }
    let invalid = || RoastError::validation("Invalid URL format");

    if submitted.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let capture = if submitted.contains("://") {
        submitted.to_string()
    } else {
        format!("https://{submitted}")
    };
    let parsed = Url::parse(&capture).map_err(|_| invalid())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid());
    }

    let host = parsed.host_str().ok_or_else(invalid)?;
    let (name, tld) = host.rsplit_once('.').ok_or_else(invalid)?;
    let tld_ok = (2..=63).contains(&tld.len()) && tld.chars().all(|c| c.is_ascii_alphabetic());
    if name.is_empty() || !tld_ok {
        return Err(invalid());
    }

    Ok(TargetUrl {
        submitted: submitted.to_string(),
        capture: parsed.to_string(),
    })
}

/// `local@domain.tld`: one `@`, no whitespace, a dot inside the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
        None => false,
    }
}
