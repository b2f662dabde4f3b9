use crate::utils::{build_client_with_timeout, error_from_response};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

const SEND_TIMEOUT_SECS: u64 = 30;
pub const ATTACHMENT_FILENAME: &str = "roast-report.txt";

/// One outbound message.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text_attachment: String,
}

/// Transactional email delivery.
pub trait ReportSender: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver `email`, returning the provider's message id.
    fn send<'a>(
        &'a self,
        email: &'a OutgoingEmail,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    attachments: Vec<ResendAttachment<'a>>,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

/// Resend `POST /emails` client.
pub struct ResendSender {
    cached_auth_header: String,
    endpoint: String,
    from: String,
    client: reqwest::Client,
}

impl ResendSender {
    pub fn new(api_key: &str, endpoint: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            cached_auth_header: format!("Bearer {api_key}"),
            endpoint: endpoint.into(),
            from: from.into(),
            client: build_client_with_timeout(SEND_TIMEOUT_SECS),
        }
    }

    async fn send_impl(&self, email: &OutgoingEmail) -> anyhow::Result<String> {
        let payload = ResendPayload {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            attachments: vec![ResendAttachment {
                filename: ATTACHMENT_FILENAME,
                content: BASE64.encode(email.text_attachment.as_bytes()),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.cached_auth_header)
            .json(&payload)
            .send()
            .await
            .map_err(|error| anyhow::anyhow!("Resend request failed: {error}"))?;

        if !response.status().is_success() {
            return Err(error_from_response("Resend", response).await);
        }

        let body: ResendResponse = response
            .json()
            .await
            .map_err(|error| anyhow::anyhow!("Resend response JSON decode failed: {error}"))?;
        Ok(body.id)
    }
}

impl ReportSender for ResendSender {
    fn name(&self) -> &str {
        "resend"
    }

    fn send<'a>(
        &'a self,
        email: &'a OutgoingEmail,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>> {
        Box::pin(self.send_impl(email))
    }
}
