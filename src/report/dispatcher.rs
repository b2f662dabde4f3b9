use super::render::ReportRenderer;
use super::sender::{OutgoingEmail, ReportSender, ResendSender};
use crate::config::ReportConfig;
use crate::store::RoastRecord;
use std::sync::Arc;
use tokio_util::task::TaskTracker;

/// Sends the full report after an email capture without blocking the caller.
///
/// Delivery runs on a tracked detached task. Failures are logged and dropped.
pub struct ReportDispatcher {
    sender: Option<Arc<dyn ReportSender>>,
    renderer: Arc<ReportRenderer>,
    tracker: TaskTracker,
}

impl ReportDispatcher {
    pub fn new(sender: Option<Arc<dyn ReportSender>>) -> anyhow::Result<Self> {
        Ok(Self {
            sender,
            renderer: Arc::new(ReportRenderer::new()?),
            tracker: TaskTracker::new(),
        })
    }

    pub fn from_config(config: &ReportConfig) -> anyhow::Result<Self> {
        let sender = config.delivery_key().map(|key| {
            Arc::new(ResendSender::new(key, config.endpoint.clone(), config.from.clone()))
                as Arc<dyn ReportSender>
        });
        if sender.is_none() {
            tracing::warn!("report delivery disabled: no RESEND_API_KEY configured");
        }
        Self::new(sender)
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Number of deliveries still in flight.
    pub fn pending(&self) -> usize {
        self.tracker.len()
    }

    /// Queue a report for `email`. Returns immediately.
    pub fn dispatch(&self, email: String, record: RoastRecord) {
        let Some(sender) = self.sender.clone() else {
            tracing::debug!(roast_id = %record.id, "report delivery disabled, skipping");
            return;
        };
        let renderer = Arc::clone(&self.renderer);

        self.tracker.spawn(async move {
            let roast_id = record.id.clone();
            match deliver(sender.as_ref(), &renderer, email, &record).await {
                Ok(message_id) => {
                    tracing::info!(roast_id = %roast_id, message_id = %message_id, "report sent");
                }
                Err(error) => {
                    tracing::warn!(roast_id = %roast_id, error = %error, "report delivery failed");
                }
            }
        });
    }

    /// Close the tracker and wait for in-flight deliveries.
    pub async fn shutdown(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

async fn deliver(
    sender: &dyn ReportSender,
    renderer: &ReportRenderer,
    to: String,
    record: &RoastRecord,
) -> anyhow::Result<String> {
    let rendered = renderer.render(record)?;
    let email = OutgoingEmail {
        to,
        subject: rendered.subject,
        html: rendered.html,
        text_attachment: rendered.text,
    };
    sender.send(&email).await
}
