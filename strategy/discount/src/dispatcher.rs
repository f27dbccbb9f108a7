//! Multi-recipient alert dispatch.

use anyhow::Result;
use async_trait::async_trait;
use clients_telegrambot::TelegramBot;
use futures_util::future::join_all;
use tracing::{error, info, warn};

use crate::types::{DeliveryStatus, DispatchOutcome, DispatchSummary, Recipient};

/// Outbound messaging channel used to deliver alerts.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    async fn send(&self, recipient: &str, text: &str) -> Result<()>;
}

#[async_trait]
impl MessagingGateway for TelegramBot {
    async fn send(&self, recipient: &str, text: &str) -> Result<()> {
        self.send_message(recipient, text).await
    }
}

/// Telegram chat ids are signed integers; public channels may be addressed as `@name`.
pub fn is_valid_recipient(id: &str) -> bool {
    let id = id.trim();
    if utils::is_placeholder(id) {
        return false;
    }
    if let Some(name) = id.strip_prefix('@') {
        return (5..=32).contains(&name.len())
            && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    }
    id.parse::<i64>().is_ok()
}

/// Sends `message` to every recipient concurrently and waits for all of them.
///
/// Invalid recipients are skipped without a network call. A failure for one
/// recipient never affects the others, and nothing is retried.
pub async fn dispatch<G>(gateway: &G, message: &str, recipients: &[Recipient]) -> DispatchSummary
where
    G: MessagingGateway + ?Sized,
{
    let sends = recipients.iter().map(|recipient| async move {
        if !is_valid_recipient(recipient.as_str()) {
            warn!(recipient = %recipient, "Skipping invalid recipient");
            return DispatchOutcome {
                recipient: recipient.clone(),
                status: DeliveryStatus::SkippedInvalid,
            };
        }

        let status = match gateway.send(recipient.as_str().trim(), message).await {
            Ok(()) => {
                info!(recipient = %recipient, "Notification sent");
                DeliveryStatus::Sent
            }
            Err(e) => {
                let reason = format!("{e:#}");
                error!(recipient = %recipient, error = %reason, "Failed to send notification");
                DeliveryStatus::Failed { reason }
            }
        };
        DispatchOutcome {
            recipient: recipient.clone(),
            status,
        }
    });

    DispatchSummary::from_outcomes(join_all(sends).await)
}
