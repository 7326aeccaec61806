pub mod content;
pub mod delivery;
pub mod request;

use crate::notify::content::ContentGenerator;
use crate::notify::delivery::{DeliveryClient, DeliveryOutcome};
use crate::notify::request::{validate_request, Language, NotificationKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What the rest of the application sees: a flag plus a short
/// human-readable message, never an internal error.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NotifyResult {
    pub success: bool,
    pub message: String,
}

impl NotifyResult {
    fn failure(message: String) -> NotifyResult {
        NotifyResult {
            success: false,
            message,
        }
    }
}

/// Runs one notification through validation, content generation, and
/// delivery. Stages run strictly in that order and the first failure ends
/// the pipeline; only the delivery stage has external side effects.
///
/// Invoking this twice with identical input may deliver two emails: no
/// idempotency key is attached to outgoing messages, so de-duplication is
/// the caller's responsibility.
pub async fn notify(
    kind: NotificationKind,
    payload: &Value,
    language: Language,
    generator: &dyn ContentGenerator,
    delivery: &DeliveryClient,
) -> NotifyResult {
    let request = match validate_request(payload, kind) {
        Ok(request) => request,
        Err(err) => {
            info!("Rejected a {} notification: {}", kind, err);
            return NotifyResult::failure(err.to_string());
        }
    };

    let message = match generator.generate(&request, language).await {
        Ok(message) => message,
        Err(err) => {
            warn!(
                "Could not generate content for a {} notification to {}: {}",
                kind,
                request.recipient(),
                err
            );
            return NotifyResult::failure(err.to_string());
        }
    };

    match delivery.send(&message).await {
        DeliveryOutcome::Sent {
            provider_message_id,
        } => {
            info!(
                "Sent a {} notification to {} (provider message {})",
                kind, message.recipient, provider_message_id
            );
            NotifyResult {
                success: true,
                message: format!("sent to {}", message.recipient),
            }
        }
        DeliveryOutcome::Failed { reason, retryable } => {
            warn!(
                "Could not deliver a {} notification to {} (retryable: {}): {}",
                kind, message.recipient, retryable, reason
            );
            NotifyResult::failure(reason)
        }
    }
}
