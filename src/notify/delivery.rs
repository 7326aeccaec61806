use crate::error::HubmailError;
use crate::notify::content::GeneratedMessage;
use crate::server::config::HubmailConfigDelivery;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use url::Url;

/// The result of one delivery attempt. `retryable` is true only for
/// transient failures (rate limiting, transient provider or transport
/// faults); re-sending after a non-retryable failure will not help.
#[derive(Clone, Debug, PartialEq)]
pub enum DeliveryOutcome {
    Sent { provider_message_id: String },
    Failed { reason: String, retryable: bool },
}

/// Wraps the transactional email HTTP API. The client performs no retries;
/// retry policy belongs to the caller.
#[derive(Clone)]
pub struct DeliveryClient {
    api_url: Url,
    api_key: Option<String>,
    sender: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Deserialize)]
struct ProviderErrorResponse {
    message: String,
}

impl DeliveryClient {
    pub fn new(config: &HubmailConfigDelivery) -> Result<Self, HubmailError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| HubmailError::ConfigurationError {
                message: format!("unable to build delivery HTTP client: {}", err),
            })?;
        Ok(DeliveryClient {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
            client,
        })
    }

    fn send_url(&self) -> String {
        format!("{}/emails", self.api_url.as_str().trim_end_matches('/'))
    }

    /// Posts a generated message to the provider. Every failure mode maps to
    /// `DeliveryOutcome::Failed`; this never panics or returns an error.
    pub async fn send(&self, message: &GeneratedMessage) -> DeliveryOutcome {
        let api_key = match &self.api_key {
            Some(api_key) if !api_key.trim().is_empty() => api_key,
            _ => {
                warn!("Delivery API credential is not configured; refusing to send");
                return DeliveryOutcome::Failed {
                    reason: "delivery is not configured: missing API credential".to_string(),
                    retryable: false,
                };
            }
        };

        debug!("Posting message for {} to the delivery API", message.recipient);
        match self.post_email(api_key, message).await {
            Ok(response) => DeliveryOutcome::Sent {
                provider_message_id: response.id,
            },
            Err(HubmailError::DeliveryError {
                message: reason,
                retryable,
            }) => DeliveryOutcome::Failed { reason, retryable },
            Err(err) => DeliveryOutcome::Failed {
                reason: err.to_string(),
                retryable: false,
            },
        }
    }

    async fn post_email(
        &self,
        api_key: &str,
        message: &GeneratedMessage,
    ) -> Result<SendEmailResponse, HubmailError> {
        let request = SendEmailRequest {
            from: &self.sender,
            to: &message.recipient,
            subject: &message.subject,
            html: &message.body,
            text: None,
        };
        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| HubmailError::DeliveryError {
                message: format!("transport error: {}", err),
                retryable: true,
            })?;

        let status = response.status();
        if status.is_success() {
            // A 2xx with an unreadable body is resolved to a failure rather
            // than a "maybe sent" state.
            response
                .json::<SendEmailResponse>()
                .await
                .map_err(|err| HubmailError::DeliveryError {
                    message: format!(
                        "provider accepted the message but returned an unreadable response: {}",
                        err
                    ),
                    retryable: false,
                })
        } else {
            let reason = match response.json::<ProviderErrorResponse>().await {
                Ok(provider_error) => provider_error.message,
                Err(_) => format!("provider returned {}", status),
            };
            Err(HubmailError::DeliveryError {
                message: reason,
                retryable: retryable_status(status),
            })
        }
    }
}

fn retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
