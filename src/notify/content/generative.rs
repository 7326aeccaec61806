use crate::error::HubmailError;
use crate::notify::content::{finalize_message, ContentGenerator, GeneratedMessage};
use crate::notify::request::{Language, NotificationRequest};
use crate::server::config::HubmailConfigGeneration;
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use url::Url;

const SYSTEM_INSTRUCTIONS: &str = "You write short transactional emails for the AGS Activities Hub, a school activity portal. Respond with a JSON object containing a \"subject\" string and an HTML \"body\" string. Keep the tone warm and concise, address the recipient by name, and only mention details that appear in the payload.";

/// Generative strategy: delegates subject/body production to a prompt-driven
/// backend. The backend's output still passes through the shared non-empty
/// subject/body check, and the recipient always comes from the request.
#[derive(Clone)]
pub struct GenerativeGenerator {
    api_url: Url,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationRequest<'a> {
    system_instructions: String,
    payload: serde_json::Value,
    language: &'a str,
}

#[derive(Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    subject: Option<String>,
    #[serde(default)]
    body: Option<String>,
}

impl GenerativeGenerator {
    pub fn new(config: &HubmailConfigGeneration) -> Result<Self, HubmailError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| HubmailError::ConfigurationError {
                message: format!("unable to build generation HTTP client: {}", err),
            })?;
        Ok(GenerativeGenerator {
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    fn language_directive(language: Language) -> &'static str {
        match language {
            Language::En => "Write the email in English.",
            Language::Ar => "Write the email in Arabic, formatted for right-to-left display.",
        }
    }
}

#[async_trait]
impl ContentGenerator for GenerativeGenerator {
    async fn generate(
        &self,
        request: &NotificationRequest,
        language: Language,
    ) -> Result<GeneratedMessage, HubmailError> {
        let generation_request = GenerationRequest {
            system_instructions: format!(
                "{} {}",
                SYSTEM_INSTRUCTIONS,
                Self::language_directive(language)
            ),
            payload: serde_json::to_value(request)?,
            language: language.to_str(),
        };

        debug!(
            "Requesting generated content for a {} notification",
            request.kind()
        );
        let response = self
            .client
            .post(self.api_url.clone())
            .bearer_auth(&self.api_key)
            .json(&generation_request)
            .send()
            .await
            .map_err(|err| HubmailError::GenerationError {
                message: format!("content backend is unreachable: {}", err),
                retryable: true,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(HubmailError::GenerationError {
                message: format!("content backend returned {}", status),
                retryable: status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || status.is_server_error(),
            });
        }

        let generated: GenerationResponse =
            response
                .json()
                .await
                .map_err(|err| HubmailError::GenerationError {
                    message: format!("content backend returned malformed output: {}", err),
                    retryable: false,
                })?;

        finalize_message(
            request,
            generated.subject.unwrap_or_default(),
            generated.body.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::request::WelcomePayload;

    #[test]
    fn generation_requests_use_the_backend_wire_format() {
        let request = NotificationRequest::Welcome(WelcomePayload {
            to: "sara@example.com".to_string(),
            name: "Sara".to_string(),
        });
        let generation_request = GenerationRequest {
            system_instructions: SYSTEM_INSTRUCTIONS.to_string(),
            payload: serde_json::to_value(&request).unwrap(),
            language: Language::Ar.to_str(),
        };
        let serialized = serde_json::to_value(&generation_request).unwrap();
        assert!(serialized["systemInstructions"].is_string());
        assert_eq!(serialized["language"], "ar");
        assert_eq!(serialized["payload"]["kind"], "welcome");
        assert_eq!(serialized["payload"]["to"], "sara@example.com");
    }

    #[test]
    fn missing_fields_deserialize_as_absent() {
        let generated: GenerationResponse = serde_json::from_str("{}").unwrap();
        assert!(generated.subject.is_none());
        assert!(generated.body.is_none());
    }
}
