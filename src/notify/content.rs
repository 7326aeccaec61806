use crate::error::HubmailError;
use crate::notify::request::{Language, NotificationRequest};
use crate::server::config::{ContentStrategy, HubmailConfigContent};
use async_trait::async_trait;
use dyn_clone::{clone_trait_object, DynClone};

mod generative;
mod templates;

pub use generative::GenerativeGenerator;
pub use templates::TemplateGenerator;

/// A subject/body pair ready for delivery. The recipient is always copied
/// from the validated request, never taken from generator output.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedMessage {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

#[async_trait]
pub trait ContentGenerator: DynClone + Send + Sync {
    async fn generate(
        &self,
        request: &NotificationRequest,
        language: Language,
    ) -> Result<GeneratedMessage, HubmailError>;
}

clone_trait_object!(ContentGenerator);

pub fn create_generator(
    config: &HubmailConfigContent,
) -> Result<Box<dyn ContentGenerator>, HubmailError> {
    match config.strategy {
        ContentStrategy::Template => Ok(Box::new(TemplateGenerator::from_config(config)?)),
        ContentStrategy::Generative => match &config.generation {
            Some(generation) => Ok(Box::new(GenerativeGenerator::new(generation)?)),
            None => Err(HubmailError::ConfigurationError {
                message:
                    "content.strategy is \"generative\" but [content.generation] is not configured"
                        .to_string(),
            }),
        },
    }
}

/// Shared post-condition for both strategies: the subject and body must be
/// non-empty, and the recipient comes from the request.
fn finalize_message(
    request: &NotificationRequest,
    subject: String,
    body: String,
) -> Result<GeneratedMessage, HubmailError> {
    if subject.trim().is_empty() {
        return Err(HubmailError::GenerationError {
            message: "content generator produced an empty subject".to_string(),
            retryable: false,
        });
    }
    if body.trim().is_empty() {
        return Err(HubmailError::GenerationError {
            message: "content generator produced an empty body".to_string(),
            retryable: false,
        });
    }
    Ok(GeneratedMessage {
        subject,
        body,
        recipient: request.recipient().to_string(),
    })
}
