mod confirmation;
mod health;
mod welcome;

pub use confirmation::confirmation as confirmation_endpoint;
pub use health::health as health_endpoint;
pub use welcome::welcome as welcome_endpoint;

use crate::error::HubmailError;
use crate::notify::request::Language;
use serde::Deserialize;
use std::str::FromStr;

/// Query parameters shared by the notification endpoints. An omitted
/// language defaults to English; an unknown tag is a validation error.
#[derive(Deserialize)]
pub struct NotifyParams {
    pub language: Option<String>,
}

impl NotifyParams {
    pub fn language(&self) -> Result<Language, HubmailError> {
        match &self.language {
            Some(tag) => Language::from_str(tag),
            None => Ok(Language::En),
        }
    }
}
