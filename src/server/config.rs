use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use toml;
use url::Url;

use crate::error::HubmailError;
use crate::notify::request::is_email_address;
use crate::templating::TemplateString;

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone, Serialize, Deserialize)]
pub struct HubmailConfigCors {
    pub origin: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStrategy {
    Template,
    Generative,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct HubmailConfigDelivery {
    pub api_url: Url,
    pub api_key: Option<String>,
    pub sender: String,
    pub timeout_seconds: Option<u64>,
}

impl HubmailConfigDelivery {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct HubmailConfigGeneration {
    pub api_url: Url,
    pub api_key: String,
    pub timeout_seconds: Option<u64>,
}

impl HubmailConfigGeneration {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct MessageTemplateConfig {
    pub subject: TemplateString,
    pub body: TemplateString,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct KindTemplateOverrides {
    pub en: Option<MessageTemplateConfig>,
    pub ar: Option<MessageTemplateConfig>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct TemplateOverrides {
    pub welcome: Option<KindTemplateOverrides>,
    pub confirmation: Option<KindTemplateOverrides>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct HubmailConfigContent {
    pub strategy: ContentStrategy,
    pub generation: Option<HubmailConfigGeneration>,
    pub templates: Option<TemplateOverrides>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct HubmailConfig {
    pub host: String,
    pub port: u16,
    pub cors: HubmailConfigCors,
    pub delivery: HubmailConfigDelivery,
    pub content: HubmailConfigContent,
}

impl HubmailConfig {
    /// Checks the invariants that should stop the server at startup rather
    /// than fail individual requests: the delivery credential and verified
    /// sender must be present, and a generative strategy needs its backend
    /// configured.
    pub fn validate(&self) -> Result<(), HubmailError> {
        match &self.delivery.api_key {
            Some(api_key) if !api_key.trim().is_empty() => {}
            _ => {
                return Err(HubmailError::ConfigurationError {
                    message: "delivery.api_key is required: set it to the transactional email API credential".to_string(),
                })
            }
        }
        if !is_sender_address(&self.delivery.sender) {
            return Err(HubmailError::ConfigurationError {
                message: format!(
                    "delivery.sender must be an email address or \"Display Name <address>\", got \"{}\"",
                    self.delivery.sender
                ),
            });
        }
        if self.content.strategy == ContentStrategy::Generative {
            match &self.content.generation {
                Some(generation) if !generation.api_key.trim().is_empty() => {}
                Some(_) => {
                    return Err(HubmailError::ConfigurationError {
                        message: "content.generation.api_key is required".to_string(),
                    })
                }
                None => {
                    return Err(HubmailError::ConfigurationError {
                        message: "content.strategy is \"generative\" but [content.generation] is not configured".to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

fn is_sender_address(sender: &str) -> bool {
    let address = match (sender.find('<'), sender.rfind('>')) {
        (Some(start), Some(end)) if start < end => &sender[start + 1..end],
        _ => sender,
    };
    is_email_address(address.trim())
}

pub fn config_to_toml(hubmail_config: HubmailConfig) -> Result<String, HubmailError> {
    Ok(toml::to_string(&hubmail_config)?)
}

pub fn default_server_config() -> HubmailConfig {
    HubmailConfig {
        host: "0.0.0.0".to_string(),
        port: 8484,
        cors: HubmailConfigCors {
            origin: "*".to_string(),
        },
        delivery: HubmailConfigDelivery {
            api_url: Url::parse("https://api.resend.com").expect("invalid default delivery URL"),
            api_key: Some("your-delivery-api-key".to_string()),
            sender: "AGS Activities Hub <activities@example.org>".to_string(),
            timeout_seconds: Some(DEFAULT_TIMEOUT_SECONDS),
        },
        content: HubmailConfigContent {
            strategy: ContentStrategy::Template,
            generation: None,
            templates: None,
        },
    }
}

pub fn read_config(config_path: &Path) -> Result<HubmailConfig, HubmailError> {
    let contents =
        fs::read_to_string(config_path).map_err(|err| HubmailError::ConfigurationError {
            message: err.to_string(),
        })?;
    match toml::from_str(&contents) {
        Ok(config) => Ok(config),
        Err(err) => Err(HubmailError::ConfigurationError {
            message: err.to_string(),
        }),
    }
}
