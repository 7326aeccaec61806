use crate::error::HubmailError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Welcome,
    Confirmation,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl NotificationKind {
    pub fn to_str(&self) -> &str {
        match self {
            NotificationKind::Welcome => "welcome",
            NotificationKind::Confirmation => "confirmation",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ar,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Language {
    pub fn to_str(&self) -> &str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }
}

impl FromStr for Language {
    type Err = HubmailError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "en" => Ok(Language::En),
            "ar" => Ok(Language::Ar),
            _ => Err(HubmailError::ValidationError {
                field: "language".to_string(),
                message: format!("unsupported language: {}", value),
            }),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct WelcomePayload {
    pub to: String,
    pub name: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConfirmationPayload {
    pub to: String,
    pub parent_name: String,
    pub student_name: String,
    pub activity_title: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// A validated notification request. The payload shape is fully determined
/// by the kind; no fields are shared across variants.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NotificationRequest {
    Welcome(WelcomePayload),
    Confirmation(ConfirmationPayload),
}

impl NotificationRequest {
    pub fn kind(&self) -> NotificationKind {
        match self {
            NotificationRequest::Welcome(_) => NotificationKind::Welcome,
            NotificationRequest::Confirmation(_) => NotificationKind::Confirmation,
        }
    }

    /// The delivery address, exactly as the caller supplied it.
    pub fn recipient(&self) -> &str {
        match self {
            NotificationRequest::Welcome(payload) => &payload.to,
            NotificationRequest::Confirmation(payload) => &payload.to,
        }
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
            .expect("invalid email address regex")
    })
}

pub(crate) fn is_email_address(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Checks an untyped payload against the schema for `kind` and builds the
/// typed request. Validation is all-or-nothing and reports the first
/// offending field in payload order.
pub fn validate_request(
    payload: &Value,
    kind: NotificationKind,
) -> Result<NotificationRequest, HubmailError> {
    let fields = object_fields(payload)?;
    match kind {
        NotificationKind::Welcome => Ok(NotificationRequest::Welcome(WelcomePayload {
            to: validated_email(fields, "to")?,
            name: required_string(fields, "name")?,
        })),
        NotificationKind::Confirmation => {
            Ok(NotificationRequest::Confirmation(ConfirmationPayload {
                to: validated_email(fields, "to")?,
                parent_name: required_string(fields, "parent_name")?,
                student_name: required_string(fields, "student_name")?,
                activity_title: required_string(fields, "activity_title")?,
                date: required_string(fields, "date")?,
                time: required_string(fields, "time")?,
                location: required_string(fields, "location")?,
                cost: optional_cost(fields, "cost")?,
            }))
        }
    }
}

fn object_fields(payload: &Value) -> Result<&Map<String, Value>, HubmailError> {
    payload.as_object().ok_or_else(|| HubmailError::ValidationError {
        field: "payload".to_string(),
        message: "must be a JSON object".to_string(),
    })
}

fn validation_error(field: &str, message: &str) -> HubmailError {
    HubmailError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn required_string(fields: &Map<String, Value>, field: &str) -> Result<String, HubmailError> {
    match fields.get(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.clone()),
        Some(Value::String(_)) => Err(validation_error(field, "must not be empty")),
        None | Some(Value::Null) => Err(validation_error(field, "is required")),
        Some(_) => Err(validation_error(field, "must be a string")),
    }
}

fn validated_email(fields: &Map<String, Value>, field: &str) -> Result<String, HubmailError> {
    let value = required_string(fields, field)?;
    if is_email_address(&value) {
        Ok(value)
    } else {
        Err(validation_error(field, "must be a valid email address"))
    }
}

fn optional_cost(fields: &Map<String, Value>, field: &str) -> Result<Option<f64>, HubmailError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => match number.as_f64() {
            Some(cost) if cost.is_finite() && cost >= 0.0 => Ok(Some(cost)),
            Some(_) => Err(validation_error(field, "must be zero or greater")),
            None => Err(validation_error(field, "must be a finite number")),
        },
        Some(_) => Err(validation_error(field, "must be a number")),
    }
}
