use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Display, Error, PartialEq, Serialize)]
#[serde(tag = "error_type")]
pub enum HubmailError {
    #[display("{field}: {message}")]
    ValidationError { field: String, message: String },
    #[display("{message}")]
    ConfigurationError { message: String },
    #[display("{message}")]
    GenerationError { message: String, retryable: bool },
    #[display("{message}")]
    DeliveryError { message: String, retryable: bool },
    #[display("{message}")]
    Other { message: String },
}

impl From<toml::ser::Error> for HubmailError {
    fn from(cause: toml::ser::Error) -> Self {
        HubmailError::Other {
            message: format!("{:?}", cause),
        }
    }
}

impl From<serde_json::Error> for HubmailError {
    fn from(cause: serde_json::Error) -> Self {
        HubmailError::Other {
            message: format!("{:?}", cause),
        }
    }
}

impl ResponseError for HubmailError {
    fn status_code(&self) -> StatusCode {
        match self {
            HubmailError::ValidationError { .. } => StatusCode::BAD_REQUEST,
            HubmailError::GenerationError { .. } | HubmailError::DeliveryError { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_name_the_field() {
        let error = HubmailError::ValidationError {
            field: "to".to_string(),
            message: "must be a valid email address".to_string(),
        };
        assert_eq!(error.to_string(), "to: must be a valid email address");
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn errors_round_trip_through_json() {
        let error = HubmailError::DeliveryError {
            message: "provider returned 429 Too Many Requests".to_string(),
            retryable: true,
        };
        let serialized = serde_json::to_string(&error).unwrap();
        assert!(serialized.contains("\"error_type\":\"DeliveryError\""));
        let deserialized: HubmailError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
