//! Error type for backend calls
//!
//! The backend reports failures as `{ type: 'validation'|'business',
//! message?, errors?: {field: message} }`. Everything outside 400/401/409
//! collapses into a generic user-facing message.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;

pub const GENERIC_ERROR: &str = "Ein unbekannter Fehler ist aufgetreten.";
pub const WRONG_CREDENTIALS: &str = "Benutzername oder Passwort ist falsch.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Verbindungsfehler: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Antwort konnte nicht gelesen werden: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Nicht autorisiert")]
    Unauthorized,

    #[error("Validierungsfehler")]
    Validation {
        message: Option<String>,
        errors: BTreeMap<String, String>,
    },

    #[error("{0}")]
    Business(String),

    #[error("{0}")]
    Request(String),

    #[error("Unerwartete Antwort ({status})")]
    Unexpected { status: u16 },
}

/// Error body shape the backend uses for 400/409 responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: Option<String>,
    error: Option<String>,
    errors: Option<BTreeMap<String, String>>,
}

impl ApiError {
    /// Map a non-2xx response to an error, per the backend contract
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            400 | 409 => {
                let parsed: Option<ErrorBody> = serde_json::from_str(body).ok();
                match parsed {
                    Some(ErrorBody {
                        kind: Some(kind),
                        message,
                        errors: Some(errors),
                        ..
                    }) if kind == "validation" => ApiError::Validation { message, errors },
                    Some(ErrorBody {
                        kind: Some(kind),
                        message,
                        ..
                    }) if kind == "business" => ApiError::Business(
                        message.unwrap_or_else(|| "Geschäftsregelverletzung".to_string()),
                    ),
                    Some(body) => ApiError::Request(
                        body.message
                            .or(body.error)
                            .unwrap_or_else(|| GENERIC_ERROR.to_string()),
                    ),
                    None if !body.is_empty() => ApiError::Request(body.to_string()),
                    None => ApiError::Request(GENERIC_ERROR.to_string()),
                }
            }
            other => ApiError::Unexpected { status: other },
        }
    }

    /// One banner string per view, as the UI shows it
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Nicht autorisiert. Bitte erneut anmelden.".to_string(),
            ApiError::Validation { message, .. } => message
                .clone()
                .unwrap_or_else(|| "Bitte überprüfe die markierten Felder.".to_string()),
            ApiError::Business(msg) | ApiError::Request(msg) => msg.clone(),
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Unexpected { .. } => {
                GENERIC_ERROR.to_string()
            }
        }
    }

    /// Login is the one place where a 401 means "wrong credentials"
    pub fn login_message(&self) -> String {
        match self {
            ApiError::Unauthorized => WRONG_CREDENTIALS.to_string(),
            other => other.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_body_maps_to_field_errors() {
        let body = r#"{"type":"validation","errors":{"orderIndex":"muss zwischen 1 und 30 liegen"}}"#;
        match ApiError::from_response(400, body) {
            ApiError::Validation { errors, .. } => {
                assert_eq!(
                    errors.get("orderIndex").map(String::as_str),
                    Some("muss zwischen 1 und 30 liegen")
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_business_body_uses_server_message() {
        let body = r#"{"type":"business","message":"Session enthält bereits diese Übung"}"#;
        let err = ApiError::from_response(409, body);
        assert_eq!(err.user_message(), "Session enthält bereits diese Übung");
    }

    #[test]
    fn test_unstructured_400_falls_back_to_raw_body() {
        let err = ApiError::from_response(400, "kaputt");
        assert_eq!(err.user_message(), "kaputt");
    }

    #[test]
    fn test_plain_message_field() {
        let body = r#"{"message":"Name bereits vergeben"}"#;
        let err = ApiError::from_response(409, body);
        assert_eq!(err.user_message(), "Name bereits vergeben");
    }

    #[test]
    fn test_401_is_unauthorized() {
        let err = ApiError::from_response(401, "");
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(err.login_message(), WRONG_CREDENTIALS);
    }

    #[test]
    fn test_500_is_generic() {
        let err = ApiError::from_response(500, "stacktrace...");
        assert_eq!(err.user_message(), GENERIC_ERROR);
    }
}
