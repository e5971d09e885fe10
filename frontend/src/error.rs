//! Client-side error model.
//!
//! Local validation failures never touch the network. Remote failures are
//! split into field validation (`422`), authorization (`401`/`403`) and
//! everything else.

use crate::web::http::HttpError;
use fieldserve_shared::ValidationErrors;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Required input missing; caught before any request.
    #[error("{0}")]
    LocalValidation(String),
    /// Field-keyed validation errors from the server.
    #[error("validation failed: {}", .0.flatten())]
    Validation(ValidationErrors),
    /// The session was evicted as a side effect.
    #[error("not authorized (HTTP {status})")]
    Unauthorized { status: u16 },
    #[error("request failed with HTTP {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Display text for the initiating action.
    ///
    /// Local and field validation messages are shown as-is; everything else
    /// collapses to the action's own `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::LocalValidation(msg) => msg.clone(),
            ClientError::Validation(errors) => {
                let flat = errors.flatten();
                if flat.is_empty() {
                    fallback.to_string()
                } else {
                    flat
                }
            }
            _ => fallback.to_string(),
        }
    }

    /// Like [`user_message`](Self::user_message) but prefers the server's
    /// `message` for plain HTTP failures.
    pub fn server_message_or(&self, fallback: &str) -> String {
        match self {
            ClientError::Status {
                message: Some(msg), ..
            } if !msg.is_empty() => msg.clone(),
            ClientError::Validation(errors) => match &errors.message {
                Some(msg) if errors.is_empty() => msg.clone(),
                _ => self.user_message(fallback),
            },
            _ => self.user_message(fallback),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized { .. })
    }
}

impl From<HttpError> for ClientError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(msg) => ClientError::Decode(msg),
            other => ClientError::Network(other.to_string()),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation(body: serde_json::Value) -> ClientError {
        ClientError::Validation(serde_json::from_value(body).unwrap())
    }

    #[test]
    fn test_validation_message_is_flattened() {
        let err = validation(json!({ "errors": { "email": ["required"], "password": ["short"] } }));
        assert_eq!(err.user_message("fallback"), "required short");
    }

    #[test]
    fn test_other_errors_use_fallback() {
        let err = ClientError::Status {
            status: 500,
            message: Some("SQLSTATE[HY000]".to_string()),
        };
        assert_eq!(err.user_message("Could not load"), "Could not load");
        assert_eq!(ClientError::Network("x".into()).user_message("Offline"), "Offline");
    }

    #[test]
    fn test_server_message_preferred_when_asked() {
        let err = ClientError::Status {
            status: 409,
            message: Some("Service already exists".to_string()),
        };
        assert_eq!(err.server_message_or("Could not create"), "Service already exists");

        let bare = ClientError::Status {
            status: 500,
            message: None,
        };
        assert_eq!(bare.server_message_or("Could not create"), "Could not create");
    }

    #[test]
    fn test_http_error_mapping() {
        let err: ClientError = HttpError::NetworkError("down".into()).into();
        assert!(matches!(err, ClientError::Network(_)));
        let err: ClientError = HttpError::ResponseParseFailed("bad".into()).into();
        assert!(matches!(err, ClientError::Decode(_)));
    }
}
