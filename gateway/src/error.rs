use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

/// Field-keyed validation messages from a 422 response.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Wire shape of an API error body. The server answers `{"msg": ...}`,
/// some deployments `{"message": ...}`, and validation failures add
/// `{"errors": {field: [messages]}}`. Anything else decodes to the
/// defaults and falls back to a generic message.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
    #[serde(default)]
    pub errors: Option<FieldErrors>,
}

/// Normalized request failure. Every way a call can go wrong, transport
/// included, lands in exactly one of these, so callers never branch on
/// reqwest error types or raw status codes.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Bad credentials at login/registration. The session, if any, is
    /// untouched.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// 401 on an authenticated call. The session has been cleared and the
    /// user sent to the login screen.
    #[error("session expired: {message}")]
    SessionExpired { message: String },

    /// 403: the credential is valid but insufficient.
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("not found: {message}")]
    NotFound { message: String },

    /// 422 with per-field messages where the server provided them.
    #[error("validation failed: {message}")]
    ValidationFailed {
        message: String,
        field_errors: FieldErrors,
    },

    #[error("rate limited: {message}")]
    RateLimited { message: String },

    #[error("server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Connectivity(String),

    #[error("invalid response body: {0}")]
    Decode(String),

    /// Local session persistence failed after a successful server call.
    #[error("session storage: {0}")]
    Storage(String),
}

impl GatewayError {
    /// Map a non-2xx status plus decoded body to the error taxonomy.
    ///
    /// 401 maps to `SessionExpired` here; the unauthenticated dispatch path
    /// re-labels it `AuthenticationFailed` before callers see it.
    pub fn from_response(status: u16, body: ErrorBody) -> Self {
        let message = body
            .msg
            .unwrap_or_else(|| format!("Server error: {status}"));

        match status {
            401 => GatewayError::SessionExpired { message },
            403 => GatewayError::PermissionDenied { message },
            404 => GatewayError::NotFound { message },
            422 => GatewayError::ValidationFailed {
                message,
                field_errors: body.errors.unwrap_or_default(),
            },
            429 => GatewayError::RateLimited { message },
            500..=599 => GatewayError::ServerError { status, message },
            _ => GatewayError::UnexpectedStatus { status, message },
        }
    }

    /// Map a transport-level reqwest failure (never carries a status).
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Timeout
        } else if err.is_decode() {
            GatewayError::Decode(err.to_string())
        } else {
            GatewayError::Connectivity(err.to_string())
        }
    }

    /// HTTP status this error was normalized from, if it came from a
    /// server response at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::AuthenticationFailed { .. } | GatewayError::SessionExpired { .. } => {
                Some(401)
            }
            GatewayError::PermissionDenied { .. } => Some(403),
            GatewayError::NotFound { .. } => Some(404),
            GatewayError::ValidationFailed { .. } => Some(422),
            GatewayError::RateLimited { .. } => Some(429),
            GatewayError::ServerError { status, .. }
            | GatewayError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            GatewayError::ValidationFailed { field_errors, .. } => Some(field_errors),
            _ => None,
        }
    }
}
