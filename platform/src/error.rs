//! Platform error type and its structured classification.
//!
//! ERROR HANDLING
//! ==============
//! Callers never inspect message text. Every failure carries an
//! [`ErrorKind`] derived from the HTTP status and the machine-readable code
//! fields the auth and storage services put in their JSON error bodies.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use serde_json::Value;

/// Errors produced by platform client operations.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// A required configuration value is absent.
    #[error("missing configuration: {var} not set")]
    MissingConfig { var: String },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request never produced a response (DNS, TLS, timeout, offline).
    #[error("request failed: {0}")]
    Request(String),

    /// The platform answered with a non-success status.
    #[error("platform error (status {}): {}", .0.status, .0.message)]
    Api(ApiError),

    /// A success response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),
}

/// Coarse category of a platform failure, used to choose UI messaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong email/password or rejected grant.
    InvalidCredentials,
    /// Account exists but the email address was never confirmed.
    EmailNotConfirmed,
    /// Access token missing, malformed or expired; sign in again.
    SessionExpired,
    /// Authenticated but not allowed to touch this resource.
    PermissionDenied,
    /// The storage bucket does not exist.
    BucketNotFound,
    /// Any other missing resource.
    NotFound,
    /// Transport-level failure.
    Network,
    /// Anything else.
    Unexpected,
}

/// Decoded non-success response from the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Effective status: the storage service's `statusCode` body field when
    /// present, the HTTP status otherwise.
    pub status: u16,
    /// Machine-readable code (`error_code`, or the `error` field).
    pub code: Option<String>,
    /// Human-readable text suitable for showing to the user.
    pub message: String,
}

impl ApiError {
    /// Decode an error body. Unknown or non-JSON bodies keep the raw text as
    /// the message.
    #[must_use]
    pub fn from_body(http_status: u16, body: &str) -> Self {
        let Ok(json) = serde_json::from_str::<Value>(body) else {
            let message = if body.trim().is_empty() { format!("HTTP {http_status}") } else { body.trim().to_owned() };
            return Self { status: http_status, code: None, message };
        };

        let status = json
            .get("statusCode")
            .and_then(|v| v.as_str().and_then(|s| s.parse().ok()).or_else(|| v.as_u64()))
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(http_status);

        let code = ["error_code", "error"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str))
            .map(str::to_owned);

        let message = ["msg", "message", "error_description", "error"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str))
            .map_or_else(|| format!("HTTP {status}"), str::to_owned);

        Self { status, code, message }
    }

    /// Classify by code first, then by status.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        if let Some(kind) = self.code.as_deref().and_then(kind_for_code) {
            return kind;
        }
        match self.status {
            401 => ErrorKind::SessionExpired,
            403 => ErrorKind::PermissionDenied,
            404 => ErrorKind::NotFound,
            _ => ErrorKind::Unexpected,
        }
    }
}

fn kind_for_code(code: &str) -> Option<ErrorKind> {
    let kind = match code {
        "invalid_credentials" | "invalid_grant" | "user_not_found" => ErrorKind::InvalidCredentials,
        "email_not_confirmed" => ErrorKind::EmailNotConfirmed,
        "bad_jwt"
        | "no_authorization"
        | "session_not_found"
        | "session_expired"
        | "refresh_token_not_found"
        | "refresh_token_already_used"
        | "InvalidJWT" => ErrorKind::SessionExpired,
        "Bucket not found" | "NoSuchBucket" | "bucket_not_found" => ErrorKind::BucketNotFound,
        "AccessDenied" | "not_admin" | "insufficient_aal" => ErrorKind::PermissionDenied,
        "not_found" | "NoSuchKey" | "Not found" => ErrorKind::NotFound,
        _ => return None,
    };
    Some(kind)
}

impl PlatformError {
    /// Structured category of this failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(api) => api.kind(),
            Self::Request(_) => ErrorKind::Network,
            Self::MissingConfig { .. } | Self::ConfigParse(_) | Self::HttpClientBuild(_) | Self::Parse(_) => {
                ErrorKind::Unexpected
            }
        }
    }

    /// Text to show the user: the platform's own message for API errors,
    /// the display form otherwise.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Api(api) => api.message.clone(),
            other => other.to_string(),
        }
    }
}
