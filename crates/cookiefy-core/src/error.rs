// ── Core error types ──
//
// User-facing errors from cookiefy-core. Consumers never match on raw
// transport errors; the `From<cookiefy_api::Error>` impl folds them into
// the categories the front end reports on.

use cookiefy_api::StorageError;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Session expired -- log in again")]
    SessionExpired,

    #[error("Login failed: {message}")]
    LoginRejected { message: String },

    #[error("Not logged in")]
    NotAuthenticated,

    // ── Transport errors ─────────────────────────────────────────────
    #[error("Cannot reach the Cookiefy API at {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        message: String,
        url: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Unexpected response from the API: {message}")]
    Decode { message: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, reason: &str) -> Self {
        Self::Validation {
            field: field.to_owned(),
            reason: reason.to_owned(),
        }
    }

    /// HTTP 404 from the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<cookiefy_api::Error> for CoreError {
    fn from(err: cookiefy_api::Error) -> Self {
        match err {
            cookiefy_api::Error::SessionExpired { .. } => CoreError::SessionExpired,
            cookiefy_api::Error::Network { url, source } => {
                let reason = if source.is_timeout() {
                    "request timed out".into()
                } else if source.is_connect() {
                    "connection failed".into()
                } else {
                    source.to_string()
                };
                CoreError::Network { url, reason }
            }
            cookiefy_api::Error::Server {
                status,
                message,
                url,
            } => CoreError::Server {
                status,
                message,
                url,
            },
            cookiefy_api::Error::Rejected { message } => CoreError::Rejected { message },
            cookiefy_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            cookiefy_api::Error::Encode(e) => CoreError::Decode {
                message: format!("could not encode request: {e}"),
            },
            cookiefy_api::Error::InvalidRequest(message) => CoreError::Validation {
                field: "request".into(),
                reason: message,
            },
            cookiefy_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            cookiefy_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS error: {message}"),
            },
            cookiefy_api::Error::Storage(e) => CoreError::Storage(e),
        }
    }
}
