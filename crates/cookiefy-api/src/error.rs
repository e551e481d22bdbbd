use thiserror::Error;

use crate::session::StorageError;

/// Top-level error type for the `cookiefy-api` crate.
///
/// Covers every failure mode of a backend call: expired sessions,
/// transport failures, non-2xx responses, rejected payloads and
/// schema mismatches. `cookiefy-core` maps these into user-facing variants.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The backend answered 401. Stored credentials have been cleared.
    /// `message` is the body's `detail`/`message` when it had one.
    #[error("Session expired -- log in again ({url})")]
    SessionExpired {
        url: String,
        message: Option<String>,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// No response was received (connection refused, DNS, timeout, ...).
    #[error("Network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The request could not be assembled (bad multipart MIME type, ...).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// TLS material or HTTP client construction failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Backend ─────────────────────────────────────────────────────
    /// Any non-2xx response other than 401.
    #[error("Server error (HTTP {status}) from {url}: {message}")]
    Server {
        status: u16,
        message: String,
        url: String,
    },

    /// A 2xx response whose payload carried `status: "error"`.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    // ── Local state ─────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl Error {
    /// Returns `true` if the backend rejected the session (HTTP 401).
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::SessionExpired { .. })
    }

    /// Returns `true` if no response was received at all.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Returns `true` for a 404 from the backend.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    /// HTTP status carried by the error, if the backend responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::SessionExpired { .. } => Some(401),
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
