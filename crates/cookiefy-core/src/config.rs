// ── Runtime console configuration ──
//
// Describes how to reach the backend. The CLI builds a `ConsoleConfig`
// from its profile files and hands it in; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use cookiefy_api::transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
use url::Url;

use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (PEM).
    CustomCa(PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// API base URL (e.g., `https://api.cookiefy.app`).
    pub api_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(api_url: &str) -> Result<Self, CoreError> {
        let api_url = Url::parse(api_url).map_err(|e| CoreError::Config {
            message: format!("invalid API URL {api_url:?}: {e}"),
        })?;
        Ok(Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_timeout(self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_garbage_url() {
        assert!(matches!(
            ConsoleConfig::new("not a url"),
            Err(CoreError::Config { .. })
        ));
    }

    #[test]
    fn defaults_to_strict_tls() {
        let cfg = ConsoleConfig::new("https://api.cookiefy.app").ok();
        assert_eq!(cfg.map(|c| c.tls), Some(TlsVerification::SystemDefaults));
    }
}
