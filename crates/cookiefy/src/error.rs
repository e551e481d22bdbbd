//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use cookiefy_config::ConfigError;
use cookiefy_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Cookiefy API at {url}")]
    #[diagnostic(
        code(cookiefy::connection_failed),
        help(
            "{reason}\n\
             Check the API URL and your network connection.\n\
             Try: cookiefy config show"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Session expired")]
    #[diagnostic(
        code(cookiefy::session_expired),
        help("The stored session was cleared. Run: cookiefy login")
    )]
    SessionExpired,

    #[error("Not logged in")]
    #[diagnostic(code(cookiefy::not_logged_in), help("Run: cookiefy login"))]
    NotLoggedIn,

    #[error("Login failed: {message}")]
    #[diagnostic(code(cookiefy::login_failed))]
    LoginFailed {
        message: String,
        #[help]
        hint: String,
    },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(cookiefy::no_credentials),
        help(
            "Pass --username, set COOKIEFY_USERNAME / COOKIEFY_PASSWORD,\n\
             or store a password with: cookiefy config set-password"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(cookiefy::not_found), help("{message}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        message: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    #[diagnostic(code(cookiefy::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    #[error("Unexpected response from the API")]
    #[diagnostic(
        code(cookiefy::decode),
        help("{message}\nRe-run with -vv to log the request.")
    )]
    Decode { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cookiefy::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(cookiefy::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: cookiefy config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No API URL configured")]
    #[diagnostic(
        code(cookiefy::no_config),
        help(
            "Create a profile with: cookiefy config init\n\
             Or pass --api-url / set COOKIEFY_API_URL.\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(cookiefy::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {message}")]
    #[diagnostic(code(cookiefy::keyring))]
    Keyring { message: String },

    // ── Local session ────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    #[diagnostic(
        code(cookiefy::session_storage),
        help("Check permissions on the session file, or pass --session-file.")
    )]
    Storage { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(cookiefy::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(cookiefy::json), help("Check the JSON and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Login rejection, naming the profile in the help text when known.
    pub fn login_failed(message: String, profile: Option<&str>) -> Self {
        let hint = match profile {
            Some(name) => format!("Check the username and password for profile '{name}'."),
            None => "Check the username and password.".into(),
        };
        Self::LoginFailed { message, hint }
    }

    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::SessionExpired
            | Self::NotLoggedIn
            | Self::LoginFailed { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::SessionExpired => CliError::SessionExpired,

            CoreError::NotAuthenticated => CliError::NotLoggedIn,

            CoreError::LoginRejected { message } => CliError::login_failed(message, None),

            CoreError::Network { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Server {
                status: 404,
                message,
                url,
            } => CliError::NotFound {
                resource_type: "resource".into(),
                identifier: url,
                message,
            },

            CoreError::Server {
                status, message, ..
            } => CliError::ApiError {
                status: Some(status),
                message,
            },

            CoreError::Rejected { message } => CliError::ApiError {
                status: None,
                message,
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::Decode { message } => CliError::Decode { message },

            CoreError::Storage(e) => CliError::Storage {
                message: e.to_string(),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Keyring(e) => CliError::Keyring {
                message: e.to_string(),
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
