//! CLI configuration: a thin wrapper around `cookiefy_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --insecure, --timeout,
//! --session-file).

use std::path::PathBuf;
use std::sync::Arc;

use cookiefy_core::{Console, FileSessionStore};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use cookiefy_config::{
    Config, Profile, config_path, load_config_or_default, resolve_password,
    resolve_username, save_config, session_path, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// The profile a command runs against, after flag overrides.
pub struct ResolvedProfile {
    pub name: String,
    pub profile: Profile,
    pub session_file: PathBuf,
}

/// Pick the active profile and apply flag overrides.
///
/// Without a stored profile, `--api-url` alone is enough to build an
/// ad-hoc one.
pub fn resolve_profile(global: &GlobalOpts, cfg: &Config) -> Result<ResolvedProfile, CliError> {
    let name = active_profile_name(global, cfg);

    let mut profile = match (cfg.profiles.get(&name), global.api_url.as_deref()) {
        (Some(stored), _) => stored.clone(),
        (None, Some(url)) => Profile::new(url),
        (None, None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(cfg),
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    // Flag > env > profile > defaults
    if let Some(url) = &global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure || (profile.insecure.is_none() && cfg.defaults.insecure) {
        profile.insecure = Some(true);
    }
    profile.timeout = Some(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );

    let session_file = global
        .session_file
        .clone()
        .or_else(|| profile.session_file.clone())
        .unwrap_or_else(|| session_path(&name));

    Ok(ResolvedProfile {
        name,
        profile,
        session_file,
    })
}

/// Build a console for the active profile and restore its session.
pub fn build_console(global: &GlobalOpts) -> Result<(Console, ResolvedProfile), CliError> {
    let cfg = cookiefy_config::load_config()?;
    let resolved = resolve_profile(global, &cfg)?;
    let store = Arc::new(FileSessionStore::new(resolved.session_file.clone()));
    let console_config = cookiefy_config::profile_to_console_config(&resolved.profile)?;
    let console = Console::new(console_config, store)?;

    let state = console.start();
    tracing::debug!(
        profile = %resolved.name,
        session = %resolved.session_file.display(),
        authenticated = state.is_authenticated(),
        "console ready"
    );

    Ok((console, resolved))
}
