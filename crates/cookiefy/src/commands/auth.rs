//! Login, logout and whoami.

use std::io::{BufRead, IsTerminal};

use dialoguer::Input;
use owo_colors::{OwoColorize, Stream};
use secrecy::SecretString;

use cookiefy_config::ConfigError;
use cookiefy_core::{AuthState, Console, CoreError};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::{self, ResolvedProfile};
use crate::error::CliError;
use crate::output;

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn resolve_username(args: &LoginArgs, resolved: &ResolvedProfile) -> Result<String, CliError> {
    if let Some(username) = args.username.as_deref().filter(|u| !u.trim().is_empty()) {
        return Ok(username.to_owned());
    }
    match config::resolve_username(&resolved.profile, &resolved.name) {
        Ok(username) => Ok(username),
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            Input::new()
                .with_prompt("Username")
                .interact_text()
                .map_err(prompt_err)
        }
        Err(e) => Err(e.into()),
    }
}

fn resolve_password(args: &LoginArgs, resolved: &ResolvedProfile) -> Result<SecretString, CliError> {
    if args.password_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        let password = line.trim_end_matches(['\r', '\n']).to_owned();
        return Ok(SecretString::from(password));
    }
    match config::resolve_password(&resolved.profile, &resolved.name) {
        Ok(password) => Ok(password),
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            let password = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
            Ok(SecretString::from(password))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn login(
    console: &Console,
    args: LoginArgs,
    resolved: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = resolve_username(&args, resolved)?;
    let password = resolve_password(&args, resolved)?;

    let user = console
        .login(&username, password)
        .await
        .map_err(|e| match e {
            CoreError::LoginRejected { message } => {
                CliError::login_failed(message, Some(&resolved.name))
            }
            other => other.into(),
        })?;

    if !global.quiet {
        eprintln!(
            "{}",
            output::success(&format!(
                "Logged in as {} (profile '{}')",
                user.username, resolved.name
            ))
        );
    }
    Ok(())
}

pub async fn logout(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let was_authenticated = console.session().is_authenticated();
    console.logout().await?;
    if !global.quiet {
        if was_authenticated {
            eprintln!("{}", output::success("Logged out"));
        } else {
            eprintln!("Not logged in; nothing to do");
        }
    }
    Ok(())
}

pub fn whoami(
    console: &Console,
    resolved: &ResolvedProfile,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let AuthState::Authenticated { user, .. } = console.session().state() else {
        return Err(CliError::NotLoggedIn);
    };

    let api_url = console.config().api_url.to_string();
    let out = output::render_single(
        &global.output,
        &user,
        |u| {
            format!(
                "{} {}\n{} {}\n{} {}",
                output::label("User:   "),
                u.username
                    .if_supports_color(Stream::Stdout, |t| t.green())
                    .to_string(),
                output::label("Profile:"),
                resolved.name,
                output::label("API:    "),
                api_url,
            )
        },
        |u| u.username.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
