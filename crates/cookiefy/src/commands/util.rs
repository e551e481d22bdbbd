//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::BodyArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Resolve `--data` / `--from-file` into a JSON object body.
pub fn read_body(body: &BodyArgs) -> Result<serde_json::Value, CliError> {
    let value = match (&body.data, &body.from_file) {
        (Some(inline), _) => serde_json::from_str(inline).map_err(|e| CliError::Validation {
            field: "data".into(),
            reason: format!("invalid JSON: {e}"),
        })?,
        (None, Some(path)) => read_json_file(path)?,
        (None, None) => {
            return Err(CliError::Validation {
                field: "data".into(),
                reason: "pass --data or --from-file".into(),
            });
        }
    };
    if !value.is_object() {
        return Err(CliError::Validation {
            field: "data".into(),
            reason: "body must be a JSON object".into(),
        });
    }
    Ok(value)
}

/// Split a `KEY=VALUE` query parameter.
pub fn parse_param(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.to_owned()))
        }
        _ => Err(CliError::Validation {
            field: "param".into(),
            reason: format!("expected KEY=VALUE, got '{raw}'"),
        }),
    }
}

/// Spinner on stderr while a request runs. Hidden when stderr is not a
/// terminal or output is quiet.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Guess an image MIME type from the file extension.
pub fn image_mime(path: &Path) -> Result<&'static str, CliError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        "heic" => Ok("image/heic"),
        other => Err(CliError::Validation {
            field: "file".into(),
            reason: format!("unsupported image type '{other}' (jpg, png, webp, gif, heic)"),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn params_split_on_first_equals() {
        assert_eq!(
            parse_param("filter=a=b").unwrap(),
            ("filter".into(), "a=b".into())
        );
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=x").is_err());
    }

    #[test]
    fn inline_body_must_be_object() {
        let ok = BodyArgs {
            data: Some(r#"{"name":"vegan"}"#.into()),
            from_file: None,
        };
        assert_eq!(read_body(&ok).unwrap()["name"], "vegan");

        let list = BodyArgs {
            data: Some("[1,2]".into()),
            from_file: None,
        };
        assert!(matches!(
            read_body(&list),
            Err(CliError::Validation { .. })
        ));
    }

    #[test]
    fn body_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("body.json");
        std::fs::write(&path, r#"{"name":"brunch"}"#).unwrap();
        let body = BodyArgs {
            data: None,
            from_file: Some(path),
        };
        assert_eq!(read_body(&body).unwrap()["name"], "brunch");
    }

    #[test]
    fn mime_from_extension() {
        assert_eq!(image_mime(&PathBuf::from("a/cover.JPG")).unwrap(), "image/jpeg");
        assert_eq!(image_mime(&PathBuf::from("x.webp")).unwrap(), "image/webp");
        assert!(image_mime(&PathBuf::from("notes.txt")).is_err());
    }
}
