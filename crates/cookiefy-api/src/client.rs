// Cookiefy API HTTP client
//
// Wraps `reqwest::Client` with the backend base URL and the two
// interceptor phases: the request phase attaches the stored bearer token,
// the response phase maps statuses onto `Error` and runs the session
// teardown on 401. Endpoint groups are inherent methods in `endpoints/`.

use std::sync::Arc;

use reqwest::multipart;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::UnauthorizedHandler;
use crate::error::Error;
use crate::request::{ApiRequest, RequestBody};
use crate::session::{AUTH_TOKEN_KEY, SessionStore, USER_DATA_KEY};
use crate::transport::TransportConfig;

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

// ── Error response shape from the backend ────────────────────────────

/// FastAPI reports failures as `{"detail": ...}`; the app's own handlers
/// use `{"message": ...}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Cookiefy admin backend.
///
/// Cheap to clone: the reqwest client, the session store and the
/// unauthorized handler are all shared.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn SessionStore>,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` using the given transport settings.
    ///
    /// `on_unauthorized` is called after the client has cleared the
    /// session store in response to a 401.
    pub fn new(
        base_url: &str,
        transport: &TransportConfig,
        store: Arc<dyn SessionStore>,
        on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            Self::normalize_base_url(base_url)?,
            store,
            on_unauthorized,
        ))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        store: Arc<dyn SessionStore>,
        on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
    ) -> Self {
        Self {
            http,
            base_url,
            store,
            on_unauthorized,
        }
    }

    /// Ensure the base path ends with `/` so relative joins keep any prefix
    /// (e.g. `https://host/api` + `auth/login` -> `https://host/api/auth/login`).
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The session store the client reads tokens from.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Read the stored token. Storage failures are logged and treated as
    /// "no token" so the call proceeds unauthenticated.
    ///
    /// Store implementations may block on file I/O, so the read runs on
    /// the blocking pool.
    pub(crate) async fn stored_token(&self) -> Option<String> {
        let store = Arc::clone(&self.store);
        match tokio::task::spawn_blocking(move || store.get(AUTH_TOKEN_KEY)).await {
            Ok(Ok(token)) => token.filter(|t| !t.is_empty()),
            Ok(Err(e)) => {
                warn!(error = %e, "could not read auth token");
                None
            }
            Err(e) => {
                warn!(error = %e, "auth token read task failed");
                None
            }
        }
    }

    /// Drop token and user from the store on the blocking pool.
    async fn clear_stored_session(&self) {
        let store = Arc::clone(&self.store);
        let cleared =
            tokio::task::spawn_blocking(move || store.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY]))
                .await;
        match cleared {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "failed to clear stored session after 401"),
            Err(e) => warn!(error = %e, "session clear task failed"),
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request phase ────────────────────────────────────────────────

    async fn bearer_token(&self, req: &ApiRequest) -> Option<String> {
        if req.is_skip_auth() {
            None
        } else {
            self.stored_token().await
        }
    }

    fn build(
        &self,
        req: &ApiRequest,
        url: Url,
        token: Option<String>,
    ) -> Result<reqwest::RequestBuilder, Error> {
        let mut builder = self
            .http
            .request(req.method().clone(), url)
            .query(req.query_pairs());

        builder = match req.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Form(fields) => builder.form(fields),
            RequestBody::Multipart(parts) => {
                let mut form = multipart::Form::new();
                for (field, file) in parts {
                    let part = multipart::Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)
                        .map_err(|e| {
                            Error::InvalidRequest(format!("bad MIME type {:?}: {e}", file.mime))
                        })?;
                    form = form.part(field.clone(), part);
                }
                builder.multipart(form)
            }
        };

        // Per-call header overrides win over body-derived defaults.
        if !req.headers().is_empty() {
            builder = builder.headers(req.headers().clone());
        }

        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    /// Send a request through both interceptor phases.
    ///
    /// Returns the raw response for 2xx statuses; every other outcome is
    /// mapped onto an [`Error`].
    pub async fn send(&self, req: &mut ApiRequest) -> Result<reqwest::Response, Error> {
        let url = self.url(req.path())?;
        debug!("{} {}", req.method(), url);

        let token = self.bearer_token(req).await;
        let resp = self
            .build(req, url.clone(), token)?
            .send()
            .await
            .map_err(|source| Error::Network {
                url: url.to_string(),
                source,
            })?;

        self.check_status(req, &url, resp).await
    }

    // ── Response phase ───────────────────────────────────────────────

    async fn check_status(
        &self,
        req: &mut ApiRequest,
        url: &Url,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let raw = resp.text().await.unwrap_or_default();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(self.handle_unauthorized(req, url, error_message(&raw)).await);
        }

        let message = error_message(&raw).unwrap_or_else(|| {
            if raw.is_empty() {
                status.to_string()
            } else {
                preview(&raw)
            }
        });

        warn!(status = status.as_u16(), %url, %message, "API error");
        Err(Error::Server {
            status: status.as_u16(),
            message,
            url: url.to_string(),
        })
    }

    /// Tear down the stored session once per request instance.
    async fn handle_unauthorized(
        &self,
        req: &mut ApiRequest,
        url: &Url,
        message: Option<String>,
    ) -> Error {
        if req.unauthorized_handled {
            debug!(%url, "401 already processed for this request");
        } else {
            req.unauthorized_handled = true;

            self.clear_stored_session().await;
            if let Some(handler) = &self.on_unauthorized {
                handler.session_expired();
            }
            if req.is_skip_auth() {
                warn!(%url, "credentials rejected, stored session cleared");
            } else {
                warn!(%url, "session expired, stored credentials cleared");
            }
        }

        Error::SessionExpired {
            url: url.to_string(),
            message,
        }
    }

    // ── Decoding ─────────────────────────────────────────────────────

    /// Send a request and decode the JSON body into `T`.
    pub async fn execute<T: DeserializeOwned>(&self, req: &mut ApiRequest) -> Result<T, Error> {
        let resp = self.send(req).await?;
        let url = resp.url().to_string();
        let body = resp.text().await.map_err(|e| Error::Deserialization {
            message: format!("failed to read response body from {url}: {e}"),
            body: String::new(),
        })?;
        decode(body)
    }

    /// Send a request and discard the body.
    pub async fn execute_empty(&self, req: &mut ApiRequest) -> Result<(), Error> {
        self.send(req).await.map(drop)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.execute(&mut ApiRequest::get(path)).await
    }

    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let mut req = ApiRequest::get(path).queries(params.iter().map(|(k, v)| (*k, v)));
        self.execute(&mut req).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(&mut ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(&mut ApiRequest::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        self.execute_empty(&mut ApiRequest::delete(path)).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

pub(crate) fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

fn error_message(raw: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(raw).ok()?;
    let value = parsed.message.or(parsed.detail)?;
    Some(match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let url = ApiClient::normalize_base_url("https://api.cookiefy.test/v1").ok();
        assert_eq!(
            url.map(String::from).as_deref(),
            Some("https://api.cookiefy.test/v1/")
        );
    }

    #[test]
    fn error_message_prefers_message_then_detail() {
        assert_eq!(
            error_message(r#"{"message":"nope","detail":"ignored"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            error_message(r#"{"detail":"Not Found"}"#).as_deref(),
            Some("Not Found")
        );
        assert_eq!(error_message("<html>oops</html>"), None);
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let msg = error_message(r#"{"detail":[{"loc":["query","input"],"msg":"field required"}]}"#);
        assert!(msg.is_some_and(|m| m.contains("field required")));
    }

    #[test]
    fn decode_reports_body_preview() {
        let err = decode::<Vec<u32>>("{\"not\":\"a list\"}".into());
        match err {
            Err(Error::Deserialization { message, body }) => {
                assert!(message.contains("body preview"));
                assert_eq!(body, "{\"not\":\"a list\"}");
            }
            other => panic!("expected Deserialization, got {other:?}"),
        }
    }
}
