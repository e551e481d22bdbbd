// ── Console facade ──
//
// Single entry point for front ends: wires the session store, the
// session manager and the API client together and exposes the admin
// workflows (login, search, site editing, resource management, stats).

use std::sync::Arc;

use cookiefy_api::models::{AdminUser, Id, LoginResponse, SearchResults, Site, Stats};
use cookiefy_api::{ApiClient, LoginForm, Resource, SearchQuery, SessionStore, UploadFile};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ConsoleConfig;
use crate::editor::SiteDraft;
use crate::error::CoreError;
use crate::session::{AuthState, SessionManager};

/// Admin console bound to one backend and one session store.
///
/// Cheaply cloneable; clones share the HTTP client and session state.
#[derive(Clone)]
pub struct Console {
    config: ConsoleConfig,
    client: ApiClient,
    session: SessionManager,
}

impl Console {
    /// Build a console. The session starts anonymous; call
    /// [`start`](Self::start) to restore a persisted one.
    pub fn new(config: ConsoleConfig, store: Arc<dyn SessionStore>) -> Result<Self, CoreError> {
        let session = SessionManager::new(Arc::clone(&store));
        let client = ApiClient::new(
            config.api_url.as_str(),
            &config.transport(),
            store,
            Some(session.unauthorized_handler()),
        )?;
        Ok(Self {
            config,
            client,
            session,
        })
    }

    /// Restore the persisted session. No network call is made.
    pub fn start(&self) -> AuthState {
        self.session.restore()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    fn require_session(&self) -> Result<(), CoreError> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Log in and persist the session.
    ///
    /// The stored user is the backend-reported username when present,
    /// else the normalized one that was submitted. A 401 or other error
    /// status from the login route is reported as [`CoreError::LoginRejected`].
    pub async fn login(&self, username: &str, password: SecretString) -> Result<AdminUser, CoreError> {
        let form = LoginForm::new(username, password);
        let resp = self.client.login(&form).await.map_err(|e| match e {
            cookiefy_api::Error::SessionExpired { message, .. } => CoreError::LoginRejected {
                message: message.unwrap_or_else(|| "Login failed".into()),
            },
            cookiefy_api::Error::Server { message, .. } => CoreError::LoginRejected { message },
            other => other.into(),
        })?;

        match resp {
            LoginResponse::Success { data } if !data.token.is_empty() => {
                let user = AdminUser {
                    username: data
                        .username
                        .filter(|u| !u.trim().is_empty())
                        .unwrap_or_else(|| form.username().to_owned()),
                };
                self.session.establish(data.token, user.clone())?;
                Ok(user)
            }
            other => Err(CoreError::LoginRejected {
                message: other
                    .error_message()
                    .unwrap_or_else(|| "Login failed".into()),
            }),
        }
    }

    /// Log out. The backend call is best effort; the local session is
    /// always dropped.
    pub async fn logout(&self) -> Result<(), CoreError> {
        if let Err(e) = self.client.logout().await {
            debug!(error = %e, "logout request failed, clearing local session anyway");
        }
        self.session.clear()?;
        info!("logged out");
        Ok(())
    }

    // ── Search ───────────────────────────────────────────────────────

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, CoreError> {
        if query.input.trim().is_empty() {
            return Err(CoreError::validation("input", "search text is required"));
        }
        self.require_session()?;
        Ok(self.client.search(query).await?)
    }

    // ── Sites ────────────────────────────────────────────────────────

    pub async fn site(&self, id: &Id) -> Result<Site, CoreError> {
        self.require_session()?;
        Ok(self.client.get_site(id).await?)
    }

    /// Fetch a site and open a draft on it.
    pub async fn edit_site(&self, id: &Id) -> Result<SiteDraft, CoreError> {
        SiteDraft::new(&self.site(id).await?)
    }

    /// Validate and send a draft, then return the re-fetched site.
    pub async fn save_site(&self, draft: SiteDraft) -> Result<Site, CoreError> {
        draft.validate()?;
        self.require_session()?;

        let (id, update) = draft.into_parts();
        if let Some(message) = self.client.update_site(&id, &update).await? {
            debug!(%id, %message, "site updated");
        }
        info!(%id, "site saved");
        Ok(self.client.get_site(&id).await?)
    }

    pub async fn upload_site_image(&self, id: &Id, file: UploadFile) -> Result<Option<String>, CoreError> {
        if file.bytes.is_empty() {
            return Err(CoreError::validation("file", "image is empty"));
        }
        self.require_session()?;
        Ok(self.client.upload_site_image(id, file).await?)
    }

    // ── Resources ────────────────────────────────────────────────────

    pub async fn list<T: DeserializeOwned>(
        &self,
        resource: Resource,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, CoreError> {
        self.require_session()?;
        Ok(self.client.list_resource(resource, params).await?)
    }

    pub async fn get<T: DeserializeOwned>(&self, resource: Resource, id: &Id) -> Result<T, CoreError> {
        self.require_session()?;
        Ok(self.client.get_resource(resource, id).await?)
    }

    pub async fn create(
        &self,
        resource: Resource,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        self.require_session()?;
        Ok(self.client.create_resource(resource, body).await?)
    }

    pub async fn update(
        &self,
        resource: Resource,
        id: &Id,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        self.require_session()?;
        Ok(self.client.update_resource(resource, id, body).await?)
    }

    pub async fn delete(&self, resource: Resource, id: &Id) -> Result<(), CoreError> {
        self.require_session()?;
        self.client.delete_resource(resource, id).await?;
        info!(%resource, %id, "deleted");
        Ok(())
    }

    // ── Statistics ───────────────────────────────────────────────────

    pub async fn stats_overview(&self) -> Result<Stats, CoreError> {
        self.require_session()?;
        Ok(self.client.stats_overview().await?)
    }

    pub async fn restaurant_stats(&self, id: &Id) -> Result<Stats, CoreError> {
        self.require_session()?;
        Ok(self.client.restaurant_stats(id).await?)
    }
}
