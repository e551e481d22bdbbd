// ── Session management ──
//
// Owns the in-memory auth state and keeps it consistent with the session
// store. The API client reports 401s through the handler returned by
// `unauthorized_handler`, so the state flips to anonymous without the
// client knowing who is listening.

use std::sync::{Arc, Weak};

use cookiefy_api::models::AdminUser;
use cookiefy_api::{AUTH_TOKEN_KEY, SessionStore, USER_DATA_KEY, UnauthorizedHandler};
use secrecy::SecretString;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Authentication state observable by consumers.
#[derive(Debug, Clone, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated {
        token: SecretString,
        user: AdminUser,
    },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    pub fn user(&self) -> Option<&AdminUser> {
        match self {
            Self::Authenticated { user, .. } => Some(user),
            Self::Anonymous => None,
        }
    }
}

/// Holder of the current session.
///
/// Cheaply cloneable; all clones share the same state channel and store.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    store: Arc<dyn SessionStore>,
    state: watch::Sender<AuthState>,
}

impl SessionManager {
    /// Create an anonymous manager. Call [`restore`](Self::restore) to load
    /// a persisted session.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Anonymous);
        Self {
            inner: Arc::new(SessionInner { store, state }),
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.inner.store
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Load the persisted session, without any network call.
    ///
    /// Both keys present -> authenticated. A torn pair is cleared. Read
    /// failures and unparseable user records leave the state anonymous.
    pub fn restore(&self) -> AuthState {
        let state = match self.load() {
            Ok(state) => state,
            Err(e) => {
                warn!(error = %e, "could not restore session");
                AuthState::Anonymous
            }
        };
        self.inner.state.send_replace(state.clone());
        state
    }

    fn load(&self) -> Result<AuthState, CoreError> {
        let store = &self.inner.store;
        let token = store.get(AUTH_TOKEN_KEY)?;
        let user = store.get(USER_DATA_KEY)?;

        match (token, user) {
            (Some(token), Some(raw_user)) => match serde_json::from_str::<AdminUser>(&raw_user) {
                Ok(user) => {
                    debug!(username = %user.username, "restored session");
                    Ok(AuthState::Authenticated {
                        token: SecretString::from(token),
                        user,
                    })
                }
                Err(e) => {
                    warn!(error = %e, "stored user record is unreadable, clearing session");
                    store.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY])?;
                    Ok(AuthState::Anonymous)
                }
            },
            (None, None) => Ok(AuthState::Anonymous),
            _ => {
                warn!("incomplete stored session, clearing");
                store.remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY])?;
                Ok(AuthState::Anonymous)
            }
        }
    }

    /// Persist a new session and publish it.
    pub fn establish(&self, token: String, user: AdminUser) -> Result<(), CoreError> {
        let user_json = serde_json::to_string(&user).map_err(|e| CoreError::Decode {
            message: format!("could not encode user record: {e}"),
        })?;
        self.inner
            .store
            .set_many(&[(AUTH_TOKEN_KEY, &token), (USER_DATA_KEY, &user_json)])?;

        info!(username = %user.username, "logged in");
        self.inner.state.send_replace(AuthState::Authenticated {
            token: SecretString::from(token),
            user,
        });
        Ok(())
    }

    /// Drop the session locally. The state becomes anonymous even when the
    /// store cannot be cleared; the storage error is still returned.
    pub fn clear(&self) -> Result<(), CoreError> {
        let result = self
            .inner
            .store
            .remove_many(&[AUTH_TOKEN_KEY, USER_DATA_KEY]);
        self.inner.state.send_replace(AuthState::Anonymous);
        result.map_err(CoreError::from)
    }

    // ── State observation ────────────────────────────────────────────

    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to auth state changes.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    /// Handler to register with the API client for 401 responses.
    pub fn unauthorized_handler(&self) -> Arc<dyn UnauthorizedHandler> {
        Arc::new(AutoLogout {
            session: Arc::downgrade(&self.inner),
        })
    }
}

/// Flips the state to anonymous after the client has cleared the store.
struct AutoLogout {
    session: Weak<SessionInner>,
}

impl UnauthorizedHandler for AutoLogout {
    fn session_expired(&self) {
        if let Some(session) = self.session.upgrade() {
            session.state.send_replace(AuthState::Anonymous);
            info!("logged out after session expiry");
        }
    }
}
