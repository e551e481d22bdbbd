// cookiefy-core: Session state and admin workflows between cookiefy-api and the CLI.

pub mod config;
pub mod console;
pub mod editor;
pub mod error;
pub mod session;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ConsoleConfig, TlsVerification};
pub use console::Console;
pub use editor::{SiteChanges, SiteDraft};
pub use error::CoreError;
pub use session::{AuthState, SessionManager};
pub use store::FileSessionStore;

// Re-export the API types consumers handle directly.
pub use cookiefy_api::models::{
    AdminUser, Hashtag, Id, ListSummary, Restaurant, SearchResults, Site, SiteSummary, SiteUpdate,
    Stats, UserSummary,
};
pub use cookiefy_api::{MemorySessionStore, Resource, SearchQuery, SessionStore, UploadFile};
