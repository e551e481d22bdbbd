// cookiefy-api: Async Rust client for the Cookiefy restaurant-discovery admin API

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod models;
pub mod request;
pub mod session;
pub mod transport;

pub use auth::{LoginForm, UnauthorizedHandler};
pub use client::ApiClient;
pub use endpoints::{Resource, SearchQuery};
pub use error::Error;
pub use request::{ApiRequest, UploadFile};
pub use session::{AUTH_TOKEN_KEY, MemorySessionStore, SessionStore, StorageError, USER_DATA_KEY};
pub use transport::{TlsMode, TransportConfig};
