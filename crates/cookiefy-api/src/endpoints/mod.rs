// Cookiefy endpoint groups
//
// One file per backend area, each adding inherent methods to `ApiClient`.
// No retries or backoff happen here; callers decide what to do with errors.

pub mod auth;
pub mod images;
pub mod resources;
pub mod search;
pub mod sites;
pub mod stats;

pub use resources::Resource;
pub use search::SearchQuery;
