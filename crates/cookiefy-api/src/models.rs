// Cookiefy API response types
//
// The backend tags most payloads with `status: "success" | "error"`; each
// endpoint gets its own internally tagged schema so a shape mismatch fails
// at the boundary. Record types use `#[serde(default)]` liberally and keep
// unknown fields in `extra`, since the backend adds fields freely.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Identifiers ──────────────────────────────────────────────────────

/// Backend identifier: integer primary keys on most tables, strings on a few.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map_or_else(|_| Self::Str(s.to_owned()), Self::Int))
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(id) => id,
            Err(never) => match never {},
        }
    }
}

// ── Envelopes ────────────────────────────────────────────────────────

/// Render a loosely typed `message` field for humans.
fn message_text(message: Option<serde_json::Value>) -> Option<String> {
    match message? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// `{ "status": "success", "data": T }` or `{ "status": "error", "message": ... }`.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Success { data: T },
    Error {
        #[serde(default)]
        message: Option<serde_json::Value>,
    },
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, Error> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Error { message } => Err(Error::Rejected {
                message: message_text(message).unwrap_or_else(|| "request failed".into()),
            }),
        }
    }
}

/// Acknowledgement for mutations that return no data.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Ack {
    Success {
        #[serde(default)]
        message: Option<serde_json::Value>,
    },
    Error {
        #[serde(default)]
        message: Option<serde_json::Value>,
    },
}

impl Ack {
    /// Success message, if the backend sent one.
    pub fn into_result(self) -> Result<Option<String>, Error> {
        match self {
            Self::Success { message } => Ok(message_text(message)),
            Self::Error { message } => Err(Error::Rejected {
                message: message_text(message).unwrap_or_else(|| "request failed".into()),
            }),
        }
    }
}

// ── Authentication ───────────────────────────────────────────────────

/// Payload of `POST /auth/login`, left for the session owner to interpret.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LoginResponse {
    Success { data: LoginData },
    Error {
        #[serde(default)]
        message: Option<serde_json::Value>,
    },
}

impl LoginResponse {
    /// Failure message for an `error` payload.
    pub fn error_message(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => message_text(message.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub username: Option<String>,
}

/// The signed-in administrator as cached in the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub username: String,
}

// ── Search ───────────────────────────────────────────────────────────

/// Payload of `GET /posts/search`. Results travel under `message`.
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SearchResponse {
    Success {
        #[serde(default)]
        message: SearchResults,
    },
    Error {
        #[serde(default)]
        message: Option<serde_json::Value>,
    },
}

impl SearchResponse {
    pub fn into_result(self) -> Result<SearchResults, Error> {
        match self {
            Self::Success { message } => Ok(message),
            Self::Error { message } => Err(Error::Rejected {
                message: message_text(message).unwrap_or_else(|| "search failed".into()),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub sites: Vec<SiteSummary>,
    #[serde(default)]
    pub lists: Vec<ListSummary>,
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty() && self.lists.is_empty() && self.users.is_empty()
    }
}

/// Site card as returned by search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSummary {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub num_opinions: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub price: Option<String>,
    #[serde(default)]
    pub lists_count: Option<i64>,
    #[serde(default)]
    pub hashtags: Vec<Hashtag>,
}

// ── Sites ────────────────────────────────────────────────────────────

/// `data` of `GET /posts/get-site/{id}`.
#[derive(Debug, Deserialize)]
pub struct SiteContent {
    pub content: Site,
}

/// Full site record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Site {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub contact: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub is_vegan: Option<bool>,
    #[serde(default)]
    pub is_gluten_free: Option<bool>,
    #[serde(default)]
    pub is_halal: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub num_opinions: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub image: Option<SiteImage>,
    #[serde(default)]
    pub hashtags: Vec<Hashtag>,
    #[serde(default)]
    pub opening_schedule: Option<OpeningSchedule>,
    #[serde(default)]
    pub social_media: Vec<serde_json::Value>,
    #[serde(default)]
    pub lists_count: Option<i64>,
    /// Catch-all for fields not modelled above.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteImage {
    #[serde(default)]
    pub path: Option<String>,
}

/// Weekly opening hours keyed by `mon`..`sun`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpeningSchedule {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub weekly: BTreeMap<String, Vec<TimeRange>>,
    #[serde(default)]
    pub exceptions: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

/// Body of `PUT /posts/update-site`.
///
/// The backend replaces the whole record, so the non-editable fields
/// (address tail, coordinates, score) are sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct SiteUpdate {
    pub name: String,
    pub description: String,
    pub price: String,
    pub contact: String,
    pub website: String,
    pub street: String,
    pub city: String,
    pub cuisine_type: String,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_halal: bool,
    pub active: bool,
    pub province: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub score: f64,
    pub num_opinions: i64,
}

impl From<&Site> for SiteUpdate {
    fn from(site: &Site) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        Self {
            name: text(&site.name),
            description: text(&site.description),
            price: text(&site.price),
            contact: text(&site.contact),
            website: text(&site.website),
            street: text(&site.street),
            city: text(&site.city),
            cuisine_type: text(&site.cuisine_type),
            is_vegan: site.is_vegan.unwrap_or(false),
            is_gluten_free: site.is_gluten_free.unwrap_or(false),
            is_halal: site.is_halal.unwrap_or(false),
            active: site.active.unwrap_or(true),
            province: text(&site.province),
            region: text(&site.region),
            country: text(&site.country),
            lat: site.lat.unwrap_or_default(),
            lon: site.lon.unwrap_or_default(),
            score: site.score.unwrap_or_default(),
            num_opinions: site.num_opinions.unwrap_or_default(),
        }
    }
}

// ── Users, lists, hashtags, restaurants ──────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSummary {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sites_count: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub creator: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hashtag {
    #[serde(default)]
    pub id: Option<Id>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(default)]
    pub id: Option<Id>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub cuisine_type: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Statistics ───────────────────────────────────────────────────────

/// Open-ended metric map from `/stats/*`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Stats(pub BTreeMap<String, serde_json::Value>);

// ── Lenient field decoding ───────────────────────────────────────────

mod lenient {
    use serde::{Deserialize, Deserializer};

    /// Accept a string, a number or null where the backend is inconsistent
    /// (prices and phone numbers arrive as either).
    pub(super) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            Some(serde_json::Value::Object(map)) => map
                .get("username")
                .or_else(|| map.get("name"))
                .and_then(serde_json::Value::as_str)
                .map(String::from),
            Some(other) => Some(other.to_string()),
        })
    }
}
