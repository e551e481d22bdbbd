// Search endpoint
//
// `GET /posts/search` takes the token both as a bearer header and as an
// explicit `token` query parameter.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{SearchResponse, SearchResults};
use crate::request::ApiRequest;

/// Parameters of one search call.
#[derive(Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SearchQuery {
    pub input: String,
    pub is_site: bool,
    pub is_list: bool,
    pub is_user: bool,
    pub is_admin: bool,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub city: Option<String>,
    pub cuisine: Option<String>,
    /// Explicit token; the stored one is used when absent.
    pub token: Option<String>,
}

impl SearchQuery {
    /// Search sites, lists and users for `input`.
    pub fn everything(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            is_site: true,
            is_list: true,
            is_user: true,
            ..Self::default()
        }
    }

    fn params(&self, stored_token: Option<String>) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("input", self.input.trim().to_owned()),
            ("is_site", self.is_site.to_string()),
            ("is_list", self.is_list.to_string()),
            ("is_user", self.is_user.to_string()),
            ("is_admin", self.is_admin.to_string()),
        ];
        if let Some(lat) = self.lat {
            params.push(("lat", lat.to_string()));
        }
        if let Some(lon) = self.lon {
            params.push(("lon", lon.to_string()));
        }
        if let Some(city) = non_blank(self.city.as_deref()) {
            params.push(("city", city));
        }
        if let Some(cuisine) = non_blank(self.cuisine.as_deref()) {
            params.push(("cuisine", cuisine));
        }
        if let Some(token) = self.token.clone().or(stored_token) {
            params.push(("token", token));
        }
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl ApiClient {
    /// Search sites, lists and users.
    ///
    /// `GET /posts/search`
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResults, Error> {
        debug!(input = %query.input, "searching");
        let stored = if query.token.is_some() {
            None
        } else {
            self.stored_token().await
        };
        let mut req = ApiRequest::get("/posts/search").queries(query.params(stored));
        let resp: SearchResponse = self.execute(&mut req).await?;
        resp.into_result()
    }
}
