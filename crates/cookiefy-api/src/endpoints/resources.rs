// Admin resource endpoints
//
// Users, lists, hashtags and restaurants share one REST shape:
// `GET/POST /{resource}` and `GET/PUT/DELETE /{resource}/{id}`, with bare
// JSON bodies (no status envelope).

use std::fmt;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Hashtag, Id, ListSummary, Restaurant, UserSummary};

/// A CRUD collection on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Users,
    Lists,
    Hashtags,
    Restaurants,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Self::Users => "/users",
            Self::Lists => "/lists",
            Self::Hashtags => "/hashtags",
            Self::Restaurants => "/restaurants",
        }
    }

    fn item_path(self, id: &Id) -> String {
        format!("{}/{id}", self.path())
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}

impl ApiClient {
    // ── Generic CRUD ─────────────────────────────────────────────────

    /// `GET /{resource}` with optional filter/paging parameters.
    pub async fn list_resource<T: DeserializeOwned>(
        &self,
        resource: Resource,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        debug!(%resource, "listing");
        self.get_with_params(resource.path(), params).await
    }

    /// `GET /{resource}/{id}`
    pub async fn get_resource<T: DeserializeOwned>(&self, resource: Resource, id: &Id) -> Result<T, Error> {
        debug!(%resource, %id, "fetching");
        self.get(&resource.item_path(id)).await
    }

    /// `POST /{resource}`
    pub async fn create_resource<T: DeserializeOwned>(
        &self,
        resource: Resource,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        debug!(%resource, "creating");
        self.post(resource.path(), body).await
    }

    /// `PUT /{resource}/{id}`
    pub async fn update_resource<T: DeserializeOwned>(
        &self,
        resource: Resource,
        id: &Id,
        body: &serde_json::Value,
    ) -> Result<T, Error> {
        debug!(%resource, %id, "updating");
        self.put(&resource.item_path(id), body).await
    }

    /// `DELETE /{resource}/{id}`
    pub async fn delete_resource(&self, resource: Resource, id: &Id) -> Result<(), Error> {
        debug!(%resource, %id, "deleting");
        self.delete(&resource.item_path(id)).await
    }

    // ── Typed listings ───────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<Vec<UserSummary>, Error> {
        self.list_resource(Resource::Users, &[]).await
    }

    pub async fn list_lists(&self) -> Result<Vec<ListSummary>, Error> {
        self.list_resource(Resource::Lists, &[]).await
    }

    pub async fn list_hashtags(&self) -> Result<Vec<Hashtag>, Error> {
        self.list_resource(Resource::Hashtags, &[]).await
    }

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, Error> {
        self.list_resource(Resource::Restaurants, &[]).await
    }
}
