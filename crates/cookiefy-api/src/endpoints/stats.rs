// Statistics endpoints

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, Stats};

impl ApiClient {
    /// `GET /stats/overview`
    pub async fn stats_overview(&self) -> Result<Stats, Error> {
        debug!("fetching stats overview");
        self.get("/stats/overview").await
    }

    /// `GET /stats/restaurants/{id}`
    pub async fn restaurant_stats(&self, id: &Id) -> Result<Stats, Error> {
        debug!(%id, "fetching restaurant stats");
        self.get(&format!("/stats/restaurants/{id}")).await
    }
}
