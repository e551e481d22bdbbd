// Site endpoints
//
// Reads unwrap `{status, data: {content}}`; updates send the full record
// with the id as a query parameter and expect an acknowledgement.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Envelope, Id, Site, SiteContent, SiteUpdate};
use crate::request::ApiRequest;

impl ApiClient {
    /// Fetch one site with its image, hashtags and opening schedule.
    ///
    /// `GET /posts/get-site/{id}`
    pub async fn get_site(&self, id: &Id) -> Result<Site, Error> {
        debug!(%id, "fetching site");
        let env: Envelope<SiteContent> = self.get(&format!("/posts/get-site/{id}")).await?;
        Ok(env.into_result()?.content)
    }

    /// Replace a site's editable fields.
    ///
    /// `PUT /posts/update-site?site_id={id}`
    pub async fn update_site(&self, id: &Id, update: &SiteUpdate) -> Result<Option<String>, Error> {
        debug!(%id, "updating site");
        let mut req = ApiRequest::put("/posts/update-site")
            .query("site_id", id)
            .json(update)?;
        let ack: Ack = self.execute(&mut req).await?;
        ack.into_result()
    }
}
