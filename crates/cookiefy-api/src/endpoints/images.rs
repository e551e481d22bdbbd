// Image upload endpoint
//
// The upload route authenticates through the `token` query parameter; the
// bearer header is attached as well by the request phase.

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Ack, Id};
use crate::request::{ApiRequest, UploadFile};

impl ApiClient {
    /// Upload a site's cover image.
    ///
    /// `POST /images/site/upload-image/?token=..&site_id=..` (multipart, part `file`)
    pub async fn upload_site_image(&self, id: &Id, file: UploadFile) -> Result<Option<String>, Error> {
        debug!(%id, file = %file.file_name, size = file.bytes.len(), "uploading site image");
        let token = self.stored_token().await;
        let mut req = ApiRequest::post("/images/site/upload-image/")
            .query_opt("token", token)
            .query("site_id", id)
            .file("file", file);
        let ack: Ack = self.execute(&mut req).await?;
        ack.into_result()
    }
}
