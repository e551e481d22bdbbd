// Authentication endpoints
//
// Login posts an OAuth2 password-grant form without a bearer token and
// returns the raw payload; interpreting it is the session owner's job.

use reqwest::header::{ACCEPT, HeaderValue};
use tracing::debug;

use crate::auth::LoginForm;
use crate::client::ApiClient;
use crate::error::Error;
use crate::models::LoginResponse;
use crate::request::ApiRequest;

impl ApiClient {
    /// Exchange credentials for a bearer token.
    ///
    /// `POST /auth/login` (form-encoded, unauthenticated)
    pub async fn login(&self, form: &LoginForm) -> Result<LoginResponse, Error> {
        debug!(username = form.username(), "logging in");
        let mut req = ApiRequest::post("/auth/login")
            .form(form.fields())
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .skip_auth();
        self.execute(&mut req).await
    }

    /// Invalidate the current token server-side.
    ///
    /// `POST /auth/logout`. The body is ignored.
    pub async fn logout(&self) -> Result<(), Error> {
        debug!("logging out");
        self.execute_empty(&mut ApiRequest::post("/auth/logout"))
            .await
    }
}
