// Request description
//
// An `ApiRequest` is plain data: method, path, query, body and per-call
// options. The client turns it into a reqwest request on every send, so the
// same instance can be re-sent and keeps its once-only 401 flag.

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

use crate::error::Error;

/// A file attached to a multipart request.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded` fields, in order.
    Form(Vec<(String, String)>),
    /// `multipart/form-data` file parts keyed by field name.
    Multipart(Vec<(String, UploadFile)>),
}

/// One backend call, independent of any particular client.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: RequestBody,
    skip_auth: bool,
    /// Set once the response phase has processed a 401 for this request.
    pub(crate) unauthorized_handled: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: RequestBody::Empty,
            skip_auth: false,
            unauthorized_handled: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    // ── Builders ─────────────────────────────────────────────────────

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    pub fn query_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn queries<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: ToString,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.to_string())));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json(mut self, body: &(impl Serialize + ?Sized)) -> Result<Self, Error> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.body = RequestBody::Form(fields);
        self
    }

    pub fn file(mut self, field: impl Into<String>, file: UploadFile) -> Self {
        let part = (field.into(), file);
        match &mut self.body {
            RequestBody::Multipart(parts) => parts.push(part),
            _ => self.body = RequestBody::Multipart(vec![part]),
        }
        self
    }

    /// Do not attach the stored bearer token (login).
    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &RequestBody {
        &self.body
    }

    pub fn is_skip_auth(&self) -> bool {
        self.skip_auth
    }

    /// Whether a 401 has already been processed for this request.
    pub fn unauthorized_handled(&self) -> bool {
        self.unauthorized_handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_opt_skips_absent_values() {
        let req = ApiRequest::get("/posts/search")
            .query("input", "pizza")
            .query_opt("lat", None::<f64>)
            .query_opt("lon", Some(2.17));
        assert_eq!(
            req.query_pairs(),
            [
                ("input".to_owned(), "pizza".to_owned()),
                ("lon".to_owned(), "2.17".to_owned())
            ]
        );
    }

    #[test]
    fn files_accumulate_into_one_multipart_body() {
        let file = || UploadFile {
            file_name: "a.jpg".into(),
            mime: "image/jpeg".into(),
            bytes: vec![1, 2, 3],
        };
        let req = ApiRequest::post("/x").file("file", file()).file("thumb", file());
        match req.body() {
            RequestBody::Multipart(parts) => assert_eq!(parts.len(), 2),
            other => panic!("expected multipart body, got {other:?}"),
        }
    }

    #[test]
    fn fresh_request_has_not_handled_401() {
        let req = ApiRequest::post("/auth/logout");
        assert!(!req.unauthorized_handled());
        assert!(!req.is_skip_auth());
    }
}
