#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cookiefy_api::models::{Hashtag, Id, LoginResponse, Site, SiteUpdate};
use cookiefy_api::{
    AUTH_TOKEN_KEY, ApiClient, ApiRequest, Error, LoginForm, MemorySessionStore, SearchQuery,
    SessionStore, USER_DATA_KEY, UnauthorizedHandler, UploadFile,
};

// ── Helpers ─────────────────────────────────────────────────────────

#[derive(Default)]
struct CountingHandler(AtomicUsize);

impl UnauthorizedHandler for CountingHandler {
    fn session_expired(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn signed_in_store() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_entries([
        (AUTH_TOKEN_KEY, "tok-123"),
        (USER_DATA_KEY, r#"{"username":"admin"}"#),
    ]))
}

fn client_for(server: &MockServer, store: Arc<MemorySessionStore>) -> (ApiClient, Arc<CountingHandler>) {
    let handler = Arc::new(CountingHandler::default());
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("{}/", server.uri())).unwrap(),
        store,
        Some(handler.clone()),
    );
    (client, handler)
}

fn site_json() -> serde_json::Value {
    json!({
        "id": 12,
        "name": "La Pepita",
        "description": "Tapas bar",
        "price": "€€",
        "city": "Barcelona",
        "is_vegan": false,
        "active": true,
        "score": 4.6,
        "num_opinions": 210,
        "lat": 41.39,
        "lon": 2.16,
        "image": {"path": "/img/12.jpg"},
        "hashtags": [{"id": 1, "name": "tapas"}],
        "opening_schedule": {
            "timezone": "Europe/Madrid",
            "weekly": {"mon": [{"start": "12:00", "end": "16:00"}]},
            "exceptions": []
        }
    })
}

// ── Request phase ───────────────────────────────────────────────────

#[tokio::test]
async fn test_stored_token_is_sent_as_bearer() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("GET"))
        .and(path("/stats/overview"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sites": 40})))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client.stats_overview().await.unwrap();
    assert_eq!(stats.0.get("sites"), Some(&json!(40)));
}

#[tokio::test]
async fn test_no_token_means_no_credential() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, Arc::new(MemorySessionStore::new()));

    Mock::given(method("GET"))
        .and(path("/stats/overview"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    client.stats_overview().await.unwrap();

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_login_skips_auth_and_posts_form() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("username=chef"))
        .and(body_string_contains("client_id=string"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"token": "fresh", "username": "chef"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let form = LoginForm::new(" Chef ", SecretString::from("pw"));
    let resp = client.login(&form).await.unwrap();
    assert!(matches!(resp, LoginResponse::Success { ref data } if data.token == "fresh"));

    let received = server.received_requests().await.unwrap();
    assert!(!received[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_login_error_payload_is_returned_not_raised() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, Arc::new(MemorySessionStore::new()));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "bad credentials"
        })))
        .mount(&server)
        .await;

    let form = LoginForm::new("chef", SecretString::from("wrong"));
    let resp = client.login(&form).await.unwrap();
    assert_eq!(resp.error_message().as_deref(), Some("bad credentials"));
}

// ── Response phase ──────────────────────────────────────────────────

#[tokio::test]
async fn test_401_clears_session_and_notifies_once() {
    let server = MockServer::start().await;
    let store = signed_in_store();
    let (client, handler) = client_for(&server, store.clone());

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
        .mount(&server)
        .await;

    let result = client.list_users().await;
    assert!(matches!(result, Err(Error::SessionExpired { .. })), "got {result:?}");
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
    assert_eq!(handler.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_login_401_carries_detail_and_clears_session() {
    let server = MockServer::start().await;
    let store = signed_in_store();
    let (client, handler) = client_for(&server, store.clone());

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"detail": "Incorrect username or password"})),
        )
        .mount(&server)
        .await;

    let form = LoginForm::new("admin", SecretString::from("wrong"));
    match client.login(&form).await {
        Err(Error::SessionExpired { message, .. }) => {
            assert_eq!(message.as_deref(), Some("Incorrect username or password"));
        }
        other => panic!("expected SessionExpired, got {other:?}"),
    }
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap(), None);
    assert_eq!(handler.0.load(Ordering::SeqCst), 1);
}

/// Records the thread every read runs on.
struct ThreadRecordingStore {
    inner: MemorySessionStore,
    readers: std::sync::Mutex<Vec<std::thread::ThreadId>>,
}

impl SessionStore for ThreadRecordingStore {
    fn get(&self, key: &str) -> Result<Option<String>, cookiefy_api::StorageError> {
        self.readers.lock().unwrap().push(std::thread::current().id());
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), cookiefy_api::StorageError> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), cookiefy_api::StorageError> {
        self.inner.remove(key)
    }
}

#[tokio::test]
async fn test_store_reads_run_off_the_async_task() {
    let server = MockServer::start().await;
    let store = Arc::new(ThreadRecordingStore {
        inner: MemorySessionStore::with_entries([(AUTH_TOKEN_KEY, "tok-123")]),
        readers: std::sync::Mutex::new(Vec::new()),
    });
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("{}/", server.uri())).unwrap(),
        store.clone(),
        None,
    );

    Mock::given(method("GET"))
        .and(path("/hashtags"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let _: serde_json::Value = client.get("/hashtags").await.unwrap();

    let readers = store.readers.lock().unwrap();
    assert_eq!(readers.len(), 1);
    assert_ne!(readers[0], std::thread::current().id());
}

#[tokio::test]
async fn test_resent_request_does_not_repeat_401_side_effects() {
    let server = MockServer::start().await;
    let store = signed_in_store();
    let (client, handler) = client_for(&server, store.clone());

    Mock::given(method("GET"))
        .and(path("/lists"))
        .respond_with(ResponseTemplate::new(401))
        .expect(2)
        .mount(&server)
        .await;

    let mut req = ApiRequest::get("/lists");
    let first = client.execute::<serde_json::Value>(&mut req).await;
    assert!(first.is_err_and(|e| e.is_auth_expired()));
    assert!(req.unauthorized_handled());

    // A token written after the first 401 must survive the retry.
    store.set(AUTH_TOKEN_KEY, "new-token").unwrap();
    let second = client.execute::<serde_json::Value>(&mut req).await;
    assert!(second.is_err_and(|e| e.is_auth_expired()));

    assert_eq!(handler.0.load(Ordering::SeqCst), 1);
    assert_eq!(store.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("new-token"));
}

#[tokio::test]
async fn test_server_error_carries_status_and_message() {
    let server = MockServer::start().await;
    let store = signed_in_store();
    let (client, handler) = client_for(&server, store.clone());

    Mock::given(method("GET"))
        .and(path("/posts/get-site/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Site not found"})))
        .mount(&server)
        .await;

    let err = client.get_site(&Id::Int(99)).await.unwrap_err();
    match &err {
        Error::Server { status, message, url } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "Site not found");
            assert!(url.ends_with("/posts/get-site/99"));
        }
        other => panic!("expected Server error, got {other:?}"),
    }
    assert!(err.is_not_found());
    assert_eq!(handler.0.load(Ordering::SeqCst), 0);
    assert!(store.get(AUTH_TOKEN_KEY).unwrap().is_some());
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = signed_in_store();
    let handler = Arc::new(CountingHandler::default());
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://{addr}/")).unwrap(),
        store.clone(),
        Some(handler.clone()),
    );

    let result = client.search(&SearchQuery::everything("pizza")).await;
    assert!(matches!(result, Err(Error::Network { .. })), "got {result:?}");
    assert_eq!(handler.0.load(Ordering::SeqCst), 0);
    assert!(store.get(AUTH_TOKEN_KEY).unwrap().is_some());
}

// ── Endpoints ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_sends_flags_and_stored_token() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("GET"))
        .and(path("/posts/search"))
        .and(query_param("input", "paella"))
        .and(query_param("is_site", "true"))
        .and(query_param("is_admin", "false"))
        .and(query_param("city", "Valencia"))
        .and(query_param("token", "tok-123"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": {
                "sites": [{"id": 5, "name": "Casa Carmela", "city": "Valencia"}],
                "lists": [{"id": 2, "name": "Arroces", "sites_count": 8, "creator": "marta"}],
                "users": []
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = SearchQuery {
        city: Some(" Valencia ".into()),
        ..SearchQuery::everything("paella")
    };
    let results = client.search(&query).await.unwrap();
    assert_eq!(results.sites[0].name.as_deref(), Some("Casa Carmela"));
    assert_eq!(results.lists[0].creator.as_deref(), Some("marta"));
    assert!(results.users.is_empty());
}

#[tokio::test]
async fn test_get_site_unwraps_content() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("GET"))
        .and(path("/posts/get-site/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {"content": site_json()}
        })))
        .mount(&server)
        .await;

    let site = client.get_site(&Id::Int(12)).await.unwrap();
    assert_eq!(site.name.as_deref(), Some("La Pepita"));
    assert_eq!(site.hashtags[0].name, "tapas");
    let schedule = site.opening_schedule.unwrap();
    assert_eq!(schedule.weekly["mon"][0].start, "12:00");
}

#[tokio::test]
async fn test_update_site_sends_id_and_body() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("PUT"))
        .and(path("/posts/update-site"))
        .and(query_param("site_id", "12"))
        .and(body_string_contains("\"name\":\"La Pepita Nova\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "Site updated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site: Site = serde_json::from_value(site_json()).unwrap();
    let mut update = SiteUpdate::from(&site);
    update.name = "La Pepita Nova".into();

    let msg = client.update_site(&Id::Int(12), &update).await.unwrap();
    assert_eq!(msg.as_deref(), Some("Site updated"));
}

#[tokio::test]
async fn test_rejected_update_surfaces_message() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("PUT"))
        .and(path("/posts/update-site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "message": "Site is locked"
        })))
        .mount(&server)
        .await;

    let site: Site = serde_json::from_value(site_json()).unwrap();
    let err = client
        .update_site(&Id::Int(12), &SiteUpdate::from(&site))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Rejected { ref message } if message == "Site is locked"));
}

#[tokio::test]
async fn test_upload_image_uses_query_token_and_multipart() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("POST"))
        .and(path("/images/site/upload-image/"))
        .and(query_param("token", "tok-123"))
        .and(query_param("site_id", "12"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"cover.jpg\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile {
        file_name: "cover.jpg".into(),
        mime: "image/jpeg".into(),
        bytes: b"jpegbytes".to_vec(),
    };
    client.upload_site_image(&Id::Int(12), file).await.unwrap();

    let received = server.received_requests().await.unwrap();
    let content_type = received[0].headers.get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_schema_mismatch_is_decode_error() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("GET"))
        .and(path("/posts/get-site/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let err = client.get_site(&Id::Int(3)).await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert!(body.contains("\"ok\"")),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

#[tokio::test]
async fn test_resource_crud_paths() {
    let server = MockServer::start().await;
    let (client, _) = client_for(&server, signed_in_store());

    Mock::given(method("POST"))
        .and(path("/hashtags"))
        .and(body_string_contains("\"name\":\"brunch\""))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 77, "name": "brunch"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/hashtags/77"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created: Hashtag = client
        .create_resource(cookiefy_api::Resource::Hashtags, &json!({"name": "brunch"}))
        .await
        .unwrap();
    assert_eq!(created.id, Some(Id::Int(77)));

    client
        .delete_resource(cookiefy_api::Resource::Hashtags, &Id::Int(77))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_base_path_prefix_is_kept() {
    let server = MockServer::start().await;
    let store = signed_in_store();
    let client = ApiClient::new(
        &format!("{}/api", server.uri()),
        &cookiefy_api::TransportConfig::default(),
        store,
        None,
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

#[tokio::test]
async fn test_truncated_success_body_is_a_decode_error() {
    use std::io::{Read, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut buf = [0_u8; 1024];
        let _ = conn.read(&mut buf);
        conn.write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\n\r\n{\"id\"")
            .unwrap();
    });

    let client = ApiClient::with_client(
        reqwest::Client::new(),
        Url::parse(&format!("http://{addr}/")).unwrap(),
        Arc::new(MemorySessionStore::new()),
        None,
    );
    let result = client.get::<serde_json::Value>("/stats/overview").await;
    assert!(matches!(result, Err(Error::Deserialization { .. })), "got {result:?}");
}
