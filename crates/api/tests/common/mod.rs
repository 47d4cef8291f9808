#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use logicton_api::auth::jwt::{generate_access_token, JwtConfig};
use logicton_api::auth::password::hash_password;
use logicton_api::config::{AdminCredentials, RateLimitBackend, ServerConfig};
use logicton_api::router::build_app_router;
use logicton_api::state::AppState;
use logicton_core::rate_limit::{InMemoryRateLimiter, RateLimitPolicy};
use logicton_core::roles::ROLE_ADMIN;
use logicton_notify::{ContactMessage, ContactNotifier, NotificationChannel, NotifyError};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";

/// Notification channel that keeps every message it is given.
#[derive(Default)]
pub struct RecordingChannel {
    pub messages: Mutex<Vec<ContactMessage>>,
}

impl RecordingChannel {
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, message: &ContactMessage) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// A router plus the pieces tests inspect afterwards.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub notifications: Arc<RecordingChannel>,
    /// Holds `content/` and `public/`; removed on drop.
    pub dir: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn content_dir(&self) -> &Path {
        &self.config.content_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.config.public_dir
    }
}

/// Build a test `ServerConfig` rooted at `dir`.
pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![HeaderValue::from_static("http://localhost:3000")],
        request_timeout_secs: 30,
        notify_timeout: Duration::from_secs(10),
        jwt: JwtConfig {
            secret: "test-secret-key-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
        admin: AdminCredentials {
            username: ADMIN_USERNAME.to_string(),
            password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        },
        content_dir: dir.join("content"),
        public_dir: dir.join("public"),
        max_upload_bytes: 1024 * 1024,
        rate_limit_backend: RateLimitBackend::Memory,
        rate_limit: RateLimitPolicy::default(),
        email: None,
        chat_webhook_url: None,
    }
}

/// Build the full application router over `pool`, with an in-memory rate
/// limiter that never sweeps and a recording notification channel.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, |_| {}, Vec::new())
}

/// Like [`build_test_app`], with `configure` applied to the config and
/// `extra_channels` notified alongside the recording channel.
pub fn build_test_app_with(
    pool: PgPool,
    configure: impl FnOnce(&mut ServerConfig),
    extra_channels: Vec<Arc<dyn NotificationChannel>>,
) -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("content")).unwrap();
    std::fs::create_dir_all(dir.path().join("public/images")).unwrap();

    let mut config = test_config(dir.path());
    configure(&mut config);
    let notifications = Arc::new(RecordingChannel::default());
    let mut channels: Vec<Arc<dyn NotificationChannel>> = vec![notifications.clone()];
    channels.extend(extra_channels);

    let state = AppState::new(
        pool,
        config.clone(),
        Arc::new(InMemoryRateLimiter::with_sweep_probability(
            config.rate_limit,
            0.0,
        )),
        ContactNotifier::new(channels).with_timeout(config.notify_timeout),
    );
    let router = build_app_router(state, &config);

    TestApp {
        router,
        config,
        notifications,
        dir,
    }
}

/// Write a JSON content file below the test content directory.
pub fn write_content(app: &TestApp, relative: &str, value: &serde_json::Value) {
    let path = app.content_dir().join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_vec(value).unwrap()).unwrap();
}

/// A valid admin token for `app`.
pub fn admin_token(app: &TestApp) -> String {
    generate_access_token(ADMIN_USERNAME, ROLE_ADMIN, &app.config.jwt).unwrap()
}

/// A valid token for a signed-in user without the admin role.
pub fn editor_token(app: &TestApp) -> String {
    generate_access_token("editor", "editor", &app.config.jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    tokio::time::timeout(Duration::from_secs(30), app.oneshot(request))
        .await
        .expect("request timed out")
        .unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body, None, &[]).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    json_request(app, Method::POST, uri, body, Some(token), &[]).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    json_request(app, Method::PUT, uri, body, Some(token), &[]).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// JSON request with optional bearer token and extra headers.
pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
    headers: &[(&str, &str)],
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Multipart upload with a `file` part and an optional `path` part.
pub async fn upload(
    app: Router,
    token: Option<&str>,
    file: Option<(&str, &str, &[u8])>,
    path: Option<&str>,
) -> Response {
    const BOUNDARY: &str = "logicton-test-boundary";

    let mut body: Vec<u8> = Vec::new();
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    if let Some(path) = path {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"path\"\r\n\r\n{path}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
