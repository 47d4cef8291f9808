//! Contact form submission and the admin inquiry inbox.

mod common;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::{Method, StatusCode};
use common::{admin_token, body_json, delete_auth, get, get_auth, json_request, put_json_auth};
use serde_json::{json, Value};
use logicton_notify::{ContactMessage, NotificationChannel, NotifyError};
use sqlx::PgPool;

/// A channel whose relay never answers in time.
struct StalledChannel;

#[async_trait]
impl NotificationChannel for StalledChannel {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn send(&self, _message: &ContactMessage) -> Result<(), NotifyError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(())
    }
}

fn valid_contact() -> Value {
    json!({
        "name": "Somchai Jaidee",
        "email": "somchai@example.com",
        "phone": "+66 81 234 5678",
        "company": "Jaidee Co.",
        "subject": "New website",
        "message": "We would like a quote for a company website.",
        "language": "en"
    })
}

async fn submit(test: &common::TestApp, body: Value, ip: &str) -> axum::response::Response {
    json_request(
        test.app(),
        Method::POST,
        "/api/contact",
        body,
        None,
        &[("x-forwarded-for", ip)],
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_submission_is_stored_and_notified(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = submit(&test, valid_contact(), "203.0.113.10").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Contact form submitted successfully");
    let id = json["data"]["id"].as_str().unwrap();
    assert!(id.starts_with("inquiry-"));

    assert_eq!(test.notifications.count(), 1);
    let messages = test.notifications.messages.lock().unwrap();
    assert_eq!(messages[0].subject, "New Contact Form Message: New website");
    assert!(messages[0].text.contains("somchai@example.com"));
    drop(messages);

    let inbox = body_json(
        get_auth(test.app(), "/api/contact/inquiries", &admin_token(&test)).await,
    )
    .await;
    let inquiries = inbox["data"]["inquiries"].as_array().unwrap();
    assert_eq!(inquiries.len(), 1);
    assert_eq!(inquiries[0]["id"], id);
    assert_eq!(inquiries[0]["status"], "new");
    assert_eq!(inquiries[0]["ipAddress"], "203.0.113.10");
    assert_eq!(inbox["data"]["stats"]["total"], 1);
    assert_eq!(inbox["data"]["stats"]["new"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stalled_notification_does_not_fail_a_saved_submission(pool: PgPool) {
    let test = common::build_test_app_with(
        pool,
        |config| {
            config.request_timeout_secs = 2;
            config.notify_timeout = Duration::from_millis(200);
        },
        vec![Arc::new(StalledChannel)],
    );

    let response = submit(&test, valid_contact(), "203.0.113.11").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(test.notifications.count(), 1);

    let inbox = body_json(
        get_auth(test.app(), "/api/contact/inquiries", &admin_token(&test)).await,
    )
    .await;
    assert_eq!(inbox["data"]["stats"]["total"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_email_lists_field_error(pool: PgPool) {
    let test = common::build_test_app(pool);
    let mut body = valid_contact();
    body.as_object_mut().unwrap().remove("email");

    let response = submit(&test, body, "203.0.113.11").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["errors"]["email"], "Email is required");
    assert_eq!(test.notifications.count(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn thai_submission_gets_thai_errors(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = submit(
        &test,
        json!({"name": "สมชาย", "email": "not-an-email", "subject": "s", "message": "m", "language": "th"}),
        "203.0.113.12",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["errors"]["email"], "รูปแบบอีเมลไม่ถูกต้อง");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sixth_submission_from_one_ip_is_limited(pool: PgPool) {
    let test = common::build_test_app(pool);

    for i in 0..5 {
        let response = submit(&test, valid_contact(), "198.51.100.7, 10.0.0.1").await;
        assert_eq!(response.status(), StatusCode::OK, "submission {} should pass", i + 1);
    }

    let response = submit(&test, valid_contact(), "198.51.100.7").await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    let json = body_json(response).await;
    assert_eq!(json["code"], "RATE_LIMITED");

    // Other clients are unaffected.
    let other = submit(&test, valid_contact(), "198.51.100.8").await;
    assert_eq!(other.status(), StatusCode::OK);
    assert_eq!(test.notifications.count(), 6);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_client_ip_is_not_limited(pool: PgPool) {
    let test = common::build_test_app(pool);

    for _ in 0..7 {
        let response = json_request(
            test.app(),
            Method::POST,
            "/api/contact",
            valid_contact(),
            None,
            &[],
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inbox_requires_admin(pool: PgPool) {
    let test = common::build_test_app(pool);
    let response = get(test.app(), "/api/contact/inquiries").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_update_and_delete(pool: PgPool) {
    let test = common::build_test_app(pool);
    let token = admin_token(&test);

    let submitted = body_json(submit(&test, valid_contact(), "203.0.113.20").await).await;
    let id = submitted["data"]["id"].as_str().unwrap().to_string();

    let response = put_json_auth(
        test.app(),
        &format!("/api/contact/inquiries/{id}/status"),
        json!({"status": "replied"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "replied");

    let replied = body_json(
        get_auth(test.app(), "/api/contact/inquiries?status=replied", &token).await,
    )
    .await;
    assert_eq!(replied["data"]["inquiries"].as_array().unwrap().len(), 1);
    let fresh = body_json(get_auth(test.app(), "/api/contact/inquiries?status=new", &token).await)
        .await;
    assert_eq!(fresh["data"]["inquiries"], json!([]));

    let deleted = delete_auth(test.app(), &format!("/api/contact/inquiries/{id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let missing = put_json_auth(
        test.app(),
        &format!("/api/contact/inquiries/{id}/status"),
        json!({"status": "read"}),
        &token,
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
