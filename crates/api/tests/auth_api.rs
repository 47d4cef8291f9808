//! Admin login and token enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, ADMIN_PASSWORD, ADMIN_USERNAME};
use logicton_api::auth::jwt::validate_token;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_with_admin_credentials_returns_token(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["token_type"], "Bearer");
    assert_eq!(json["data"]["role"], "admin");
    assert_eq!(json["data"]["expires_in"], 3600);

    let token = json["data"]["access_token"].as_str().unwrap();
    let claims = validate_token(token, &test.config.jwt).unwrap();
    assert_eq!(claims.sub, ADMIN_USERNAME);
    assert_eq!(claims.role, "admin");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_password_returns_401(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({"username": ADMIN_USERNAME, "password": "nope"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn wrong_username_returns_same_401(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = post_json(
        test.app(),
        "/api/auth/login",
        json!({"username": "root", "password": ADMIN_PASSWORD}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid username or password");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn garbage_token_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get_auth(test.app(), "/api/contact/inquiries", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}
