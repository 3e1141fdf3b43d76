//! Integration tests for account registration and the admin user listing.
//!
//! These tests require a running PostgreSQL instance (TEST_DATABASE_URL).

mod common;

use axum::http::{Method, StatusCode};
use common::{
    client_profile_json, create_admin, create_user, delete_request_with_auth, error_fields,
    get_request_with_auth, json_request, register_json, send, setup, user_id_of,
};
use serde_json::json;
use sqlx::PgPool;

async fn count_users(pool: &PgPool, username: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn count_clients_with_document(pool: &PgPool, document: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM clients WHERE document_number = $1")
        .bind(document)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_register_without_profile() {
    let (pool, app) = setup().await;
    let payload = register_json(None);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/v1/register", payload.clone(), None),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["username"], payload["username"]);
    assert_eq!(body["user"]["email"], payload["email"]);
    assert!(body["user"].get("password").is_none());
    assert_eq!(count_users(&pool, payload["username"].as_str().unwrap()).await, 1);
}

#[tokio::test]
async fn test_register_with_profile_creates_linked_client() {
    let (pool, app) = setup().await;
    let mut profile = client_profile_json();
    profile["email"] = json!("ignored@example.com");
    let document = profile["document_number"].as_str().unwrap().to_string();
    let payload = register_json(Some(profile));

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/register", payload.clone(), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (linked, email): (bool, Option<String>) = sqlx::query_as(
        r#"
        SELECT c.user_id = u.id, c.email
        FROM clients c JOIN users u ON u.id = c.user_id
        WHERE c.document_number = $1
        "#,
    )
    .bind(&document)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert!(linked);
    // The profile shares the account email
    assert_eq!(email.as_deref(), payload["email"].as_str());
    assert_eq!(count_clients_with_document(&pool, &document).await, 1);
}

#[tokio::test]
async fn test_register_invalid_profile_leaves_nothing_behind() {
    let (pool, app) = setup().await;
    let mut profile = client_profile_json();
    profile["name"] = json!("");
    profile["phone"] = json!("12345");
    let document = profile["document_number"].as_str().unwrap().to_string();
    let payload = register_json(Some(profile));

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/v1/register", payload.clone(), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = error_fields(&body);
    assert!(fields.contains(&"client_profile.name".to_string()), "{:?}", fields);
    assert!(fields.contains(&"client_profile.phone".to_string()), "{:?}", fields);

    assert_eq!(count_users(&pool, payload["username"].as_str().unwrap()).await, 0);
    assert_eq!(count_clients_with_document(&pool, &document).await, 0);
}

#[tokio::test]
async fn test_register_duplicate_profile_document_rolls_back() {
    let (pool, app) = setup().await;
    let profile = client_profile_json();

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/api/v1/register",
            register_json(Some(profile.clone())),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let second = register_json(Some(profile));
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/api/v1/register", second.clone(), None),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_fields(&body).contains(&"client_profile.document_number".to_string()));
    assert_eq!(count_users(&pool, second["username"].as_str().unwrap()).await, 0);
}

#[tokio::test]
async fn test_register_empty_profile_is_ignored() {
    let (pool, app) = setup().await;
    let payload = register_json(Some(json!({})));

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/register", payload.clone(), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let profiles: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM clients c JOIN users u ON u.id = c.user_id WHERE u.username = $1",
    )
    .bind(payload["username"].as_str().unwrap())
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(profiles, 0);
}

#[tokio::test]
async fn test_register_password_mismatch() {
    let (_pool, app) = setup().await;
    let mut payload = register_json(None);
    payload["confirm_password"] = json!("Different123!");

    let (status, body) = send(&app, json_request(Method::POST, "/api/v1/register", payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&body), vec!["non_field_errors".to_string()]);
}

#[tokio::test]
async fn test_register_weak_password_and_bad_username() {
    let (_pool, app) = setup().await;
    let mut payload = register_json(None);
    payload["username"] = json!("a_b");
    payload["password"] = json!("short");
    payload["confirm_password"] = json!("short");

    let (status, body) = send(&app, json_request(Method::POST, "/api/v1/register", payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = error_fields(&body);
    assert!(fields.contains(&"username".to_string()));
    assert!(fields.contains(&"password".to_string()));
}

#[tokio::test]
async fn test_register_duplicate_username_and_email() {
    let (_pool, app) = setup().await;
    let payload = register_json(None);

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/register", payload.clone(), None),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, json_request(Method::POST, "/api/v1/register", payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = error_fields(&body);
    assert!(fields.contains(&"username".to_string()));
    assert!(fields.contains(&"email".to_string()));
}

#[tokio::test]
async fn test_user_listing_is_admin_only() {
    let (pool, app) = setup().await;
    let user = create_user(&app, None).await;
    let admin = create_admin(&pool, &app).await;

    let (status, _) = send(&app, get_request_with_auth("/api/v1/register", &user.access_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let user_id = user_id_of(&app, &admin, &user.username).await;
    let (status, body) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/register/{}", user_id), &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], user.username.as_str());
    assert_eq!(body["is_staff"], false);
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_deletes_user_and_profile() {
    let (pool, app) = setup().await;
    let profile = client_profile_json();
    let document = profile["document_number"].as_str().unwrap().to_string();
    let user = create_user(&app, Some(profile)).await;
    let admin = create_admin(&pool, &app).await;
    let user_id = user_id_of(&app, &admin, &user.username).await;

    let (status, _) = send(
        &app,
        delete_request_with_auth(&format!("/api/v1/register/{}", user_id), &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(count_users(&pool, &user.username).await, 0);
    assert_eq!(count_clients_with_document(&pool, &document).await, 0);

    let (status, _) = send(
        &app,
        get_request_with_auth(&format!("/api/v1/register/{}", user_id), &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_lookup_with_invalid_id_is_not_found() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let (status, body) = send(
        &app,
        get_request_with_auth("/api/v1/register/not-a-uuid", &admin.access_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_register_overlong_username_and_email() {
    let (_pool, app) = setup().await;
    let mut payload = register_json(None);
    payload["username"] = json!("a".repeat(160));
    payload["email"] = json!(format!("{}@example.com", "b".repeat(250)));

    let (status, body) = send(&app, json_request(Method::POST, "/api/v1/register", payload, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
    assert_eq!(body["error"], "validation_error");
    let fields = error_fields(&body);
    assert!(fields.contains(&"username".to_string()), "{:?}", fields);
    assert!(fields.contains(&"email".to_string()), "{:?}", fields);
}
