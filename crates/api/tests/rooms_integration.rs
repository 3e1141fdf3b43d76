//! Integration tests for room inventory and the availability search.
//!
//! These tests require a running PostgreSQL instance (TEST_DATABASE_URL).

mod common;

use axum::http::{Method, StatusCode};
use common::{
    book, create_admin, create_client, create_room, create_user, delete_request_with_auth,
    error_fields, get_request_with_auth, json_request, room_json, send, setup,
    AuthenticatedUser,
};
use serde_json::{json, Value};

fn availability_uri(date_in: &str, date_out: &str, guests: i32) -> String {
    format!(
        "/api/v1/room/availability?date_in={}&date_out={}&guests={}",
        date_in, date_out, guests
    )
}

fn lists_room(response: &Value, room: &Value) -> bool {
    response["available_rooms"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["room_id"] == room["id"])
}

async fn search(app: &axum::Router, user: &AuthenticatedUser, uri: &str) -> Value {
    let (status, body) = send(app, get_request_with_auth(uri, &user.access_token)).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_admin_creates_room() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let room = create_room(&app, &admin, room_json(2, "150.00")).await;

    assert_eq!(room["type"], "double");
    assert_eq!(room["status"], "available");
    assert_eq!(room["price_for_night"], "150.00");
    assert_eq!(room["capacity"], 2);
    assert_eq!(room["is_reserved"], false);
    assert_eq!(room["amenities"]["wifi"], true);
}

#[tokio::test]
async fn test_room_defaults() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let mut body = room_json(1, "80.00");
    body.as_object_mut().unwrap().remove("type");
    body.as_object_mut().unwrap().remove("status");
    body.as_object_mut().unwrap().remove("description");

    let room = create_room(&app, &admin, body).await;
    assert_eq!(room["type"], "single");
    assert_eq!(room["status"], "available");
    assert_eq!(room["description"], "");
}

#[tokio::test]
async fn test_room_validation() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let mut body = room_json(0, "-5.00");
    body["amenities"] = json!({"wifi": true});

    let (status, response) = send(
        &app,
        json_request(Method::POST, "/api/v1/room", body, Some(&admin.access_token)),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = error_fields(&response);
    assert!(fields.contains(&"capacity".to_string()), "{:?}", fields);
    assert!(fields.contains(&"price_for_night".to_string()), "{:?}", fields);
    assert!(fields.contains(&"amenities".to_string()), "{:?}", fields);
}

#[tokio::test]
async fn test_unknown_room_type_is_rejected() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let mut body = room_json(2, "100.00");
    body["type"] = json!("penthouse");

    let (status, response) = send(
        &app,
        json_request(Method::POST, "/api/v1/room", body, Some(&admin.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");
}

#[tokio::test]
async fn test_regular_user_reads_but_cannot_write() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;
    let user = create_user(&app, None).await;
    let room = create_room(&app, &admin, room_json(2, "120.00")).await;
    let uri = format!("/api/v1/room/{}", room["id"]);

    let (status, _) = send(&app, get_request_with_auth("/api/v1/room", &user.access_token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = send(&app, get_request_with_auth(&uri, &user.access_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], room["id"]);

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/api/v1/room", room_json(2, "1.00"), Some(&user.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(Method::PATCH, &uri, json!({"status": "cleaning"}), Some(&user.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &user.access_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_patch_and_delete_room() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;
    let room = create_room(&app, &admin, room_json(2, "120.00")).await;
    let uri = format!("/api/v1/room/{}", room["id"]);

    let (status, updated) = send(
        &app,
        json_request(
            Method::PATCH,
            &uri,
            json!({"status": "maintenance", "price_for_night": "135.50"}),
            Some(&admin.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["status"], "maintenance");
    assert_eq!(updated["price_for_night"], "135.50");
    assert_eq!(updated["capacity"], 2);

    let (status, _) = send(&app, delete_request_with_auth(&uri, &admin.access_token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get_request_with_auth(&uri, &admin.access_token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// ============================================================================
// Availability
// ============================================================================

#[tokio::test]
async fn test_availability_filters_status_and_capacity() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;
    let user = create_user(&app, None).await;

    let fits = create_room(&app, &admin, room_json(3, "150.00")).await;
    let too_small = create_room(&app, &admin, room_json(1, "90.00")).await;
    let mut maintenance = room_json(4, "150.00");
    maintenance["status"] = json!("maintenance");
    let maintenance = create_room(&app, &admin, maintenance).await;

    let body = search(&app, &user, &availability_uri("2099-12-25", "2099-12-27", 2)).await;

    assert!(lists_room(&body, &fits));
    assert!(!lists_room(&body, &too_small));
    assert!(!lists_room(&body, &maintenance));

    assert_eq!(body["date_in"], "2099-12-25");
    assert_eq!(body["guests"], 2);
    assert_eq!(
        body["total_available"],
        body["available_rooms"].as_array().unwrap().len()
    );

    let quoted = body["available_rooms"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["room_id"] == fits["id"])
        .unwrap();
    assert_eq!(quoted["nights"], 2);
    assert_eq!(quoted["price_per_night"], "150.00");
    assert_eq!(quoted["total_price"], "300.00");
}

#[tokio::test]
async fn test_availability_excludes_booked_rooms_but_not_cancelled() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;
    let client = create_client(&app, &admin, None).await;

    let booked = create_room(&app, &admin, room_json(2, "100.00")).await;
    let cancelled = create_room(&app, &admin, room_json(2, "100.00")).await;

    let (status, _) = book(
        &app,
        &admin,
        json!({
            "date_in": "2099-06-10", "date_out": "2099-06-15",
            "client": client["id"], "room": booked["id"], "status": "confirmed"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = book(
        &app,
        &admin,
        json!({
            "date_in": "2099-06-10", "date_out": "2099-06-15",
            "client": client["id"], "room": cancelled["id"], "status": "cancelled"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let overlapping = search(&app, &admin, &availability_uri("2099-06-12", "2099-06-14", 1)).await;
    assert!(!lists_room(&overlapping, &booked));
    assert!(lists_room(&overlapping, &cancelled));

    // Checkout day is free for the next guest
    let adjacent = search(&app, &admin, &availability_uri("2099-06-15", "2099-06-17", 1)).await;
    assert!(lists_room(&adjacent, &booked));
}

#[tokio::test]
async fn test_availability_room_type_filter() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let double = create_room(&app, &admin, room_json(2, "100.00")).await;
    let mut suite = room_json(2, "400.00");
    suite["type"] = json!("suit");
    let suite = create_room(&app, &admin, suite).await;

    let body = search(
        &app,
        &admin,
        &format!("{}&room_type=suit", availability_uri("2099-03-01", "2099-03-02", 1)),
    )
    .await;
    assert!(lists_room(&body, &suite));
    assert!(!lists_room(&body, &double));
}

#[tokio::test]
async fn test_availability_query_validation() {
    let (pool, app) = setup().await;
    let admin = create_admin(&pool, &app).await;

    let cases = [
        ("/api/v1/room/availability", "date_in and date_out parameters are required"),
        (
            "/api/v1/room/availability?date_in=2099-13-01&date_out=2099-12-02",
            "Invalid date format. Use YYYY-MM-DD",
        ),
        (
            "/api/v1/room/availability?date_in=2099-12-05&date_out=2099-12-02",
            "date_out must be after date_in",
        ),
        (
            "/api/v1/room/availability?date_in=2000-01-01&date_out=2000-01-05",
            "date_in cannot be in the past",
        ),
        (
            "/api/v1/room/availability?date_in=2099-12-01&date_out=2099-12-02&guests=0",
            "guests must be a positive integer",
        ),
        (
            "/api/v1/room/availability?date_in=2099-12-01&date_out=2099-12-02&room_type=castle",
            "Invalid room_type. Use one of: single, double, twin, suit, deluxe",
        ),
    ];

    for (uri, message) in cases {
        let (status, body) = send(&app, get_request_with_auth(uri, &admin.access_token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["message"], message, "{}", uri);
    }
}

#[tokio::test]
async fn test_availability_requires_authentication() {
    let (_pool, app) = setup().await;

    let (status, _) = send(
        &app,
        json_request(
            Method::GET,
            &availability_uri("2099-12-25", "2099-12-27", 1),
            json!(null),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
