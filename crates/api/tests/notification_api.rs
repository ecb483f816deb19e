//! HTTP-level integration tests for the notification inbox endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get_auth, post_json_auth};
use sqlx::PgPool;
use waggle_db::repositories::NotificationRepo;

/// Seed a job row so notifications have a valid foreign key.
async fn seed_job(pool: &PgPool, owner_id: i64) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO jobs (owner_id, title, description, location, pay_cents) \
         VALUES ($1, 'Walk', 'Short walk', 'Park', 1000) RETURNING id",
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .expect("job seed should succeed")
}

/// Listing returns newest first and honours unread_only.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_and_orders(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "owner@test.com", "owner").await;
    let job_id = seed_job(&pool, user.id).await;

    let first = NotificationRepo::create(&pool, user.id, job_id, "assignment", "first")
        .await
        .expect("create should succeed");
    let _second = NotificationRepo::create(&pool, user.id, job_id, "completed", "second")
        .await
        .expect("create should succeed");
    NotificationRepo::mark_read(&pool, first, user.id)
        .await
        .expect("mark should succeed");

    let all = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications",
        &token,
    )
    .await;
    assert_eq!(all.status(), StatusCode::OK);
    let json = body_json(all).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["data"][0]["message"], "second");

    let unread = get_auth(
        common::build_test_app(pool),
        "/api/v1/notifications?unread_only=true",
        &token,
    )
    .await;
    let json = body_json(unread).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["data"][0]["message"], "second");
}

/// Unread count reflects reads; read-all clears it.
#[sqlx::test(migrations = "../db/migrations")]
async fn unread_count_and_read_all(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "owner@test.com", "owner").await;
    let job_id = seed_job(&pool, user.id).await;

    for i in 0..3 {
        NotificationRepo::create(&pool, user.id, job_id, "assignment", &format!("n{i}"))
            .await
            .expect("create should succeed");
    }

    let count = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications/unread-count",
        &token,
    )
    .await;
    let json = body_json(count).await;
    assert_eq!(json["data"]["count"], 3);

    let read_all = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/notifications/read-all",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(read_all.status(), StatusCode::OK);
    let json = body_json(read_all).await;
    assert_eq!(json["data"]["updated"], 3);

    let count = get_auth(
        common::build_test_app(pool),
        "/api/v1/notifications/unread-count",
        &token,
    )
    .await;
    let json = body_json(count).await;
    assert_eq!(json["data"]["count"], 0);
}

/// Marking a single notification read is idempotent; other users' and
/// missing notifications come back 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn mark_read_scoping(pool: PgPool) {
    let (user, token) = create_test_user(&pool, "owner@test.com", "owner").await;
    let (_other, other_token) = create_test_user(&pool, "other@test.com", "walker").await;
    let job_id = seed_job(&pool, user.id).await;

    let id = NotificationRepo::create(&pool, user.id, job_id, "assignment", "hello")
        .await
        .expect("create should succeed");

    let first = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{id}/read"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);

    // Already read: still 200.
    let again = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{id}/read"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(again.status(), StatusCode::OK);

    // Someone else's notification does not exist as far as they know.
    let foreign = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/notifications/{id}/read"),
        &other_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let missing = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/notifications/424242/read",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

/// All inbox endpoints require authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn inbox_requires_auth(pool: PgPool) {
    let response = common::get(common::build_test_app(pool), "/api/v1/notifications").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
