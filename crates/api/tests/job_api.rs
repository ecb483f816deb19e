//! HTTP-level integration tests for job posting and discovery.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get_auth, post_json_auth, put_json_auth};
use sqlx::PgPool;

fn job_body() -> serde_json::Value {
    serde_json::json!({
        "title": "Morning walk for Biscuit",
        "description": "45 minutes, easy pace",
        "location": "Lalbagh west gate",
        "coordinates": [12.9507, 77.5848],
        "pay_cents": 35000,
    })
}

/// Posting a job returns 201 and the row starts open with the site
/// coordinates stored.
#[sqlx::test(migrations = "../db/migrations")]
async fn owner_posts_job(pool: PgPool) {
    let (owner, token) = create_test_user(&pool, "owner@test.com", "owner").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/jobs",
        &token,
        job_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["owner_id"], owner.id);
    assert_eq!(json["data"]["status_id"], 1);
    assert_eq!(json["data"]["latitude"], 12.9507);
    assert_eq!(json["data"]["longitude"], 77.5848);
    assert!(json["data"]["assigned_walker_id"].is_null());
}

/// Walkers cannot post jobs.
#[sqlx::test(migrations = "../db/migrations")]
async fn walker_cannot_post(pool: PgPool) {
    let (_walker, token) = create_test_user(&pool, "walker@test.com", "walker").await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/jobs",
        &token,
        job_body(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Validation failures (empty title, one-element coordinates) return 400.
#[sqlx::test(migrations = "../db/migrations")]
async fn post_job_validation(pool: PgPool) {
    let (_owner, token) = create_test_user(&pool, "owner@test.com", "owner").await;

    let mut empty_title = job_body();
    empty_title["title"] = serde_json::json!("");
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs",
        &token,
        empty_title,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut bad_coords = job_body();
    bad_coords["coordinates"] = serde_json::json!([12.95]);
    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/jobs",
        &token,
        bad_coords,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Open listing shows unassigned jobs only, and role-scoped listings show
/// the right rows to the right people.
#[sqlx::test(migrations = "../db/migrations")]
async fn listings_are_scoped(pool: PgPool) {
    let (_owner, owner_token) = create_test_user(&pool, "owner@test.com", "owner").await;
    let (walker, walker_token) = create_test_user(&pool, "walker@test.com", "walker").await;

    let created = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs",
        &owner_token,
        job_body(),
    )
    .await;
    let job_id = body_json(created).await["data"]["id"]
        .as_i64()
        .expect("job id");

    let open = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs/open",
        &walker_token,
    )
    .await;
    let json = body_json(open).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));

    let mine = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs/mine",
        &owner_token,
    )
    .await;
    let json = body_json(mine).await;
    assert_eq!(json["data"][0]["id"], job_id);

    // The walker has nothing yet.
    let walker_jobs = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs/walker",
        &walker_token,
    )
    .await;
    let json = body_json(walker_jobs).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));

    // After assigning, the job leaves the open list and appears in the
    // walker's list.
    post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/jobs/{job_id}/assign"),
        &walker_token,
        serde_json::json!({}),
    )
    .await;

    let open = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs/open",
        &walker_token,
    )
    .await;
    let json = body_json(open).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));

    let walker_jobs = get_auth(
        common::build_test_app(pool),
        "/api/v1/jobs/walker",
        &walker_token,
    )
    .await;
    let json = body_json(walker_jobs).await;
    assert_eq!(json["data"][0]["assigned_walker_id"], walker.id);
}

/// Fetching a missing job returns 404 with the error envelope.
#[sqlx::test(migrations = "../db/migrations")]
async fn get_missing_job(pool: PgPool) {
    let (_owner, token) = create_test_user(&pool, "owner@test.com", "owner").await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/jobs/424242", &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
    assert_eq!(json["code"], "NOT_FOUND");
}

/// Only the posting owner may change the job image.
#[sqlx::test(migrations = "../db/migrations")]
async fn image_update_is_owner_only(pool: PgPool) {
    let (_owner, owner_token) = create_test_user(&pool, "owner@test.com", "owner").await;
    let (_other, other_token) = create_test_user(&pool, "other@test.com", "owner").await;

    let created = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/jobs",
        &owner_token,
        job_body(),
    )
    .await;
    let job_id = body_json(created).await["data"]["id"]
        .as_i64()
        .expect("job id");

    let forbidden = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/jobs/{job_id}/image"),
        &other_token,
        serde_json::json!({ "image": "https://cdn.test/biscuit.jpg" }),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let updated = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/jobs/{job_id}/image"),
        &owner_token,
        serde_json::json!({ "image": "https://cdn.test/biscuit.jpg" }),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    let json = body_json(updated).await;
    assert_eq!(json["data"]["image"], "https://cdn.test/biscuit.jpg");
}
