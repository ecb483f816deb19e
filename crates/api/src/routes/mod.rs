pub mod auth;
pub mod health;
pub mod jobs;
pub mod notification;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws?token=<jwt>                        WebSocket (authenticated upgrade)
///
/// /auth/register                         register (public)
/// /auth/login                            login (public)
///
/// /jobs                                  post job (owner)
/// /jobs/open                             list open jobs (?limit, offset)
/// /jobs/mine                             owner's jobs (?status_id, limit, offset)
/// /jobs/walker                           walker's jobs
/// /jobs/{id}                             job detail
/// /jobs/{id}/image                       set job image (owner, PUT)
/// /jobs/{id}/assign                      take job (walker, POST)
/// /jobs/{id}/on-my-way                   walker departing (POST)
/// /jobs/{id}/position                    walker position update (POST)
/// /jobs/{id}/walker-position             last walker position (owner, GET)
/// /jobs/{id}/complete                    finish job (walker, POST)
/// /jobs/{id}/cancel                      cancel assignment (POST)
///
/// /notifications                         list (?unread_only, limit, offset)
/// /notifications/read-all                mark all read (POST)
/// /notifications/unread-count            unread count (GET)
/// /notifications/{id}/read               mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket endpoint (token authenticated in the query string).
        .route("/ws", get(ws::ws_handler))
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Job posting, discovery, and the assignment lifecycle.
        .nest("/jobs", jobs::router())
        // Per-user notification inbox.
        .nest("/notifications", notification::router())
}
