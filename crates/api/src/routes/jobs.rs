//! Route definitions for the `/jobs` resource: posting, discovery, and
//! the assignment lifecycle.
//!
//! All endpoints require authentication; per-role checks live in the
//! handlers.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{assignment, jobs};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// POST   /                      -> post_job (owner)
/// GET    /open                  -> list_open_jobs
/// GET    /mine                  -> my_jobs (owner)
/// GET    /walker                -> walker_jobs (walker)
/// GET    /{id}                  -> get_job
/// PUT    /{id}/image            -> update_job_image (owner)
///
/// POST   /{id}/assign           -> assign_job (walker)
/// POST   /{id}/on-my-way        -> mark_on_my_way (assigned walker)
/// POST   /{id}/position         -> update_position (assigned walker)
/// GET    /{id}/walker-position  -> get_walker_position (owner)
/// POST   /{id}/complete         -> mark_complete (assigned walker)
/// POST   /{id}/cancel           -> cancel_assignment (owner or walker)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        // Posting and discovery
        .route("/", post(jobs::post_job))
        .route("/open", get(jobs::list_open_jobs))
        .route("/mine", get(jobs::my_jobs))
        .route("/walker", get(jobs::walker_jobs))
        .route("/{id}", get(jobs::get_job))
        .route("/{id}/image", put(jobs::update_job_image))
        // Assignment lifecycle
        .route("/{id}/assign", post(assignment::assign_job))
        .route("/{id}/on-my-way", post(assignment::mark_on_my_way))
        .route("/{id}/position", post(assignment::update_position))
        .route(
            "/{id}/walker-position",
            get(assignment::get_walker_position),
        )
        .route("/{id}/complete", post(assignment::mark_complete))
        .route("/{id}/cancel", post(assignment::cancel_assignment))
}
