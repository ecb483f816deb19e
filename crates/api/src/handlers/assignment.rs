//! Handlers for the job assignment lifecycle: assign, on-my-way, live
//! position relay, completion, and cancellation.
//!
//! Each transition follows the same shape: a plain read produces accurate
//! `NotFound`/`Forbidden`/`InvalidState` messages, then the actual write
//! is a single atomic conditional update in `JobRepo` whose WHERE clause
//! re-checks the expected pre-state. Under concurrent requests exactly
//! one caller wins; losers see a zero-row update and get `InvalidState`.
//! Notification delivery happens after the write commits, via the event
//! bus, and can never fail the transition.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use waggle_core::cancellation::{CancelCaller, CancellationContext, CancellationDecision};
use waggle_core::dispatch::{dispatch, JobTransition};
use waggle_core::error::CoreError;
use waggle_core::geo::Position;
use waggle_core::types::DbId;
use waggle_db::models::job::Job;
use waggle_db::models::status::JobStatus;
use waggle_db::repositories::{JobRepo, UserRepo};
use waggle_events::JobEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /jobs/{id}/position`.
#[derive(Debug, Deserialize)]
pub struct PositionUpdate {
    /// Client-order `[lat, lng]` pair.
    pub position: Vec<f64>,
}

/// Request body for `POST /jobs/{id}/cancel`.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    pub reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a job or fail with `NotFound`.
async fn find_job(pool: &sqlx::PgPool, job_id: DbId) -> AppResult<Job> {
    JobRepo::find_by_id(pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))
}

/// Verify the job is assigned and the caller is its walker.
fn ensure_assigned_walker(job: &Job, auth: &AuthUser) -> AppResult<()> {
    if job.status_id != JobStatus::Assigned.id() {
        return Err(AppError::Core(CoreError::invalid_state(
            "Job is not currently assigned",
        )));
    }
    if job.assigned_walker_id != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::forbidden(
            "Only the assigned walker can perform this action",
        )));
    }
    Ok(())
}

/// Fan a completed transition out to the notification channel.
///
/// Publishing is fire-and-forget: the HTTP response does not wait for
/// delivery, and a dead bus never fails the transition.
fn publish_transition(state: &AppState, job_id: DbId, transition: &JobTransition) {
    for d in dispatch(transition) {
        let mut event = JobEvent::new(d.event, d.recipient, job_id).with_payload(d.payload);
        if let Some(kind) = d.notification {
            event = event.with_notification(kind);
        }
        state.event_bus.publish(event);
    }
}

// ---------------------------------------------------------------------------
// Assign
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/assign
///
/// Take an open job as the calling walker. The job must be open with no
/// walker attached; concurrent takers race on the conditional update and
/// exactly one succeeds.
pub async fn assign_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_walker() {
        return Err(AppError::Core(CoreError::forbidden(
            "Only walkers can take jobs",
        )));
    }

    // Existence check only; the write below re-checks the state.
    find_job(&state.pool, job_id).await?;

    let job = JobRepo::assign(&state.pool, job_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::invalid_state(
                "Job is not open or already has a walker",
            ))
        })?;

    tracing::info!(job_id, walker_id = auth.user_id, "Job assigned");

    let walker_name = UserRepo::display_name(&state.pool, auth.user_id).await?;
    publish_transition(
        &state,
        job_id,
        &JobTransition::Assigned {
            job_id,
            title: job.title.clone(),
            owner_id: job.owner_id,
            walker_id: auth.user_id,
            walker_name,
        },
    );

    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// On my way
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/on-my-way
///
/// The assigned walker signals they have started moving. Begins live
/// position tracking.
pub async fn mark_on_my_way(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = find_job(&state.pool, job_id).await?;
    ensure_assigned_walker(&current, &auth)?;
    if current.on_my_way {
        return Err(AppError::Core(CoreError::invalid_state(
            "Walker is already on the way",
        )));
    }

    let job = JobRepo::mark_on_my_way(&state.pool, job_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::invalid_state(
                "Job is no longer assigned to this walker",
            ))
        })?;

    tracing::info!(job_id, walker_id = auth.user_id, "Walker on the way");

    let walker_name = UserRepo::display_name(&state.pool, auth.user_id).await?;
    publish_transition(
        &state,
        job_id,
        &JobTransition::OnMyWay {
            job_id,
            title: job.title.clone(),
            owner_id: job.owner_id,
            walker_id: auth.user_id,
            walker_name,
        },
    );

    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Position relay
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/position
///
/// Store the walker's latest position and relay it to the owner. Only
/// legal while on-my-way. Last-write-wins; the server does not rate-limit
/// (clients should throttle to roughly one update per second or two).
pub async fn update_position(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<PositionUpdate>,
) -> AppResult<impl IntoResponse> {
    let position = Position::from_pair(&input.position).map_err(AppError::Core)?;

    let current = find_job(&state.pool, job_id).await?;
    ensure_assigned_walker(&current, &auth)?;
    if !current.on_my_way {
        return Err(AppError::Core(CoreError::invalid_state(
            "Walker has not marked on-my-way",
        )));
    }

    let job = JobRepo::update_position(&state.pool, job_id, auth.user_id, position)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::invalid_state(
                "Job is no longer being tracked",
            ))
        })?;

    tracing::debug!(job_id, walker_id = auth.user_id, "Walker position updated");

    publish_transition(
        &state,
        job_id,
        &JobTransition::PositionUpdated {
            job_id,
            owner_id: job.owner_id,
            position,
        },
    );

    Ok(Json(MessageResponse::new("Position updated")))
}

/// GET /api/v1/jobs/{id}/walker-position
///
/// Read the walker's last known position as a client-order `[lat, lng]`
/// pair, or `null` if none is stored. Job owner only.
pub async fn get_walker_position(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = find_job(&state.pool, job_id).await?;

    if job.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::forbidden(
            "Only the job owner can view the walker position",
        )));
    }

    let position = job.walker_position().map(Position::to_pair);
    Ok(Json(DataResponse { data: position }))
}

// ---------------------------------------------------------------------------
// Complete
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/complete
///
/// The assigned walker marks the job done. Terminal state; both parties
/// are notified.
pub async fn mark_complete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let current = find_job(&state.pool, job_id).await?;
    ensure_assigned_walker(&current, &auth)?;

    let job = JobRepo::complete(&state.pool, job_id, auth.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::invalid_state(
                "Job is no longer assigned to this walker",
            ))
        })?;

    tracing::info!(job_id, walker_id = auth.user_id, "Job completed");

    let walker_name = UserRepo::display_name(&state.pool, auth.user_id).await?;
    publish_transition(
        &state,
        job_id,
        &JobTransition::Completed {
            job_id,
            title: job.title.clone(),
            owner_id: job.owner_id,
            walker_id: auth.user_id,
            walker_name,
        },
    );

    Ok(Json(DataResponse { data: job }))
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs/{id}/cancel
///
/// Cancel the current assignment and reopen the job. The walker may
/// always cancel their own assignment; the owner cancels free within the
/// grace period, and needs a reason once the window has elapsed and the
/// walker is on the way. Resets the job to its pristine open state.
pub async fn cancel_assignment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CancelRequest>,
) -> AppResult<impl IntoResponse> {
    let current = find_job(&state.pool, job_id).await?;

    let caller = if current.owner_id == auth.user_id {
        CancelCaller::Owner
    } else if current.assigned_walker_id == Some(auth.user_id) {
        CancelCaller::AssignedWalker
    } else {
        return Err(AppError::Core(CoreError::forbidden(
            "Only the job owner or the assigned walker can cancel",
        )));
    };

    let decision = state.config.cancellation_policy().decide(&CancellationContext {
        caller,
        assigned: current.status_id == JobStatus::Assigned.id(),
        on_my_way: current.on_my_way,
        assigned_at: current.assigned_at,
        now: chrono::Utc::now(),
    });

    let reason = input
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    match decision {
        CancellationDecision::Deny => {
            return Err(AppError::Core(CoreError::invalid_state(
                "Job is not currently assigned",
            )));
        }
        CancellationDecision::RequireReason if reason.is_none() => {
            return Err(AppError::Core(CoreError::InvalidArgument(
                "A cancellation reason is required after the grace period".into(),
            )));
        }
        CancellationDecision::Allow | CancellationDecision::RequireReason => {}
    }

    // The pre-read walker id names the party in the notification and pins
    // the conditional update: if the assignment changes hands between the
    // read and the write, the update matches no row and the cancel fails.
    let walker_id = current.assigned_walker_id.ok_or_else(|| {
        AppError::Core(CoreError::invalid_state("Job is not currently assigned"))
    })?;

    JobRepo::cancel_assignment(&state.pool, job_id, walker_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::invalid_state("Job is not currently assigned"))
        })?;

    tracing::info!(job_id, canceled_by = auth.user_id, "Assignment canceled");

    let walker_name = UserRepo::display_name(&state.pool, walker_id).await?;
    publish_transition(
        &state,
        job_id,
        &JobTransition::Canceled {
            job_id,
            title: current.title.clone(),
            owner_id: current.owner_id,
            walker_id,
            walker_name,
            canceled_by: caller,
            reason,
        },
    );

    Ok(Json(MessageResponse::new("Assignment canceled")))
}
