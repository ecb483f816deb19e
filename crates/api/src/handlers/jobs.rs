//! Handlers for job posting and discovery.
//!
//! Listing open jobs is public; everything else requires authentication
//! via [`AuthUser`]. The assignment lifecycle lives in
//! [`super::assignment`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use waggle_core::error::CoreError;
use waggle_core::geo::Position;
use waggle_core::types::DbId;
use waggle_db::models::job::{CreateJob, JobListQuery};
use waggle_db::repositories::JobRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /jobs/{id}/image`.
#[derive(Debug, Deserialize)]
pub struct UpdateImage {
    pub image: String,
}

/// POST /api/v1/jobs
///
/// Post a new walking job. Owners only. Returns 201 with the created job,
/// which starts in `open` status.
pub async fn post_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_owner() {
        return Err(AppError::Core(CoreError::forbidden(
            "Only pet owners can post jobs",
        )));
    }

    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::InvalidArgument(e.to_string())))?;

    // Job-site coordinates arrive in client [lat, lng] order.
    let geo = input
        .coordinates
        .as_deref()
        .map(Position::from_pair)
        .transpose()
        .map_err(AppError::Core)?;

    let job = JobRepo::create(&state.pool, auth.user_id, &input, geo).await?;

    tracing::info!(job_id = job.id, owner_id = auth.user_id, "Job posted");

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs/open
///
/// List open jobs, newest first. Public.
pub async fn list_open_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = JobRepo::list_open(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/mine
///
/// List the caller's posted jobs. Owners only.
pub async fn my_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_owner() {
        return Err(AppError::Core(CoreError::forbidden(
            "Only pet owners can view their posted jobs",
        )));
    }

    let jobs = JobRepo::list_by_owner(&state.pool, auth.user_id, &params).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/walker
///
/// List the jobs the calling walker holds or has completed.
pub async fn walker_jobs(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    if !auth.is_walker() {
        return Err(AppError::Core(CoreError::forbidden(
            "Only walkers can view their assigned jobs",
        )));
    }

    let jobs = JobRepo::list_by_walker(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
///
/// Get a single job by ID. Any authenticated user may view a job.
pub async fn get_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;
    Ok(Json(DataResponse { data: job }))
}

/// PUT /api/v1/jobs/{id}/image
///
/// Replace the job's image URL after an upload. Owner of the job only.
pub async fn update_job_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<UpdateImage>,
) -> AppResult<impl IntoResponse> {
    if input.image.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "Image URL is required".into(),
        )));
    }

    let job = JobRepo::find_by_id(&state.pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    if job.owner_id != auth.user_id {
        return Err(AppError::Core(CoreError::forbidden(
            "Cannot update another owner's job",
        )));
    }

    let updated = JobRepo::update_image(&state.pool, job_id, &input.image)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;

    Ok(Json(DataResponse { data: updated }))
}
