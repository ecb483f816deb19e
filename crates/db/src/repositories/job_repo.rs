//! Repository for the `jobs` table.
//!
//! Every lifecycle transition is a single atomic conditional update --
//! never a read-then-write pair. Concurrent callers racing on the same
//! job see exactly one winner; the losers get `None` back and the
//! handler maps that to an `InvalidState` error.

use sqlx::PgPool;
use waggle_core::geo::Position;
use waggle_core::types::DbId;

use crate::models::job::{CreateJob, Job, JobListQuery};
use crate::models::status::JobStatus;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, owner_id, title, description, location, longitude, latitude, \
    image, pay_cents, status_id, assigned_walker_id, assigned_at, \
    on_my_way, walker_lng, walker_lat, completed_at, created_at, updated_at";

/// Maximum page size for job listings.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listings.
const DEFAULT_LIMIT: i64 = 50;

/// Provides persistence for jobs and their assignment lifecycle.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new open job for an owner, returning the created row.
    ///
    /// `geo` is the job site in client order, already validated; it is
    /// stored in lng/lat column order.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateJob,
        geo: Option<Position>,
    ) -> Result<Job, sqlx::Error> {
        let (lng, lat) = match geo {
            Some(pos) => {
                let (lng, lat) = pos.to_stored();
                (Some(lng), Some(lat))
            }
            None => (None, None),
        };
        let query = format!(
            "INSERT INTO jobs (owner_id, title, description, location, longitude, latitude, image, pay_cents, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.location)
            .bind(lng)
            .bind(lat)
            .bind(&input.image)
            .bind(input.pay_cents)
            .bind(JobStatus::Open.id())
            .fetch_one(pool)
            .await
    }

    /// Find a job by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List open jobs, newest first.
    pub async fn list_open(pool: &PgPool, params: &JobListQuery) -> Result<Vec<Job>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE status_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(JobStatus::Open.id())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List an owner's jobs, optionally filtered by status, newest first.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        params: &JobListQuery,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE owner_id = $1 AND ($2::SMALLINT IS NULL OR status_id = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(owner_id)
            .bind(params.status_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List the jobs a walker currently holds or has completed, newest first.
    pub async fn list_by_walker(pool: &PgPool, walker_id: DbId) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE assigned_walker_id = $1 \
             ORDER BY assigned_at DESC NULLS LAST"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(walker_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a job's image URL. Ownership is checked by the handler.
    pub async fn update_image(
        pool: &PgPool,
        job_id: DbId,
        image: &str,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("UPDATE jobs SET image = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .bind(image)
            .fetch_optional(pool)
            .await
    }

    /// Assign an open, unassigned job to a walker.
    ///
    /// Returns `None` when the job is not open or already has a walker.
    /// The `status_id = open AND assigned_walker_id IS NULL` guard makes
    /// the operation safe under concurrent assigns: exactly one wins.
    pub async fn assign(
        pool: &PgPool,
        job_id: DbId,
        walker_id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET status_id = $3, assigned_walker_id = $2, assigned_at = NOW() \
             WHERE id = $1 AND status_id = $4 AND assigned_walker_id IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .bind(walker_id)
            .bind(JobStatus::Assigned.id())
            .bind(JobStatus::Open.id())
            .fetch_optional(pool)
            .await
    }

    /// Flip `on_my_way` for the assigned walker.
    ///
    /// Returns `None` if the job is not assigned to this walker or the
    /// flag is already set.
    pub async fn mark_on_my_way(
        pool: &PgPool,
        job_id: DbId,
        walker_id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET on_my_way = TRUE \
             WHERE id = $1 AND status_id = $3 AND assigned_walker_id = $2 \
                   AND on_my_way = FALSE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .bind(walker_id)
            .bind(JobStatus::Assigned.id())
            .fetch_optional(pool)
            .await
    }

    /// Store the walker's latest position (last-write-wins).
    ///
    /// Requires the job to be assigned to this walker with `on_my_way`
    /// set; returns `None` otherwise.
    pub async fn update_position(
        pool: &PgPool,
        job_id: DbId,
        walker_id: DbId,
        position: Position,
    ) -> Result<Option<Job>, sqlx::Error> {
        let (lng, lat) = position.to_stored();
        let query = format!(
            "UPDATE jobs \
             SET walker_lng = $3, walker_lat = $4 \
             WHERE id = $1 AND status_id = $5 AND assigned_walker_id = $2 \
                   AND on_my_way = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .bind(walker_id)
            .bind(lng)
            .bind(lat)
            .bind(JobStatus::Assigned.id())
            .fetch_optional(pool)
            .await
    }

    /// Complete an assigned job.
    ///
    /// Keeps `assigned_walker_id` for record purposes but clears the
    /// on-my-way flag and the tracked position.
    pub async fn complete(
        pool: &PgPool,
        job_id: DbId,
        walker_id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET status_id = $3, completed_at = NOW(), on_my_way = FALSE, \
                 walker_lng = NULL, walker_lat = NULL \
             WHERE id = $1 AND status_id = $4 AND assigned_walker_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .bind(walker_id)
            .bind(JobStatus::Completed.id())
            .bind(JobStatus::Assigned.id())
            .fetch_optional(pool)
            .await
    }

    /// Cancel an assignment, returning the job to its pristine open state.
    ///
    /// Clears the walker, assignment timestamp, on-my-way flag, and
    /// tracked position in one statement. The walker identity is part of
    /// the condition so a cancel decided against one assignment can never
    /// strip a different walker who took the job in between. Returns
    /// `None` if the job is no longer assigned to that walker.
    pub async fn cancel_assignment(
        pool: &PgPool,
        job_id: DbId,
        walker_id: DbId,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET status_id = $3, assigned_walker_id = NULL, assigned_at = NULL, \
                 on_my_way = FALSE, walker_lng = NULL, walker_lat = NULL \
             WHERE id = $1 AND status_id = $4 AND assigned_walker_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job_id)
            .bind(walker_id)
            .bind(JobStatus::Open.id())
            .bind(JobStatus::Assigned.id())
            .fetch_optional(pool)
            .await
    }
}
