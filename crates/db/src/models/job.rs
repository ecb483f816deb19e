//! Job entity model and DTOs for the assignment lifecycle.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;
use waggle_core::geo::Position;
use waggle_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `jobs` table.
///
/// Lifecycle invariants (enforced by `JobRepo`'s conditional updates):
/// `assigned_walker_id` is set iff the job is assigned (retained on
/// completion for record purposes); `on_my_way` only while assigned;
/// `walker_lng`/`walker_lat` only while `on_my_way`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Job geo point, lng/lat storage order.
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub image: Option<String>,
    pub pay_cents: i64,
    pub status_id: StatusId,
    pub assigned_walker_id: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub on_my_way: bool,
    #[serde(skip)]
    pub walker_lng: Option<f64>,
    #[serde(skip)]
    pub walker_lat: Option<f64>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Last reported walker position, if one is stored.
    pub fn walker_position(&self) -> Option<Position> {
        match (self.walker_lng, self.walker_lat) {
            (Some(lng), Some(lat)) => Some(Position::from_stored(lng, lat)),
            _ => None,
        }
    }
}

/// DTO for posting a new job via `POST /api/v1/jobs`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJob {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub description: String,
    #[validate(length(min = 1, max = 300))]
    pub location: String,
    /// Client-order `[lat, lng]` geo point for the job site.
    pub coordinates: Option<Vec<f64>>,
    pub image: Option<String>,
    #[validate(range(min = 0))]
    pub pay_cents: i64,
}

/// Query parameters for job listings.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    /// Filter by status ID (e.g. 1 = open, 2 = assigned).
    pub status_id: Option<StatusId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
