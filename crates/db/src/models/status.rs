//! Job lifecycle status mapping to the SMALLINT `jobs.status_id` column.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Job lifecycle status.
///
/// `Open → Assigned → Completed`, with cancellation returning an assigned
/// job to `Open`. `Canceled` and `Closed` mark a listing the owner has
/// withdrawn (soft-removed from discovery); the assignment state machine
/// never enters them.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Open = 1,
    Assigned = 2,
    Completed = 3,
    Canceled = 4,
    Closed = 5,
}

impl JobStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }
}

impl From<JobStatus> for StatusId {
    fn from(value: JobStatus) -> Self {
        value as StatusId
    }
}
