//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Lifecycle transitions in
//! [`JobRepo`] are single conditional UPDATE statements: the expected
//! pre-state lives in the WHERE clause, and a zero-row result is the
//! caller's "illegal in current state" signal.

pub mod job_repo;
pub mod notification_repo;
pub mod user_repo;

pub use job_repo::JobRepo;
pub use notification_repo::NotificationRepo;
pub use user_repo::UserRepo;
