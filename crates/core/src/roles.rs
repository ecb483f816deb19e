//! Well-known role name constants.
//!
//! Must match the `users.role` column values seeded at registration.

/// Posts jobs and may cancel an assignment.
pub const ROLE_OWNER: &str = "owner";

/// Accepts, executes, and completes jobs.
pub const ROLE_WALKER: &str = "walker";
