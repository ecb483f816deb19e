//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts and query parameters

pub mod job;
pub mod notification;
pub mod status;
pub mod user;
