//! Pure domain logic for the waggle marketplace.
//!
//! This crate has no I/O. It holds the shared primitive types, the error
//! taxonomy, the cancellation policy engine, coordinate handling for the
//! walker position relay, and the transition-to-notification dispatch
//! mapping. Persistence lives in `waggle-db`; delivery lives in
//! `waggle-events` and the API crate.

pub mod cancellation;
pub mod dispatch;
pub mod error;
pub mod geo;
pub mod roles;
pub mod types;

pub use error::CoreError;
