//! Notification delivery infrastructure.
//!
//! The [`NotificationRouter`] subscribes to the event bus and delivers
//! each job event to its recipient: a WebSocket push when they are
//! online, plus a persisted inbox record for events that carry a
//! notification kind.

pub mod router;

pub use router::NotificationRouter;
