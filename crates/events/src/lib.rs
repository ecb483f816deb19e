//! The waggle notification channel.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`JobEvent`] -- a named event addressed to a single user's channel.
//!
//! Delivery is fire-and-forget and at-most-once: publishing never fails
//! the state mutation that produced the event, and a full buffer simply
//! drops the oldest undelivered messages.

pub mod bus;

pub use bus::{EventBus, JobEvent};
