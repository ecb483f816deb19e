//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] decouples the assignment state machine from notification
//! delivery: handlers publish a [`JobEvent`] after a transition commits,
//! and the notification router consumes the stream independently. A
//! channel outage can therefore never block or roll back a transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use waggle_core::types::DbId;

// ---------------------------------------------------------------------------
// JobEvent
// ---------------------------------------------------------------------------

/// A job-lifecycle event addressed to one user's channel.
///
/// `event` is one of the `waggle_core::dispatch::EVENT_*` names; the
/// payload always carries the job id and a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    /// Client-protocol event name, e.g. `"jobAssigned"`.
    pub event: String,

    /// The user whose channel this event targets.
    pub recipient: DbId,

    /// The job the event concerns.
    pub job_id: DbId,

    /// Persisted notification kind, when an inbox record should be
    /// written for the recipient (`None` for push-only events).
    pub notification_kind: Option<String>,

    /// Free-form JSON payload forwarded to the client.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl JobEvent {
    /// Create an event with an empty payload and no inbox record.
    pub fn new(event: impl Into<String>, recipient: DbId, job_id: DbId) -> Self {
        Self {
            event: event.into(),
            recipient,
            job_id,
            notification_kind: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Request a persisted inbox record of the given kind.
    pub fn with_notification(mut self, kind: impl Into<String>) -> Self {
        self.notification_kind = Some(kind.into());
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published [`JobEvent`]. Share via
/// `Arc<EventBus>`.
pub struct EventBus {
    sender: broadcast::Sender<JobEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// delivery is best-effort by contract.
    pub fn publish(&self, event: JobEvent) {
        // The SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
