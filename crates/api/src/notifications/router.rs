//! Event-to-notification delivery loop.
//!
//! [`NotificationRouter`] consumes [`JobEvent`]s from the broadcast
//! channel and delivers each one to its recipient. Delivery is
//! at-most-once and best-effort: an offline recipient simply misses the
//! push, and a delivery failure is logged, never surfaced to the request
//! that caused the event.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use waggle_db::repositories::NotificationRepo;
use waggle_db::DbPool;
use waggle_events::JobEvent;

use crate::ws::WsManager;

/// Routes job events to user notifications.
pub struct NotificationRouter {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    /// Create a new router with the given database pool and WebSocket manager.
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the main delivery loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](waggle_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<JobEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.deliver(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event: persist an inbox record when the event asks for
    /// one, then push over WebSocket if the recipient is connected.
    async fn deliver(&self, event: &JobEvent) {
        if let Some(kind) = &event.notification_kind {
            let message = event.payload["message"].as_str().unwrap_or(&event.event);
            if let Err(e) = NotificationRepo::create(
                &self.pool,
                event.recipient,
                event.job_id,
                kind,
                message,
            )
            .await
            {
                tracing::error!(
                    error = %e,
                    recipient = event.recipient,
                    job_id = event.job_id,
                    kind,
                    "Failed to persist notification"
                );
            }
        }

        // Offline recipients miss the push entirely; skipping up front
        // avoids serializing a frame nobody will receive.
        if !self.ws_manager.is_online(event.recipient).await {
            tracing::debug!(
                event = %event.event,
                recipient = event.recipient,
                job_id = event.job_id,
                "Recipient offline, push skipped"
            );
            return;
        }

        let msg = serde_json::json!({
            "event": event.event,
            "payload": event.payload,
            "timestamp": event.timestamp,
        });
        let sent = self
            .ws_manager
            .send_to_user(event.recipient, Message::Text(msg.to_string().into()))
            .await;

        tracing::debug!(
            event = %event.event,
            recipient = event.recipient,
            job_id = event.job_id,
            connections = sent,
            "Event delivered"
        );
    }
}
