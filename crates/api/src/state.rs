use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: waggle_db::DbPool,
    /// Server configuration (grace period, JWT, CORS).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection registry (presence + push delivery).
    pub ws_manager: Arc<WsManager>,
    /// Event bus decoupling state transitions from notification delivery.
    pub event_bus: Arc<waggle_events::EventBus>,
}
