//! WebSocket infrastructure for real-time delivery.
//!
//! Provides the authenticated upgrade handler, the per-user connection
//! registry, and the heartbeat task that keeps connections alive.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
