use std::sync::Arc;

use tutorlink_dispatch::Dispatcher;
use tutorlink_events::{EventBus, UnreadCounter};

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tutorlink_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager.
    pub ws_manager: Arc<WsManager>,
    /// Centralized event bus for publishing realtime events.
    pub event_bus: Arc<EventBus>,
    /// Live per-user unread-message totals.
    pub unread_counter: Arc<UnreadCounter>,
    /// Requirement dispatch engine.
    pub dispatcher: Arc<Dispatcher>,
}
