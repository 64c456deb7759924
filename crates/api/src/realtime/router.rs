//! Event-to-session routing.
//!
//! [`RealtimeRouter`] subscribes to the event bus and pushes each event to
//! the recipient's connected WebSocket sessions.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use tutorlink_events::RealtimeEvent;

use crate::ws::WsManager;

/// Routes realtime events to connected user sessions.
///
/// Ordering per recipient follows publish order: the single consumer loop
/// forwards events one at a time through each session's unbounded channel.
/// Delivery is at-least-once from the client's perspective; sessions that
/// miss events (lag, reconnect) are expected to refetch via HTTP.
pub struct RealtimeRouter {
    ws_manager: Arc<WsManager>,
}

impl RealtimeRouter {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the main routing loop.
    ///
    /// Subscribes to the event bus via `receiver` and processes each event.
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](tutorlink_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<RealtimeEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.push(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Realtime router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, realtime router shutting down");
                    break;
                }
            }
        }
    }

    /// Serialize one event and send it to the recipient's sessions.
    async fn push(&self, event: &RealtimeEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize realtime event");
                return;
            }
        };

        let sent = self
            .ws_manager
            .send_scoped(
                event.recipient(),
                event.counterpart(),
                Message::Text(payload.into()),
            )
            .await;
        tracing::debug!(
            recipient = event.recipient(),
            sessions = sent,
            "Realtime event pushed"
        );
    }
}
