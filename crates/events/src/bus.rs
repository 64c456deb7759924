//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`RealtimeEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use serde::Serialize;
use tokio::sync::broadcast;
use tutorlink_core::types::DbId;
use tutorlink_db::models::message::Message;
use tutorlink_db::models::notification::Notification;

// ---------------------------------------------------------------------------
// RealtimeEvent
// ---------------------------------------------------------------------------

/// A domain event pushed towards connected sessions.
///
/// Events are produced after the corresponding row has been committed, so
/// every event a subscriber sees is backed by stored state. Subscribers that
/// fall behind observe `RecvError::Lagged` and must resynchronize from the
/// store; delivery is at-least-once, never exactly-once.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// A direct message was stored.
    MessageCreated {
        message: Message,
        /// Unread-counter sequence stamp; not part of the wire payload.
        #[serde(skip)]
        seq: u64,
    },

    /// A user opened a conversation and flipped unread messages to read.
    MessagesRead {
        /// The user who performed the read.
        reader_id: DbId,
        /// The other party of the conversation.
        counterpart_id: DbId,
        /// How many messages actually changed state.
        flipped: u64,
        /// Unread-counter sequence stamp; not part of the wire payload.
        #[serde(skip)]
        seq: u64,
    },

    /// A notification row was stored for a user.
    NotificationCreated { notification: Notification },
}

impl RealtimeEvent {
    /// The user whose sessions this event is addressed to.
    pub fn recipient(&self) -> DbId {
        match self {
            RealtimeEvent::MessageCreated { message, .. } => message.receiver_id,
            RealtimeEvent::MessagesRead { reader_id, .. } => *reader_id,
            RealtimeEvent::NotificationCreated { notification } => notification.user_id,
        }
    }

    /// The conversation counterpart, for events scoped to a thread.
    pub fn counterpart(&self) -> Option<DbId> {
        match self {
            RealtimeEvent::MessageCreated { message, .. } => Some(message.sender_id),
            RealtimeEvent::MessagesRead { counterpart_id, .. } => Some(*counterpart_id),
            RealtimeEvent::NotificationCreated { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`RealtimeEvent`], in publish
/// order.
pub struct EventBus {
    sender: broadcast::Sender<RealtimeEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// the stored row remains the source of truth either way.
    pub fn publish(&self, event: RealtimeEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn message(sender_id: DbId, receiver_id: DbId) -> Message {
        Message {
            id: 1,
            sender_id,
            receiver_id,
            content: "hello".to_string(),
            is_read: false,
            read_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(RealtimeEvent::MessageCreated {
            message: message(7, 42),
            seq: 1,
        });

        let received = rx.recv().await.expect("should receive the event");
        assert_matches!(received, RealtimeEvent::MessageCreated { ref message, .. } if message.receiver_id == 42);
        assert_eq!(received.recipient(), 42);
        assert_eq!(received.counterpart(), Some(7));
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(RealtimeEvent::MessagesRead {
            reader_id: 1,
            counterpart_id: 2,
            flipped: 3,
            seq: 1,
        });

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.recipient(), 1);
        assert_eq!(e2.recipient(), 1);
    }

    #[tokio::test]
    async fn events_arrive_in_publish_order() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        for flipped in 0..5 {
            bus.publish(RealtimeEvent::MessagesRead {
                reader_id: 1,
                counterpart_id: 2,
                flipped,
                seq: flipped + 1,
            });
        }

        for expected in 0..5 {
            let event = rx.recv().await.expect("should receive");
            assert_matches!(event, RealtimeEvent::MessagesRead { flipped, .. } if flipped == expected);
        }
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers, so the send has nowhere to go.
        bus.publish(RealtimeEvent::MessagesRead {
            reader_id: 1,
            counterpart_id: 2,
            flipped: 0,
            seq: 1,
        });
    }

    #[test]
    fn notification_events_have_no_counterpart() {
        let event = RealtimeEvent::NotificationCreated {
            notification: Notification {
                id: 1,
                user_id: 9,
                kind: "new_requirement".to_string(),
                payload: serde_json::json!({}),
                is_read: false,
                read_at: None,
                created_at: chrono::Utc::now(),
            },
        };
        assert_eq!(event.recipient(), 9);
        assert_eq!(event.counterpart(), None);
    }
}
