//! Message entity models.

use serde::Serialize;
use sqlx::FromRow;
use tutorlink_core::types::{DbId, Timestamp};

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub sender_id: DbId,
    pub receiver_id: DbId,
    pub content: String,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// One entry in a user's conversation list: the counterpart plus the most
/// recent message and the unread tally for that thread.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub counterpart_id: DbId,
    pub last_message: String,
    pub last_timestamp: Timestamp,
    pub unread_count: i64,
}
