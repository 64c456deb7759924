//! Notification entity models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tutorlink_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
///
/// `payload` holds the JSONB document described by [`NotificationPayload`];
/// it is kept as a raw value on the row so reads never fail on historical
/// payload shapes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// The typed payload written into `notifications.payload`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationPayload {
    /// A new requirement matched the tutor's profile.
    NewRequirement {
        requirement_id: DbId,
        student_id: DbId,
        subject: String,
        location: String,
        budget: String,
        urgency: String,
    },
    /// An unread direct message arrived.
    Message { sender_id: DbId },
    /// A tutor expressed interest in the student's requirement.
    Interest { requirement_id: DbId, tutor_id: DbId },
}

impl NotificationPayload {
    /// The value stored in the `kind` column for this payload.
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::NewRequirement { .. } => "new_requirement",
            NotificationPayload::Message { .. } => "message",
            NotificationPayload::Interest { .. } => "interest",
        }
    }
}
