//! Repository for the `messages` table.

use sqlx::PgPool;
use tutorlink_core::types::DbId;

use crate::models::message::{ConversationSummary, Message};

/// Column list for `messages` queries.
const COLUMNS: &str = "id, sender_id, receiver_id, content, is_read, read_at, created_at";

/// Provides persistence for direct messages.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        sender_id: DbId,
        receiver_id: DbId,
        content: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (sender_id, receiver_id, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(sender_id)
            .bind(receiver_id)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Fetch the two-party conversation history, oldest first.
    pub async fn conversation(
        pool: &PgPool,
        user_id: DbId,
        counterpart_id: DbId,
        limit: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        // Window over the most recent `limit` rows, then restore
        // chronological order for the client.
        let query = format!(
            "SELECT {COLUMNS} FROM ( \
                 SELECT {COLUMNS} FROM messages \
                 WHERE (sender_id = $1 AND receiver_id = $2) \
                    OR (sender_id = $2 AND receiver_id = $1) \
                 ORDER BY created_at DESC, id DESC \
                 LIMIT $3 \
             ) recent \
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(user_id)
            .bind(counterpart_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// List a user's conversations, most recently active first.
    ///
    /// Each entry carries the latest message in the thread and the number of
    /// messages from the counterpart the user has not read yet.
    pub async fn list_conversations(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            "WITH threads AS ( \
                 SELECT DISTINCT ON (counterpart_id) \
                        CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END \
                            AS counterpart_id, \
                        content AS last_message, \
                        created_at AS last_timestamp \
                 FROM messages \
                 WHERE sender_id = $1 OR receiver_id = $1 \
                 ORDER BY counterpart_id, created_at DESC, id DESC \
             ) \
             SELECT t.counterpart_id, t.last_message, t.last_timestamp, \
                    COALESCE(u.unread, 0) AS unread_count \
             FROM threads t \
             LEFT JOIN ( \
                 SELECT sender_id, COUNT(*) AS unread \
                 FROM messages \
                 WHERE receiver_id = $1 AND is_read = false \
                 GROUP BY sender_id \
             ) u ON u.sender_id = t.counterpart_id \
             ORDER BY t.last_timestamp DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Mark every unread message from `counterpart_id` to `user_id` as read.
    ///
    /// Returns the number of messages flipped; only unread rows count, so
    /// repeated calls are idempotent.
    pub async fn mark_read(
        pool: &PgPool,
        user_id: DbId,
        counterpart_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages \
             SET is_read = true, read_at = NOW() \
             WHERE receiver_id = $1 AND sender_id = $2 AND is_read = false",
        )
        .bind(user_id)
        .bind(counterpart_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Total unread messages for a user across all conversations.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
