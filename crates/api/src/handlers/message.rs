//! Handlers for the `/messages` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Every mutation
//! commits first and publishes to the event bus second, so connected
//! sessions only ever see stored state.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tutorlink_core::error::CoreError;
use tutorlink_core::types::DbId;
use tutorlink_db::models::notification::NotificationPayload;
use tutorlink_db::repositories::{MessageRepo, NotificationRepo};
use tutorlink_events::RealtimeEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Request body for `POST /messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub receiver_id: DbId,
    pub content: String,
}

/// Query parameters for `GET /messages/conversation`.
#[derive(Debug, Deserialize)]
pub struct ConversationQuery {
    /// The other party of the conversation.
    pub with: DbId,
    /// Maximum number of messages. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
}

/// Request body for `POST /messages/read`.
#[derive(Debug, Deserialize)]
pub struct MarkRead {
    /// The sender whose messages are being read.
    pub counterpart_id: DbId,
}

/// Maximum conversation page size.
const MAX_LIMIT: i64 = 200;

/// Default conversation page size.
const DEFAULT_LIMIT: i64 = 50;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/messages
///
/// Send a direct message. The message row is committed and its event
/// published inside the receiver's unread write scope, so the live unread
/// total cannot drift against the table. A best-effort `message`
/// notification follows; notification failure never fails the send.
pub async fn send_message(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SendMessage>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Message content must not be empty".into(),
        )));
    }
    if input.receiver_id == auth.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot send a message to yourself".into(),
        )));
    }

    let message = {
        let writer = state.unread_counter.writer(input.receiver_id).await;
        let message =
            MessageRepo::create(&state.pool, auth.user_id, input.receiver_id, &input.content)
                .await?;
        state.event_bus.publish(RealtimeEvent::MessageCreated {
            message: message.clone(),
            seq: writer.stamp(),
        });
        message
    };

    // Best-effort notification; the stored message is the source of truth.
    let payload = NotificationPayload::Message {
        sender_id: auth.user_id,
    };
    match NotificationRepo::create(&state.pool, input.receiver_id, &payload).await {
        Ok(Some(notification)) => {
            state
                .event_bus
                .publish(RealtimeEvent::NotificationCreated { notification });
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!(
                receiver_id = input.receiver_id,
                error = %e,
                "Failed to store message notification"
            );
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": message })),
    ))
}

/// GET /api/v1/messages/conversation?with={user_id}&limit={n}
///
/// Fetch the conversation between the authenticated user and `with`,
/// oldest first. An unknown counterpart yields an empty list, not an error.
pub async fn get_conversation(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ConversationQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = super::page_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);

    let messages = MessageRepo::conversation(&state.pool, auth.user_id, params.with, limit).await?;

    Ok(Json(serde_json::json!({ "data": messages })))
}

/// GET /api/v1/messages/conversations
///
/// List the authenticated user's conversations, most recently active first,
/// each with the latest message and the per-thread unread count.
pub async fn list_conversations(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let conversations = MessageRepo::list_conversations(&state.pool, auth.user_id).await?;

    Ok(Json(serde_json::json!({ "data": conversations })))
}

/// POST /api/v1/messages/read
///
/// Mark every unread message from `counterpart_id` as read. Idempotent:
/// only unread rows flip, and the flip and its event share the reader's
/// unread write scope so the live unread total never drifts. Message
/// notifications from the same sender are folded in.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<MarkRead>,
) -> AppResult<Json<serde_json::Value>> {
    let flipped = {
        let writer = state.unread_counter.writer(auth.user_id).await;
        let flipped =
            MessageRepo::mark_read(&state.pool, auth.user_id, input.counterpart_id).await?;
        state.event_bus.publish(RealtimeEvent::MessagesRead {
            reader_id: auth.user_id,
            counterpart_id: input.counterpart_id,
            flipped,
            seq: writer.stamp(),
        });
        flipped
    };

    if let Err(e) =
        NotificationRepo::mark_message_notifications_read(&state.pool, auth.user_id, input.counterpart_id)
            .await
    {
        tracing::warn!(
            user_id = auth.user_id,
            counterpart_id = input.counterpart_id,
            error = %e,
            "Failed to fold message notifications"
        );
    }

    Ok(Json(serde_json::json!({
        "data": { "flipped": flipped }
    })))
}

/// GET /api/v1/messages/unread-count
///
/// The authenticated user's total unread messages, served from the live
/// counter; a cache miss recounts from the store.
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let count = match state.unread_counter.get(auth.user_id).await {
        Some(count) => count,
        None => state.unread_counter.resync(&state.pool, auth.user_id).await?,
    };

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}
