//! Route definitions for the `/messages` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::message;
use crate::state::AppState;

/// Routes mounted at `/messages`.
///
/// ```text
/// POST   /                 -> send_message
/// GET    /conversation     -> get_conversation (?with=&limit=)
/// GET    /conversations    -> list_conversations
/// POST   /read             -> mark_read
/// GET    /unread-count     -> unread_count
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(message::send_message))
        .route("/conversation", get(message::get_conversation))
        .route("/conversations", get(message::list_conversations))
        .route("/read", post(message::mark_read))
        .route("/unread-count", get(message::unread_count))
}
