pub mod health;
pub mod match_offer;
pub mod message;
pub mod notification;
pub mod requirement;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                      WebSocket (token via query param)
///
/// /requirements                            create, list
/// /requirements/{id}                       get
/// /requirements/{id}/dispatch              re-run matching + fan-out (POST)
/// /requirements/{id}/matches               recorded matches
/// /requirements/{id}/close                 close (POST)
///
/// /matches                                 tutor's matched requirements
/// /matches/{id}/interest                   express interest (POST)
/// /matches/{id}/decline                    decline (POST)
///
/// /messages                                send (POST)
/// /messages/conversation?with={id}         thread history
/// /messages/conversations                  conversation list
/// /messages/read                           mark thread read (POST)
/// /messages/unread-count                   live unread total
///
/// /notifications                           list
/// /notifications/read-all                  mark all read (POST)
/// /notifications/unread-count              unread total
/// /notifications/{id}/read                 mark one read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/requirements", requirement::router())
        .nest("/matches", match_offer::router())
        .nest("/messages", message::router())
        .nest("/notifications", notification::router())
}
