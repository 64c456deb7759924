//! Route definitions for the `/matches` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::match_offer;
use crate::state::AppState;

/// Routes mounted at `/matches`.
///
/// ```text
/// GET    /                 -> list_my_matches
/// POST   /{id}/interest    -> express_interest
/// POST   /{id}/decline     -> decline
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(match_offer::list_my_matches))
        .route("/{id}/interest", post(match_offer::express_interest))
        .route("/{id}/decline", post(match_offer::decline))
}
