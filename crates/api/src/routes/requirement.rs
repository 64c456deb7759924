//! Route definitions for the `/requirements` resource.
//!
//! All endpoints require authentication.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::requirement;
use crate::state::AppState;

/// Routes mounted at `/requirements`.
///
/// ```text
/// POST   /                 -> create_requirement
/// GET    /                 -> list_requirements
/// GET    /{id}             -> get_requirement
/// POST   /{id}/dispatch    -> dispatch_requirement
/// GET    /{id}/matches     -> list_matches
/// POST   /{id}/close       -> close_requirement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(requirement::create_requirement).get(requirement::list_requirements),
        )
        .route("/{id}", get(requirement::get_requirement))
        .route("/{id}/dispatch", post(requirement::dispatch_requirement))
        .route("/{id}/matches", get(requirement::list_matches))
        .route("/{id}/close", post(requirement::close_requirement))
}
