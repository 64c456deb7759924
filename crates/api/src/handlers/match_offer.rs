//! Handlers for the `/matches` resource (tutor side).
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use tutorlink_core::error::CoreError;
use tutorlink_core::types::DbId;
use tutorlink_db::models::match_record::{MATCH_STATUS_ACCEPTED, MATCH_STATUS_DECLINED};
use tutorlink_db::models::notification::NotificationPayload;
use tutorlink_db::repositories::{MatchRepo, NotificationRepo, RequirementRepo};
use tutorlink_events::RealtimeEvent;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query parameters for `GET /matches`.
#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for match listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for match listing.
const DEFAULT_LIMIT: i64 = 50;

/// GET /api/v1/matches
///
/// List the requirements the authenticated tutor has been matched to,
/// newest first.
pub async fn list_my_matches(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<MatchQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = super::page_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = super::page_offset(params.offset);

    let matches = MatchRepo::list_for_tutor(&state.pool, auth.user_id, limit, offset).await?;

    Ok(Json(serde_json::json!({ "data": matches })))
}

/// POST /api/v1/matches/{id}/interest
///
/// Express interest in a matched requirement. The match flips to
/// `accepted` and the student receives an `interest` notification.
pub async fn express_interest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(match_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let record = MatchRepo::get(&state.pool, match_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "match",
            id: match_id,
        }))?;

    if record.tutor_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Match belongs to another tutor".into(),
        )));
    }

    let updated =
        MatchRepo::update_status(&state.pool, match_id, auth.user_id, MATCH_STATUS_ACCEPTED)
            .await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "match",
            id: match_id,
        }));
    }

    // Notify the requirement's student; best-effort like message
    // notifications.
    if let Some(requirement) = RequirementRepo::get(&state.pool, record.requirement_id).await? {
        let payload = NotificationPayload::Interest {
            requirement_id: record.requirement_id,
            tutor_id: auth.user_id,
        };
        match NotificationRepo::create(&state.pool, requirement.student_id, &payload).await {
            Ok(Some(notification)) => {
                state
                    .event_bus
                    .publish(RealtimeEvent::NotificationCreated { notification });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(
                    match_id,
                    student_id = requirement.student_id,
                    error = %e,
                    "Failed to store interest notification"
                );
            }
        }
    }

    Ok(Json(serde_json::json!({
        "data": { "status": MATCH_STATUS_ACCEPTED }
    })))
}

/// POST /api/v1/matches/{id}/decline
///
/// Decline a matched requirement. No notification is sent.
pub async fn decline(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(match_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let updated =
        MatchRepo::update_status(&state.pool, match_id, auth.user_id, MATCH_STATUS_DECLINED)
            .await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "match",
            id: match_id,
        }));
    }

    Ok(Json(serde_json::json!({
        "data": { "status": MATCH_STATUS_DECLINED }
    })))
}
