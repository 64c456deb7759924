//! Handlers for the `/requirements` resource.
//!
//! All endpoints require authentication via [`AuthUser`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tutorlink_core::budget::BudgetRange;
use tutorlink_core::error::CoreError;
use tutorlink_core::matching::{Category, RequirementDraft, TeachingMode};
use tutorlink_core::types::DbId;
use tutorlink_db::repositories::{MatchRepo, RequirementRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request types
// ---------------------------------------------------------------------------

/// Request body for `POST /requirements`.
///
/// Enumerated fields arrive as strings and are parsed into domain types;
/// a malformed category, mode, or budget is a 400, never a silent default.
#[derive(Debug, Deserialize)]
pub struct CreateRequirement {
    pub category: String,
    pub subject: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub preferred_teaching_mode: String,
    /// Budget range string, `"MIN-MAX"` or `"MIN+"`.
    pub budget: String,
    pub urgency: String,
    pub class_level: Option<String>,
    pub board: Option<String>,
    pub exam_preparation_level: Option<String>,
    pub skill_level: Option<String>,
    pub age_group: Option<String>,
}

/// Query parameters for `GET /requirements`.
#[derive(Debug, Deserialize)]
pub struct RequirementQuery {
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Maximum page size for requirement listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for requirement listing.
const DEFAULT_LIMIT: i64 = 50;

fn parse_draft(student_id: DbId, input: CreateRequirement) -> Result<RequirementDraft, CoreError> {
    let draft = RequirementDraft {
        student_id,
        category: Category::parse(&input.category)?,
        subject: input.subject,
        location: input.location,
        description: input.description,
        preferred_teaching_mode: TeachingMode::parse(&input.preferred_teaching_mode)?,
        budget: BudgetRange::parse(&input.budget)?,
        urgency: input.urgency,
        class_level: input.class_level,
        board: input.board,
        exam_preparation_level: input.exam_preparation_level,
        skill_level: input.skill_level,
        age_group: input.age_group,
    };
    draft.validate()?;
    Ok(draft)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/requirements
///
/// Create a requirement and kick off matching + notification fan-out in the
/// background. Returns 201 with the stored requirement immediately; the
/// dispatch outcome is observable via `GET /requirements/{id}/matches`.
pub async fn create_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateRequirement>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let draft = parse_draft(auth.user_id, input)?;
    let row = RequirementRepo::create(&state.pool, draft.into()).await?;
    let requirement_id = row.id;

    // Fire-and-forget: the creating request never waits on fan-out.
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        if let Err(e) = dispatcher.dispatch(requirement_id).await {
            tracing::error!(requirement_id, error = %e, "Background dispatch failed");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "data": row })),
    ))
}

/// GET /api/v1/requirements
///
/// List the authenticated student's requirements, newest first.
pub async fn list_requirements(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<RequirementQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let limit = super::page_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT);
    let offset = super::page_offset(params.offset);

    let rows =
        RequirementRepo::list_for_student(&state.pool, auth.user_id, limit, offset).await?;

    Ok(Json(serde_json::json!({ "data": rows })))
}

/// GET /api/v1/requirements/{id}
///
/// Fetch a single requirement. Only its student or an admin may view it.
pub async fn get_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(requirement_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let row = RequirementRepo::get(&state.pool, requirement_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "requirement",
            id: requirement_id,
        }))?;

    if row.student_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requirement belongs to another student".into(),
        )));
    }

    Ok(Json(serde_json::json!({ "data": row })))
}

/// POST /api/v1/requirements/{id}/dispatch
///
/// Re-run matching and fan-out for an existing requirement and wait for the
/// outcome. Storage uniqueness makes this idempotent: tutors already
/// notified are skipped, gaps from earlier partial failures are filled.
pub async fn dispatch_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(requirement_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let row = RequirementRepo::get(&state.pool, requirement_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "requirement",
            id: requirement_id,
        }))?;

    if row.student_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requirement belongs to another student".into(),
        )));
    }

    let report = state.dispatcher.dispatch(requirement_id).await?;

    Ok(Json(serde_json::json!({
        "data": {
            "matched_count": report.matched,
            "dispatched_count": report.dispatched,
            "failed_count": report.failed,
        }
    })))
}

/// GET /api/v1/requirements/{id}/matches
///
/// List the matches recorded for a requirement. Only its student or an
/// admin may view them.
pub async fn list_matches(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(requirement_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let row = RequirementRepo::get(&state.pool, requirement_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "requirement",
            id: requirement_id,
        }))?;

    if row.student_id != auth.user_id && !auth.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "Requirement belongs to another student".into(),
        )));
    }

    let matches = MatchRepo::list_for_requirement(&state.pool, requirement_id).await?;

    Ok(Json(serde_json::json!({ "data": matches })))
}

/// POST /api/v1/requirements/{id}/close
///
/// Close an active requirement. Closed requirements are skipped by any
/// subsequent dispatch. Returns 204, or 404 if no active requirement of
/// the student's matches the id.
pub async fn close_requirement(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(requirement_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let closed = RequirementRepo::close(&state.pool, requirement_id, auth.user_id).await?;

    if !closed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "requirement",
            id: requirement_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
