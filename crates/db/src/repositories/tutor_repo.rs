//! Repository for the `tutor_profiles` table.

use sqlx::PgPool;
use tutorlink_core::types::DbId;

use crate::models::tutor::TutorProfileRow;

/// Column list for `tutor_profiles` queries.
const COLUMNS: &str = "user_id, subjects, specializations, teaching_mode, \
     hourly_rate_min, hourly_rate_max, verified, active, city, area, rating, \
     academic_levels, boards, language_levels, exam_preparation_levels, \
     age_groups, skill_levels, created_at";

/// Read-only access to tutor profiles for the matching engine.
pub struct TutorRepo;

impl TutorRepo {
    /// Fetch a tutor profile by user id.
    pub async fn get(pool: &PgPool, user_id: DbId) -> Result<Option<TutorProfileRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tutor_profiles WHERE user_id = $1");
        sqlx::query_as::<_, TutorProfileRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Load the candidate pool for a matching run.
    ///
    /// The verified/active filters are applied again in the engine; pushing
    /// them into SQL just keeps the pool small.
    pub async fn list_candidates(pool: &PgPool) -> Result<Vec<TutorProfileRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tutor_profiles \
             WHERE verified = true AND active = true \
             ORDER BY user_id"
        );
        sqlx::query_as::<_, TutorProfileRow>(&query)
            .fetch_all(pool)
            .await
    }
}
