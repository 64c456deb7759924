//! Repository for the `requirements` table.

use sqlx::PgPool;
use tutorlink_core::types::DbId;

use crate::models::requirement::{NewRequirement, RequirementRow};

/// Column list for `requirements` queries.
const COLUMNS: &str = "id, student_id, category, subject, location, description, \
     preferred_teaching_mode, budget, urgency, class_level, board, \
     exam_preparation_level, skill_level, age_group, status, created_at";

/// Provides CRUD operations for requirements.
pub struct RequirementRepo;

impl RequirementRepo {
    /// Insert a requirement, returning the stored row.
    pub async fn create(pool: &PgPool, new: NewRequirement) -> Result<RequirementRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO requirements \
                 (student_id, category, subject, location, description, \
                  preferred_teaching_mode, budget, urgency, class_level, board, \
                  exam_preparation_level, skill_level, age_group) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RequirementRow>(&query)
            .bind(new.student_id)
            .bind(&new.category)
            .bind(&new.subject)
            .bind(&new.location)
            .bind(&new.description)
            .bind(&new.preferred_teaching_mode)
            .bind(&new.budget)
            .bind(&new.urgency)
            .bind(&new.class_level)
            .bind(&new.board)
            .bind(&new.exam_preparation_level)
            .bind(&new.skill_level)
            .bind(&new.age_group)
            .fetch_one(pool)
            .await
    }

    /// Fetch a requirement by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<RequirementRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM requirements WHERE id = $1");
        sqlx::query_as::<_, RequirementRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's requirements, newest first.
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RequirementRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM requirements \
             WHERE student_id = $1 \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, RequirementRow>(&query)
            .bind(student_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Transition a requirement to `closed`.
    ///
    /// Returns `true` if the row existed and was still active.
    pub async fn close(pool: &PgPool, id: DbId, student_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE requirements \
             SET status = 'closed' \
             WHERE id = $1 AND student_id = $2 AND status = 'active'",
        )
        .bind(id)
        .bind(student_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
