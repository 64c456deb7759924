//! Repository for the `matches` table.

use sqlx::PgPool;
use tutorlink_core::types::DbId;

use crate::models::match_record::MatchRecord;

/// Column list for `matches` queries.
const COLUMNS: &str = "id, requirement_id, tutor_id, status, created_at";

/// Provides CRUD operations for requirement/tutor matches.
pub struct MatchRepo;

impl MatchRepo {
    /// Insert a match for a (requirement, tutor) pair.
    ///
    /// Returns `None` when the pair already exists; the unique constraint
    /// `uq_matches_requirement_tutor` absorbs dispatch retries.
    pub async fn create(
        pool: &PgPool,
        requirement_id: DbId,
        tutor_id: DbId,
        status: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO matches (requirement_id, tutor_id, status) \
             VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_matches_requirement_tutor DO NOTHING \
             RETURNING id",
        )
        .bind(requirement_id)
        .bind(tutor_id)
        .bind(status)
        .fetch_optional(pool)
        .await
    }

    /// List matches for a requirement, newest first.
    pub async fn list_for_requirement(
        pool: &PgPool,
        requirement_id: DbId,
    ) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches \
             WHERE requirement_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(requirement_id)
            .fetch_all(pool)
            .await
    }

    /// List matches offered to a tutor, newest first.
    pub async fn list_for_tutor(
        pool: &PgPool,
        tutor_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MatchRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM matches \
             WHERE tutor_id = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(tutor_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a match's status on behalf of its tutor.
    ///
    /// Returns `true` if the match existed for that tutor.
    pub async fn update_status(
        pool: &PgPool,
        match_id: DbId,
        tutor_id: DbId,
        status: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE matches SET status = $3 WHERE id = $1 AND tutor_id = $2",
        )
        .bind(match_id)
        .bind(tutor_id)
        .bind(status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch a match by id.
    pub async fn get(pool: &PgPool, match_id: DbId) -> Result<Option<MatchRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM matches WHERE id = $1");
        sqlx::query_as::<_, MatchRecord>(&query)
            .bind(match_id)
            .fetch_optional(pool)
            .await
    }
}
