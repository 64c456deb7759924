//! Match entity models.

use serde::Serialize;
use sqlx::FromRow;
use tutorlink_core::types::{DbId, Timestamp};

/// Initial status of a freshly dispatched match.
pub const MATCH_STATUS_PENDING: &str = "pending";
/// Status once the tutor has accepted by expressing interest.
pub const MATCH_STATUS_ACCEPTED: &str = "accepted";
/// Status once the tutor has declined.
pub const MATCH_STATUS_DECLINED: &str = "declined";

/// A row from the `matches` table.
///
/// One row per (requirement, tutor) pair; the unique constraint
/// `uq_matches_requirement_tutor` makes dispatch retries idempotent.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MatchRecord {
    pub id: DbId,
    pub requirement_id: DbId,
    pub tutor_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_status_vocabulary_is_pending_accepted_declined() {
        assert_eq!(MATCH_STATUS_PENDING, "pending");
        assert_eq!(MATCH_STATUS_ACCEPTED, "accepted");
        assert_eq!(MATCH_STATUS_DECLINED, "declined");
    }
}
