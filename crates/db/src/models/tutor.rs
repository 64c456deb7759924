//! Tutor profile entity models.

use serde::Serialize;
use sqlx::FromRow;
use tutorlink_core::error::CoreError;
use tutorlink_core::matching::{TeachingMode, TutorCandidate};
use tutorlink_core::types::{DbId, Timestamp};

/// A row from the `tutor_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TutorProfileRow {
    pub user_id: DbId,
    pub subjects: Vec<String>,
    pub specializations: Vec<String>,
    pub teaching_mode: String,
    pub hourly_rate_min: i64,
    pub hourly_rate_max: i64,
    pub verified: bool,
    pub active: bool,
    pub city: String,
    pub area: String,
    pub rating: f64,
    pub academic_levels: Vec<String>,
    pub boards: Vec<String>,
    pub language_levels: Vec<String>,
    pub exam_preparation_levels: Vec<String>,
    pub age_groups: Vec<String>,
    pub skill_levels: Vec<String>,
    pub created_at: Timestamp,
}

impl TutorProfileRow {
    /// Project the row into the matching engine's candidate type.
    pub fn into_candidate(self) -> Result<TutorCandidate, CoreError> {
        Ok(TutorCandidate {
            user_id: self.user_id,
            subjects: self.subjects,
            specializations: self.specializations,
            teaching_mode: TeachingMode::parse(&self.teaching_mode)?,
            hourly_rate_min: self.hourly_rate_min,
            hourly_rate_max: self.hourly_rate_max,
            verified: self.verified,
            active: self.active,
            city: self.city,
            area: self.area,
            rating: self.rating,
            academic_levels: self.academic_levels,
            boards: self.boards,
            language_levels: self.language_levels,
            exam_preparation_levels: self.exam_preparation_levels,
            age_groups: self.age_groups,
            skill_levels: self.skill_levels,
        })
    }
}
