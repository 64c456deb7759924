//! Requirement entity models.

use serde::Serialize;
use sqlx::FromRow;
use tutorlink_core::budget::BudgetRange;
use tutorlink_core::error::CoreError;
use tutorlink_core::matching::{Category, Requirement, RequirementDraft, RequirementStatus, TeachingMode};
use tutorlink_core::types::{DbId, Timestamp};

/// A row from the `requirements` table.
///
/// Enumerated columns are stored as text; [`RequirementRow::into_domain`]
/// parses them into the typed domain representation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RequirementRow {
    pub id: DbId,
    pub student_id: DbId,
    pub category: String,
    pub subject: String,
    pub location: String,
    pub description: String,
    pub preferred_teaching_mode: String,
    pub budget: String,
    pub urgency: String,
    pub class_level: Option<String>,
    pub board: Option<String>,
    pub exam_preparation_level: Option<String>,
    pub skill_level: Option<String>,
    pub age_group: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
}

impl RequirementRow {
    /// Parse the stored text columns into the typed domain requirement.
    ///
    /// Rows are only written through a validated [`RequirementDraft`], so a
    /// parse failure here means the row was corrupted outside the API.
    pub fn into_domain(self) -> Result<Requirement, CoreError> {
        Ok(Requirement {
            id: self.id,
            student_id: self.student_id,
            category: Category::parse(&self.category)?,
            subject: self.subject,
            location: self.location,
            description: self.description,
            preferred_teaching_mode: TeachingMode::parse(&self.preferred_teaching_mode)?,
            budget: BudgetRange::parse(&self.budget)?,
            urgency: self.urgency,
            class_level: self.class_level,
            board: self.board,
            exam_preparation_level: self.exam_preparation_level,
            skill_level: self.skill_level,
            age_group: self.age_group,
            status: RequirementStatus::parse(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// Column values for inserting a requirement, derived from a validated draft.
#[derive(Debug, Clone)]
pub struct NewRequirement {
    pub student_id: DbId,
    pub category: String,
    pub subject: String,
    pub location: String,
    pub description: String,
    pub preferred_teaching_mode: String,
    pub budget: String,
    pub urgency: String,
    pub class_level: Option<String>,
    pub board: Option<String>,
    pub exam_preparation_level: Option<String>,
    pub skill_level: Option<String>,
    pub age_group: Option<String>,
}

impl From<RequirementDraft> for NewRequirement {
    fn from(draft: RequirementDraft) -> Self {
        Self {
            student_id: draft.student_id,
            category: draft.category.as_str().to_string(),
            subject: draft.subject,
            location: draft.location,
            description: draft.description,
            preferred_teaching_mode: draft.preferred_teaching_mode.as_str().to_string(),
            budget: draft.budget.to_string(),
            urgency: draft.urgency,
            class_level: draft.class_level,
            board: draft.board,
            exam_preparation_level: draft.exam_preparation_level,
            skill_level: draft.skill_level,
            age_group: draft.age_group,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_round_trips_through_domain() {
        let row = RequirementRow {
            id: 7,
            student_id: 3,
            category: "academic".to_string(),
            subject: "mathematics".to_string(),
            location: "mumbai".to_string(),
            description: String::new(),
            preferred_teaching_mode: "online".to_string(),
            budget: "1000-2000".to_string(),
            urgency: "immediate".to_string(),
            class_level: Some("grade_11".to_string()),
            board: Some("cbse".to_string()),
            exam_preparation_level: None,
            skill_level: None,
            age_group: None,
            status: "active".to_string(),
            created_at: chrono::Utc::now(),
        };
        let requirement = row.into_domain().unwrap();
        assert_eq!(requirement.category, Category::Academic);
        assert_eq!(requirement.budget.max, Some(2000));
        assert_eq!(requirement.status, RequirementStatus::Active);
    }

    #[test]
    fn corrupted_category_fails_to_parse() {
        let row = RequirementRow {
            id: 7,
            student_id: 3,
            category: "astrology".to_string(),
            subject: "s".to_string(),
            location: "l".to_string(),
            description: String::new(),
            preferred_teaching_mode: "online".to_string(),
            budget: "1000-2000".to_string(),
            urgency: "flexible".to_string(),
            class_level: None,
            board: None,
            exam_preparation_level: None,
            skill_level: None,
            age_group: None,
            status: "active".to_string(),
            created_at: chrono::Utc::now(),
        };
        assert!(row.into_domain().is_err());
    }
}
