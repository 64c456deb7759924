//! Requirement-to-tutor matching engine.
//!
//! [`find_matches`] evaluates a student's posted [`Requirement`] against a
//! pool of [`TutorCandidate`] projections. The evaluation is pure: callers
//! load the candidate pool, the engine decides. Results are deterministic
//! (rating descending, user id ascending) and capped at [`MAX_MATCHES`].

use serde::{Deserialize, Serialize};

use crate::budget::BudgetRange;
use crate::error::CoreError;
use crate::skill::{meets_skill_level, skill_ordinal};
use crate::types::{DbId, Timestamp};

/// Maximum number of tutors returned by a single matching run.
pub const MAX_MATCHES: usize = 50;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Subject category of a requirement. Drives the category-specific filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Academic,
    Languages,
    Skills,
    Music,
    Sports,
    Technology,
    Business,
    Hobby,
}

impl Category {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "academic" => Ok(Category::Academic),
            "languages" => Ok(Category::Languages),
            "skills" => Ok(Category::Skills),
            "music" => Ok(Category::Music),
            "sports" => Ok(Category::Sports),
            "technology" => Ok(Category::Technology),
            "business" => Ok(Category::Business),
            "hobby" => Ok(Category::Hobby),
            other => Err(CoreError::Validation(format!(
                "Unknown requirement category: \"{other}\""
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Academic => "academic",
            Category::Languages => "languages",
            Category::Skills => "skills",
            Category::Music => "music",
            Category::Sports => "sports",
            Category::Technology => "technology",
            Category::Business => "business",
            Category::Hobby => "hobby",
        }
    }

    /// Categories whose fit is decided by the ordinal skill-level comparison.
    fn uses_skill_level(self) -> bool {
        matches!(
            self,
            Category::Languages
                | Category::Skills
                | Category::Music
                | Category::Sports
                | Category::Technology
                | Category::Business
        )
    }
}

/// How lessons are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeachingMode {
    Online,
    Offline,
    Both,
}

impl TeachingMode {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(TeachingMode::Online),
            "offline" => Ok(TeachingMode::Offline),
            "both" => Ok(TeachingMode::Both),
            other => Err(CoreError::Validation(format!(
                "Unknown teaching mode: \"{other}\""
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TeachingMode::Online => "online",
            TeachingMode::Offline => "offline",
            TeachingMode::Both => "both",
        }
    }
}

/// Lifecycle status of a requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementStatus {
    Active,
    Closed,
}

impl RequirementStatus {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(RequirementStatus::Active),
            "closed" => Ok(RequirementStatus::Closed),
            other => Err(CoreError::Validation(format!(
                "Unknown requirement status: \"{other}\""
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RequirementStatus::Active => "active",
            RequirementStatus::Closed => "closed",
        }
    }
}

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// A student's posted learning requirement.
///
/// Immutable once matched; only `status` transitions (active -> closed).
#[derive(Debug, Clone, Serialize)]
pub struct Requirement {
    pub id: DbId,
    pub student_id: DbId,
    pub category: Category,
    pub subject: String,
    /// City name, or `"other"` to disable the location filter.
    pub location: String,
    pub description: String,
    pub preferred_teaching_mode: TeachingMode,
    pub budget: BudgetRange,
    pub urgency: String,
    pub class_level: Option<String>,
    pub board: Option<String>,
    pub exam_preparation_level: Option<String>,
    pub skill_level: Option<String>,
    pub age_group: Option<String>,
    pub status: RequirementStatus,
    pub created_at: Timestamp,
}

/// The writable part of a requirement, validated before any insert.
#[derive(Debug, Clone)]
pub struct RequirementDraft {
    pub student_id: DbId,
    pub category: Category,
    pub subject: String,
    pub location: String,
    pub description: String,
    pub preferred_teaching_mode: TeachingMode,
    pub budget: BudgetRange,
    pub urgency: String,
    pub class_level: Option<String>,
    pub board: Option<String>,
    pub exam_preparation_level: Option<String>,
    pub skill_level: Option<String>,
    pub age_group: Option<String>,
}

impl RequirementDraft {
    /// Validate the draft before it is persisted.
    ///
    /// Rules:
    /// - Subject and location must not be empty.
    /// - Academic requirements must carry a class level and a board.
    /// - Skill-based categories must carry a known skill level.
    /// - Hobby requirements must carry an age group.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.subject.trim().is_empty() {
            return Err(CoreError::Validation(
                "Requirement subject must not be empty".to_string(),
            ));
        }
        if self.location.trim().is_empty() {
            return Err(CoreError::Validation(
                "Requirement location must not be empty".to_string(),
            ));
        }

        match self.category {
            Category::Academic => {
                if self.class_level.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    return Err(CoreError::Validation(
                        "Academic requirements must specify a class level".to_string(),
                    ));
                }
                if self.board.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    return Err(CoreError::Validation(
                        "Academic requirements must specify a board".to_string(),
                    ));
                }
            }
            category if category.uses_skill_level() => {
                let Some(level) = self.skill_level.as_deref() else {
                    return Err(CoreError::Validation(format!(
                        "{} requirements must specify a skill level",
                        category.as_str()
                    )));
                };
                if skill_ordinal(level).is_none() {
                    return Err(CoreError::Validation(format!(
                        "Unknown skill level: \"{level}\""
                    )));
                }
            }
            Category::Hobby => {
                if self.age_group.as_deref().is_none_or(|v| v.trim().is_empty()) {
                    return Err(CoreError::Validation(
                        "Hobby requirements must specify an age group".to_string(),
                    ));
                }
            }
            _ => {}
        }

        Ok(())
    }
}

/// Read-only tutor projection evaluated against a requirement.
///
/// Sourced from the external profile store; the matching core never
/// mutates tutor profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorCandidate {
    pub user_id: DbId,
    pub subjects: Vec<String>,
    pub specializations: Vec<String>,
    pub teaching_mode: TeachingMode,
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
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Case-insensitive membership test.
fn contains_ci(haystack: &[String], needle: &str) -> bool {
    haystack.iter().any(|item| item.trim().eq_ignore_ascii_case(needle.trim()))
}

/// At least one occurrence of the requirement's subject among the tutor's
/// subjects or specializations.
fn subject_overlap(requirement: &Requirement, tutor: &TutorCandidate) -> bool {
    contains_ci(&tutor.subjects, &requirement.subject)
        || contains_ci(&tutor.specializations, &requirement.subject)
}

/// Location filter: `"other"` disables it; otherwise the tutor's city or
/// area must equal the requirement's location.
fn location_match(requirement: &Requirement, tutor: &TutorCandidate) -> bool {
    if requirement.location.eq_ignore_ascii_case("other") {
        return true;
    }
    tutor.city.eq_ignore_ascii_case(requirement.location.trim())
        || tutor.area.eq_ignore_ascii_case(requirement.location.trim())
}

/// Teaching-mode filter: `both` disables it; otherwise modes must be equal.
fn mode_match(requirement: &Requirement, tutor: &TutorCandidate) -> bool {
    requirement.preferred_teaching_mode == TeachingMode::Both
        || tutor.teaching_mode == requirement.preferred_teaching_mode
}

fn budget_overlap(requirement: &Requirement, tutor: &TutorCandidate) -> bool {
    requirement
        .budget
        .overlaps_rate(tutor.hourly_rate_min, tutor.hourly_rate_max)
}

/// Skill levels the ordinal comparison runs against for a category.
///
/// Language tutors maintain a dedicated per-language level list; when it is
/// empty the general skill-level list applies.
fn effective_skill_levels<'a>(category: Category, tutor: &'a TutorCandidate) -> &'a [String] {
    if category == Category::Languages && !tutor.language_levels.is_empty() {
        &tutor.language_levels
    } else {
        &tutor.skill_levels
    }
}

/// Category-specific filter.
fn category_match(requirement: &Requirement, tutor: &TutorCandidate) -> bool {
    match requirement.category {
        Category::Academic => {
            let class_ok = requirement
                .class_level
                .as_deref()
                .is_none_or(|level| contains_ci(&tutor.academic_levels, level));
            let board_ok = requirement
                .board
                .as_deref()
                .is_none_or(|board| contains_ci(&tutor.boards, board));
            let exam_ok = requirement
                .exam_preparation_level
                .as_deref()
                .is_none_or(|level| contains_ci(&tutor.exam_preparation_levels, level));
            class_ok && board_ok && exam_ok
        }
        category if category.uses_skill_level() => {
            requirement.skill_level.as_deref().is_none_or(|required| {
                meets_skill_level(effective_skill_levels(category, tutor), required)
            })
        }
        Category::Hobby => requirement
            .age_group
            .as_deref()
            .is_none_or(|group| contains_ci(&tutor.age_groups, group)),
        _ => true,
    }
}

/// The full match predicate: hard filters (verified, active) AND all soft
/// filters.
pub fn is_match(requirement: &Requirement, tutor: &TutorCandidate) -> bool {
    tutor.verified
        && tutor.active
        && subject_overlap(requirement, tutor)
        && location_match(requirement, tutor)
        && mode_match(requirement, tutor)
        && budget_overlap(requirement, tutor)
        && category_match(requirement, tutor)
}

/// Evaluate a requirement against the candidate pool.
///
/// Returns the qualifying tutors ordered by rating descending, tie-broken
/// by ascending user id, truncated to [`MAX_MATCHES`]. An empty pool or an
/// empty result is not an error.
pub fn find_matches(requirement: &Requirement, pool: &[TutorCandidate]) -> Vec<TutorCandidate> {
    let mut matched: Vec<TutorCandidate> = pool
        .iter()
        .filter(|tutor| is_match(requirement, tutor))
        .cloned()
        .collect();

    matched.sort_by(|a, b| {
        b.rating
            .partial_cmp(&a.rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    matched.truncate(MAX_MATCHES);
    matched
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn academic_requirement() -> Requirement {
        Requirement {
            id: 1,
            student_id: 10,
            category: Category::Academic,
            subject: "mathematics".to_string(),
            location: "mumbai".to_string(),
            description: "Need help with calculus".to_string(),
            preferred_teaching_mode: TeachingMode::Online,
            budget: BudgetRange::parse("1000-2000").unwrap(),
            urgency: "immediate".to_string(),
            class_level: Some("grade_11".to_string()),
            board: Some("cbse".to_string()),
            exam_preparation_level: None,
            skill_level: None,
            age_group: None,
            status: RequirementStatus::Active,
            created_at: chrono::Utc::now(),
        }
    }

    fn math_tutor(user_id: DbId) -> TutorCandidate {
        TutorCandidate {
            user_id,
            subjects: vec!["mathematics".to_string()],
            specializations: vec![],
            teaching_mode: TeachingMode::Online,
            hourly_rate_min: 1200,
            hourly_rate_max: 1800,
            verified: true,
            active: true,
            city: "mumbai".to_string(),
            area: "andheri".to_string(),
            rating: 4.2,
            academic_levels: vec!["grade_11".to_string(), "grade_12".to_string()],
            boards: vec!["cbse".to_string(), "icse".to_string()],
            language_levels: vec![],
            exam_preparation_levels: vec![],
            age_groups: vec![],
            skill_levels: vec![],
        }
    }

    // -- hard filters ---------------------------------------------------------

    #[test]
    fn qualifying_tutor_matches() {
        let requirement = academic_requirement();
        let tutor = math_tutor(1);
        assert!(is_match(&requirement, &tutor));
    }

    #[test]
    fn unverified_tutor_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.verified = false;
        assert!(!is_match(&requirement, &tutor));
    }

    #[test]
    fn inactive_tutor_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.active = false;
        assert!(!is_match(&requirement, &tutor));
    }

    // -- subject overlap ------------------------------------------------------

    #[test]
    fn subject_can_match_via_specializations() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.subjects = vec!["physics".to_string()];
        tutor.specializations = vec!["Mathematics".to_string()];
        assert!(is_match(&requirement, &tutor));
    }

    #[test]
    fn unrelated_subject_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.subjects = vec!["history".to_string()];
        assert!(!is_match(&requirement, &tutor));
    }

    // -- location -------------------------------------------------------------

    #[test]
    fn wrong_city_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.city = "pune".to_string();
        tutor.area = "kothrud".to_string();
        assert!(!is_match(&requirement, &tutor));
    }

    #[test]
    fn area_match_is_sufficient() {
        let mut requirement = academic_requirement();
        requirement.location = "andheri".to_string();
        let tutor = math_tutor(1);
        assert!(is_match(&requirement, &tutor));
    }

    #[test]
    fn other_location_disables_the_filter() {
        let mut requirement = academic_requirement();
        requirement.location = "other".to_string();
        let mut tutor = math_tutor(1);
        tutor.city = "pune".to_string();
        tutor.area = "kothrud".to_string();
        assert!(is_match(&requirement, &tutor));
    }

    // -- teaching mode --------------------------------------------------------

    #[test]
    fn mode_mismatch_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.teaching_mode = TeachingMode::Offline;
        assert!(!is_match(&requirement, &tutor));
    }

    #[test]
    fn both_preference_disables_the_mode_filter() {
        let mut requirement = academic_requirement();
        requirement.preferred_teaching_mode = TeachingMode::Both;
        let mut tutor = math_tutor(1);
        tutor.teaching_mode = TeachingMode::Offline;
        assert!(is_match(&requirement, &tutor));
    }

    // -- budget ---------------------------------------------------------------

    #[test]
    fn rate_band_outside_budget_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.hourly_rate_min = 2500;
        tutor.hourly_rate_max = 3000;
        assert!(!is_match(&requirement, &tutor));
    }

    #[test]
    fn unbounded_budget_matches_expensive_tutors() {
        let mut requirement = academic_requirement();
        requirement.budget = BudgetRange::parse("3000+").unwrap();
        let mut tutor = math_tutor(1);
        tutor.hourly_rate_min = 5000;
        tutor.hourly_rate_max = 9000;
        assert!(is_match(&requirement, &tutor));
    }

    // -- category: academic ---------------------------------------------------

    #[test]
    fn wrong_board_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.boards = vec!["ib".to_string()];
        assert!(!is_match(&requirement, &tutor));
    }

    #[test]
    fn wrong_class_level_is_excluded() {
        let requirement = academic_requirement();
        let mut tutor = math_tutor(1);
        tutor.academic_levels = vec!["grade_5".to_string()];
        assert!(!is_match(&requirement, &tutor));
    }

    // -- category: skill level ------------------------------------------------

    fn language_requirement(level: &str) -> Requirement {
        let mut requirement = academic_requirement();
        requirement.category = Category::Languages;
        requirement.subject = "spanish".to_string();
        requirement.class_level = None;
        requirement.board = None;
        requirement.skill_level = Some(level.to_string());
        requirement
    }

    fn language_tutor(user_id: DbId, levels: &[&str]) -> TutorCandidate {
        let mut tutor = math_tutor(user_id);
        tutor.subjects = vec!["spanish".to_string()];
        tutor.academic_levels = vec![];
        tutor.boards = vec![];
        tutor.skill_levels = levels.iter().map(|s| s.to_string()).collect();
        tutor
    }

    #[test]
    fn beginner_tutor_excluded_from_intermediate_requirement() {
        let requirement = language_requirement("intermediate");
        let tutor = language_tutor(1, &["beginner"]);
        assert!(!is_match(&requirement, &tutor));
    }

    #[test]
    fn advanced_tutor_included_in_intermediate_requirement() {
        let requirement = language_requirement("intermediate");
        let tutor = language_tutor(1, &["advanced"]);
        assert!(is_match(&requirement, &tutor));
    }

    #[test]
    fn dedicated_language_levels_take_precedence() {
        let requirement = language_requirement("advanced");
        let mut tutor = language_tutor(1, &["expert"]);
        tutor.language_levels = vec!["beginner".to_string()];
        assert!(!is_match(&requirement, &tutor));
    }

    // -- category: hobby ------------------------------------------------------

    #[test]
    fn hobby_requires_age_group_membership() {
        let mut requirement = academic_requirement();
        requirement.category = Category::Hobby;
        requirement.class_level = None;
        requirement.board = None;
        requirement.age_group = Some("kids".to_string());

        let mut tutor = math_tutor(1);
        tutor.age_groups = vec!["adults".to_string()];
        assert!(!is_match(&requirement, &tutor));

        tutor.age_groups = vec!["kids".to_string(), "teens".to_string()];
        assert!(is_match(&requirement, &tutor));
    }

    // -- find_matches ordering and cap ----------------------------------------

    #[test]
    fn empty_pool_yields_empty_result() {
        let requirement = academic_requirement();
        assert!(find_matches(&requirement, &[]).is_empty());
    }

    #[test]
    fn results_are_ordered_by_rating_then_id() {
        let requirement = academic_requirement();
        let mut low = math_tutor(1);
        low.rating = 3.0;
        let mut high = math_tutor(2);
        high.rating = 4.8;
        let mut tied = math_tutor(3);
        tied.rating = 4.8;

        let matches = find_matches(&requirement, &[low, tied, high]);
        let ids: Vec<DbId> = matches.iter().map(|t| t.user_id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn results_are_capped_at_fifty() {
        let requirement = academic_requirement();
        let pool: Vec<TutorCandidate> = (1..=80).map(math_tutor).collect();
        let matches = find_matches(&requirement, &pool);
        assert_eq!(matches.len(), MAX_MATCHES);
    }

    #[test]
    fn non_matching_tutors_are_filtered_out() {
        let requirement = academic_requirement();
        let good = math_tutor(1);
        let mut bad = math_tutor(2);
        bad.verified = false;

        let matches = find_matches(&requirement, &[good, bad]);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].user_id, 1);
    }

    // -- draft validation -----------------------------------------------------

    fn draft() -> RequirementDraft {
        RequirementDraft {
            student_id: 10,
            category: Category::Academic,
            subject: "mathematics".to_string(),
            location: "mumbai".to_string(),
            description: String::new(),
            preferred_teaching_mode: TeachingMode::Online,
            budget: BudgetRange::parse("1000-2000").unwrap(),
            urgency: "flexible".to_string(),
            class_level: Some("grade_11".to_string()),
            board: Some("cbse".to_string()),
            exam_preparation_level: None,
            skill_level: None,
            age_group: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn empty_subject_is_rejected() {
        let mut d = draft();
        d.subject = "  ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn academic_draft_without_board_is_rejected() {
        let mut d = draft();
        d.board = None;
        assert!(d.validate().is_err());
    }

    #[test]
    fn skill_category_without_level_is_rejected() {
        let mut d = draft();
        d.category = Category::Technology;
        d.skill_level = None;
        assert!(d.validate().is_err());
    }

    #[test]
    fn unknown_skill_level_is_rejected() {
        let mut d = draft();
        d.category = Category::Technology;
        d.skill_level = Some("ninja".to_string());
        assert!(d.validate().is_err());
    }

    #[test]
    fn hobby_without_age_group_is_rejected() {
        let mut d = draft();
        d.category = Category::Hobby;
        d.age_group = None;
        assert!(d.validate().is_err());
    }

    // -- enum parsing ---------------------------------------------------------

    #[test]
    fn category_parse_round_trips() {
        for raw in ["academic", "languages", "skills", "music", "sports", "technology", "business", "hobby"] {
            assert_eq!(Category::parse(raw).unwrap().as_str(), raw);
        }
        assert!(Category::parse("astrology").is_err());
    }

    #[test]
    fn teaching_mode_parse_round_trips() {
        for raw in ["online", "offline", "both"] {
            assert_eq!(TeachingMode::parse(raw).unwrap().as_str(), raw);
        }
        assert!(TeachingMode::parse("hybrid").is_err());
    }

    #[test]
    fn status_parse_round_trips() {
        assert_eq!(RequirementStatus::parse("active").unwrap(), RequirementStatus::Active);
        assert_eq!(RequirementStatus::parse("closed").unwrap(), RequirementStatus::Closed);
        assert!(RequirementStatus::parse("archived").is_err());
    }
}
