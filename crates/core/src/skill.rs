//! Ordinal skill levels.
//!
//! Qualitative skill-level strings are compared through a fixed numeric
//! ranking. The table is deliberately coarse: `elementary` ranks with
//! `beginner`, and `upper_intermediate` with `intermediate`.

/// Map a skill-level string to its ordinal rank (1..=4), case-insensitively.
///
/// Returns `None` for unknown level strings.
pub fn skill_ordinal(level: &str) -> Option<u8> {
    match level.trim().to_ascii_lowercase().as_str() {
        "beginner" | "elementary" => Some(1),
        "intermediate" | "upper_intermediate" => Some(2),
        "advanced" => Some(3),
        "expert" => Some(4),
        _ => None,
    }
}

/// Whether a tutor's skill levels satisfy a required level.
///
/// A tutor qualifies iff the highest rank among their levels is at least
/// the required rank. Unknown tutor levels are ignored; an unknown
/// required level never matches.
pub fn meets_skill_level(tutor_levels: &[String], required: &str) -> bool {
    let Some(required_rank) = skill_ordinal(required) else {
        return false;
    };
    tutor_levels
        .iter()
        .filter_map(|level| skill_ordinal(level))
        .max()
        .is_some_and(|best| best >= required_rank)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
