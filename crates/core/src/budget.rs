//! Budget-range parsing and overlap checks.

use crate::error::CoreError;

/// A parsed hourly-budget range.
///
/// `"1000-2000"` parses to min 1000 / max 2000. A trailing `+` marks an
/// unbounded upper end: `"3000+"` parses to min 3000 / max `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
    pub min: i64,
    /// `None` means no upper bound.
    pub max: Option<i64>,
}

impl BudgetRange {
    /// Build a range, rejecting negative amounts and inverted bounds.
    pub fn new(min: i64, max: Option<i64>) -> Result<Self, CoreError> {
        if min < 0 {
            return Err(CoreError::Validation(format!(
                "Budget minimum must not be negative, got {min}"
            )));
        }
        if let Some(max) = max {
            if max < min {
                return Err(CoreError::Validation(format!(
                    "Budget range is inverted: {min}-{max}"
                )));
            }
        }
        Ok(Self { min, max })
    }

    /// Parse a budget-range string.
    ///
    /// Accepted shapes are `"MIN-MAX"` and `"MIN+"`. Anything else is a
    /// validation error; malformed ranges are never silently defaulted.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if let Some(min_str) = raw.strip_suffix('+') {
            let min = parse_amount(min_str)?;
            return Self::new(min, None);
        }
        let Some((min_str, max_str)) = raw.split_once('-') else {
            return Err(CoreError::Validation(format!(
                "Malformed budget range: \"{raw}\" (expected \"MIN-MAX\" or \"MIN+\")"
            )));
        };
        let min = parse_amount(min_str)?;
        let max = parse_amount(max_str)?;
        Self::new(min, Some(max))
    }

    /// Whether a tutor's hourly-rate band overlaps this budget.
    ///
    /// Overlap requires `rate_min <= budget_max` and `rate_max >= budget_min`;
    /// an unbounded budget max accepts any rate minimum.
    pub fn overlaps_rate(&self, rate_min: i64, rate_max: i64) -> bool {
        let below_cap = match self.max {
            Some(max) => rate_min <= max,
            None => true,
        };
        below_cap && rate_max >= self.min
    }
}

impl std::fmt::Display for BudgetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}-{}", self.min, max),
            None => write!(f, "{}+", self.min),
        }
    }
}

// Serializes as the canonical range string, matching the stored column.
impl serde::Serialize for BudgetRange {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_amount(raw: &str) -> Result<i64, CoreError> {
    raw.trim().parse::<i64>().map_err(|_| {
        CoreError::Validation(format!("Malformed budget amount: \"{}\"", raw.trim()))
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- parse ----------------------------------------------------------------

    #[test]
    fn parses_bounded_range() {
        let range = BudgetRange::parse("1000-2000").unwrap();
        assert_eq!(range.min, 1000);
        assert_eq!(range.max, Some(2000));
    }

    #[test]
    fn parses_unbounded_range() {
        let range = BudgetRange::parse("3000+").unwrap();
        assert_eq!(range.min, 3000);
        assert_eq!(range.max, None);
    }

    #[test]
    fn tolerates_inner_whitespace() {
        let range = BudgetRange::parse(" 500 - 800 ").unwrap();
        assert_eq!(range.min, 500);
        assert_eq!(range.max, Some(800));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(BudgetRange::parse("1000").is_err());
    }

    #[test]
    fn rejects_non_numeric_amounts() {
        assert!(BudgetRange::parse("abc-def").is_err());
        assert!(BudgetRange::parse("1000-max").is_err());
        assert!(BudgetRange::parse("+").is_err());
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(BudgetRange::parse("2000-1000").is_err());
    }

    #[test]
    fn rejects_empty_string() {
        assert!(BudgetRange::parse("").is_err());
    }

    #[test]
    fn parse_errors_are_validation_errors() {
        match BudgetRange::parse("cheap") {
            Err(CoreError::Validation(_)) => {}
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    // -- overlaps_rate --------------------------------------------------------

    #[test]
    fn overlapping_band_matches() {
        let range = BudgetRange::parse("1000-2000").unwrap();
        assert!(range.overlaps_rate(1200, 1800));
        assert!(range.overlaps_rate(500, 1000));
        assert!(range.overlaps_rate(2000, 5000));
    }

    #[test]
    fn disjoint_band_does_not_match() {
        let range = BudgetRange::parse("1000-2000").unwrap();
        assert!(!range.overlaps_rate(2500, 3000));
        assert!(!range.overlaps_rate(100, 900));
    }

    #[test]
    fn unbounded_max_accepts_any_rate_minimum() {
        // "3000+" matches any tutor whose rate maximum reaches 3000,
        // regardless of how high the rate minimum is.
        let range = BudgetRange::parse("3000+").unwrap();
        assert!(range.overlaps_rate(3000, 3500));
        assert!(range.overlaps_rate(50_000, 80_000));
        assert!(!range.overlaps_rate(1000, 2999));
    }

    // -- display --------------------------------------------------------------

    #[test]
    fn display_round_trips() {
        assert_eq!(BudgetRange::parse("1000-2000").unwrap().to_string(), "1000-2000");
        assert_eq!(BudgetRange::parse("3000+").unwrap().to_string(), "3000+");
    }

    #[test]
    fn serializes_as_the_range_string() {
        let range = BudgetRange::parse("3000+").unwrap();
        assert_eq!(serde_json::to_value(range).unwrap(), "3000+");
    }
}
