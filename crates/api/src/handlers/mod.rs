//! HTTP request handlers, grouped by resource.

pub mod match_offer;
pub mod message;
pub mod notification;
pub mod requirement;

/// Clamp a requested page size into `1..=max`, falling back to `default`
/// when absent. Negative or zero sizes would otherwise reach the store as
/// invalid `LIMIT` values.
pub(crate) fn page_limit(requested: Option<i64>, default: i64, max: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, max)
}

/// Clamp a requested offset to be non-negative.
pub(crate) fn page_offset(requested: Option<i64>) -> i64 {
    requested.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_limit_clamps_both_ends() {
        assert_eq!(page_limit(None, 50, 100), 50);
        assert_eq!(page_limit(Some(20), 50, 100), 20);
        assert_eq!(page_limit(Some(500), 50, 100), 100);
        assert_eq!(page_limit(Some(0), 50, 100), 1);
        assert_eq!(page_limit(Some(-3), 50, 100), 1);
    }

    #[test]
    fn page_offset_never_goes_negative() {
        assert_eq!(page_offset(None), 0);
        assert_eq!(page_offset(Some(25)), 25);
        assert_eq!(page_offset(Some(-5)), 0);
    }
}
