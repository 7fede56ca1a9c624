//! Result shaping: limit validation, truncation and display casing.

use std::sync::Arc;

use placenames_types::{Suggestion, ValidationError};

use crate::analyzer::apply_prefix_casing;
use crate::index::PrefixIndex;

/// Looks up `prefix` and returns at most `limit` suggestions.
///
/// `limit` must lie in `[1, max_allowed]`; anything else is rejected rather
/// than coerced. A limit larger than the number of matches is not an error,
/// the result is simply shorter. Each returned name is recased to follow the
/// query prefix (see [`apply_prefix_casing`]); ranking is unaffected.
pub fn query(
    index: &PrefixIndex,
    prefix: &str,
    limit: i64,
    max_allowed: usize,
) -> Result<Vec<Suggestion>, ValidationError> {
    let limit = validate_limit(limit, max_allowed)?;
    let matches = index.find_by_prefix(prefix);

    Ok(matches
        .iter()
        .take(limit)
        .map(|entry| Suggestion::new(apply_prefix_casing(entry.name, prefix), entry.relevancy))
        .collect())
}

/// Checks `1 <= limit <= max_allowed`.
pub fn validate_limit(limit: i64, max_allowed: usize) -> Result<usize, ValidationError> {
    match usize::try_from(limit) {
        Ok(n) if (1..=max_allowed).contains(&n) => Ok(n),
        _ => Err(ValidationError::LimitOutOfRange {
            requested: limit,
            max: max_allowed,
        }),
    }
}

/// Parses an optional textual limit, falling back to `default`.
///
/// An absent or empty value means "use the default". Any other text that is
/// not an integer is a validation error, never a silent fallback.
pub fn parse_limit(
    raw: Option<&str>,
    default: usize,
    max_allowed: usize,
) -> Result<usize, ValidationError> {
    let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
        return Ok(default);
    };
    let limit = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidLimit {
            raw: raw.to_owned(),
            max: max_allowed,
        })?;
    validate_limit(limit, max_allowed)
}

/// Shared, read-only query front end over a finalized index.
///
/// Cloning is cheap; every clone points at the same index.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: Arc<PrefixIndex>,
}

impl QueryEngine {
    pub fn new(index: PrefixIndex) -> Self {
        Self {
            index: Arc::new(index),
        }
    }

    pub fn from_shared(index: Arc<PrefixIndex>) -> Self {
        Self { index }
    }

    #[inline(always)]
    pub fn index(&self) -> &PrefixIndex {
        &self.index
    }

    /// Largest limit a caller may request (the per-node capacity).
    #[inline(always)]
    pub fn max_limit(&self) -> usize {
        self.index.capacity_per_node()
    }

    /// Limit applied when the caller gives none.
    #[inline(always)]
    pub fn default_limit(&self) -> usize {
        self.index.config().effective_default_limit()
    }

    /// Runs a query with an explicit limit.
    pub fn query(&self, prefix: &str, limit: i64) -> Result<Vec<Suggestion>, ValidationError> {
        query(&self.index, prefix, limit, self.max_limit())
    }

    /// Runs a query with an optional textual limit, as received from a
    /// request.
    pub fn suggest(
        &self,
        prefix: &str,
        raw_limit: Option<&str>,
    ) -> Result<Vec<Suggestion>, ValidationError> {
        let limit = parse_limit(raw_limit, self.default_limit(), self.max_limit())?;
        query(&self.index, prefix, limit as i64, self.max_limit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build;

    fn index() -> PrefixIndex {
        build(
            100,
            [("London", 1.0), ("Los Angeles", 0.9), ("Liverpool", 0.8)],
        )
        .expect("should build")
    }

    fn names(results: &[Suggestion]) -> Vec<&str> {
        results.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn returns_ranked_suggestions() {
        let results = query(&index(), "Lo", 10, 100).unwrap();
        assert_eq!(
            results,
            vec![Suggestion::new("London", 1.0), Suggestion::new("Los Angeles", 0.9)]
        );
    }

    #[test]
    fn recases_to_match_prefix() {
        let index = build(10, [("london", 1.0)]).unwrap();
        let results = query(&index, "Lo", 10, 10).unwrap();
        assert_eq!(names(&results), vec!["London"]);

        let results = query(&index, "LON", 10, 10).unwrap();
        assert_eq!(names(&results), vec!["LONdon"]);
    }

    #[test]
    fn recasing_does_not_change_ranking() {
        let lower = query(&index(), "l", 10, 100).unwrap();
        let upper = query(&index(), "L", 10, 100).unwrap();
        assert_eq!(names(&lower), vec!["london", "los Angeles", "liverpool"]);
        assert_eq!(names(&upper), vec!["London", "Los Angeles", "Liverpool"]);
    }

    #[test]
    fn limit_truncates() {
        let results = query(&index(), "L", 2, 100).unwrap();
        assert_eq!(names(&results), vec!["London", "Los Angeles"]);
    }

    #[test]
    fn limit_above_matches_is_clamped() {
        let results = query(&index(), "Liv", 50, 100).unwrap();
        assert_eq!(names(&results), vec!["Liverpool"]);
    }

    #[test]
    fn rejects_out_of_range_limits() {
        for limit in [0, -1, 101, i64::MIN] {
            assert_eq!(
                query(&index(), "L", limit, 100),
                Err(ValidationError::LimitOutOfRange {
                    requested: limit,
                    max: 100
                })
            );
        }
        assert!(query(&index(), "L", 100, 100).is_ok());
        assert!(query(&index(), "L", 1, 100).is_ok());
    }

    #[test]
    fn unmatched_prefix_is_empty_not_error() {
        assert_eq!(query(&index(), "X", 10, 100), Ok(Vec::new()));
    }

    #[test]
    fn parse_limit_defaults_and_validates() {
        assert_eq!(parse_limit(None, 10, 100), Ok(10));
        assert_eq!(parse_limit(Some(""), 10, 100), Ok(10));
        assert_eq!(parse_limit(Some("25"), 10, 100), Ok(25));
        assert_eq!(parse_limit(Some(" 3 "), 10, 100), Ok(3));
        assert!(matches!(
            parse_limit(Some("ten"), 10, 100),
            Err(ValidationError::InvalidLimit { max: 100, .. })
        ));
        assert!(matches!(
            parse_limit(Some(" "), 10, 100),
            Err(ValidationError::InvalidLimit { max: 100, .. })
        ));
        assert!(matches!(
            parse_limit(Some("0"), 10, 100),
            Err(ValidationError::LimitOutOfRange { requested: 0, .. })
        ));
        assert!(matches!(
            parse_limit(Some("1000"), 10, 100),
            Err(ValidationError::LimitOutOfRange { requested: 1000, .. })
        ));
    }

    #[test]
    fn engine_uses_capacity_as_max() {
        let engine = QueryEngine::new(build(2, [("Leeds", 0.7), ("Lewes", 0.6), ("Lee", 0.5)]).unwrap());
        assert_eq!(engine.max_limit(), 2);
        assert_eq!(engine.default_limit(), 2);
        assert_eq!(names(&engine.suggest("le", None).unwrap()), vec!["leeds", "lewes"]);
        assert_eq!(names(&engine.suggest("Le", Some("")).unwrap()), vec!["Leeds", "Lewes"]);
        assert!(engine.query("le", 3).is_err());
        assert_eq!(names(&engine.query("LE", 1).unwrap()), vec!["LEeds"]);
    }

    #[test]
    fn engine_clones_share_index() {
        let engine = QueryEngine::new(index());
        let clone = engine.clone();
        assert!(std::ptr::eq(engine.index(), clone.index()));
    }
}
