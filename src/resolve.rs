//! Single-query resolution.
//!
//! Tiers are tried in a fixed order and the first hit wins:
//! exact current name, then alias, then previous name. A current name
//! always outranks alias or previous interpretations of the same string,
//! even when those belong to a different record.
//!
//! Resolution is pure: it never fails, never filters by status and never
//! picks among several alias/previous candidates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::{normalize_name, MultiKeyIndex};
use crate::record::CanonicalId;

/// How a query matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Matched a current name.
    Exact,
    /// Matched exactly one record's alias.
    Alias,
    /// Matched exactly one record's previous name.
    Previous,
    /// Matched an alias or previous name shared by several records.
    Ambiguous,
    /// Matched nothing.
    NotFound,
}

impl MatchType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Previous => "previous",
            Self::Ambiguous => "ambiguous",
            Self::NotFound => "not_found",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub query: String,
    pub normalized_query: String,
    pub canonical_id: Option<CanonicalId>,
    pub confidence: MatchType,

    /// Populated only when `confidence` is [`MatchType::Ambiguous`].
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidate_ids: Vec<CanonicalId>,
}

impl ResolutionResult {
    fn matched(query: &str, normalized: String, id: CanonicalId, confidence: MatchType) -> Self {
        Self {
            query: query.to_string(),
            normalized_query: normalized,
            canonical_id: Some(id),
            confidence,
            candidate_ids: Vec::new(),
        }
    }

    fn unmatched(query: &str, normalized: String) -> Self {
        Self {
            query: query.to_string(),
            normalized_query: normalized,
            canonical_id: None,
            confidence: MatchType::NotFound,
            candidate_ids: Vec::new(),
        }
    }

    /// Returns true if the query resolved to exactly one record.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.canonical_id.is_some()
    }

    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self.confidence, MatchType::Ambiguous)
    }
}

/// Resolves one query against an index.
///
/// # Examples
///
/// ```
/// use symres::{build_index, resolve, CanonicalRecord, MatchType};
///
/// let index = build_index(vec![CanonicalRecord::new("HGNC:1100", "BRCA1").with_alias("RNF53")]);
///
/// assert_eq!(resolve("brca1", &index).confidence, MatchType::Exact);
/// assert_eq!(resolve("rnf53", &index).confidence, MatchType::Alias);
/// assert_eq!(resolve("EGFR", &index).confidence, MatchType::NotFound);
/// ```
#[must_use]
pub fn resolve(query: &str, index: &MultiKeyIndex) -> ResolutionResult {
    let normalized = normalize_name(query);
    if normalized.is_empty() {
        return ResolutionResult::unmatched(query, normalized);
    }

    if let Some(id) = index.lookup_name(&normalized) {
        let id = id.clone();
        return ResolutionResult::matched(query, normalized, id, MatchType::Exact);
    }

    for (candidates, tier) in [
        (index.lookup_alias(&normalized), MatchType::Alias),
        (index.lookup_previous(&normalized), MatchType::Previous),
    ] {
        match candidates {
            [] => continue,
            [only] => {
                let id = only.clone();
                return ResolutionResult::matched(query, normalized, id, tier);
            }
            many => {
                return ResolutionResult {
                    query: query.to_string(),
                    normalized_query: normalized,
                    canonical_id: None,
                    confidence: MatchType::Ambiguous,
                    candidate_ids: many.to_vec(),
                };
            }
        }
    }

    ResolutionResult::unmatched(query, normalized)
}

/// Resolves each query independently, preserving input order.
#[must_use]
pub fn resolve_all<S: AsRef<str>>(queries: &[S], index: &MultiKeyIndex) -> Vec<ResolutionResult> {
    queries.iter().map(|q| resolve(q.as_ref(), index)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::build_index;
    use crate::record::CanonicalRecord;

    fn index() -> MultiKeyIndex {
        build_index(vec![
            CanonicalRecord::new("1", "BRCA1").with_alias("BRCA-1"),
            CanonicalRecord::new("2", "TP53").with_previous("P53"),
        ])
    }

    #[test]
    fn tiers_resolve_in_order() {
        let index = index();

        let exact = resolve("brca1", &index);
        assert_eq!(exact.canonical_id, Some(CanonicalId::new("1")));
        assert_eq!(exact.confidence, MatchType::Exact);
        assert_eq!(exact.normalized_query, "BRCA1");

        let alias = resolve("BRCA-1", &index);
        assert_eq!(alias.canonical_id, Some(CanonicalId::new("1")));
        assert_eq!(alias.confidence, MatchType::Alias);

        let previous = resolve("p53", &index);
        assert_eq!(previous.canonical_id, Some(CanonicalId::new("2")));
        assert_eq!(previous.confidence, MatchType::Previous);

        let missing = resolve("EGFR", &index);
        assert!(missing.canonical_id.is_none());
        assert_eq!(missing.confidence, MatchType::NotFound);
        assert!(missing.candidate_ids.is_empty());
    }

    #[test]
    fn blank_query_is_not_found() {
        let result = resolve("   ", &index());
        assert_eq!(result.confidence, MatchType::NotFound);
        assert_eq!(result.query, "   ");
        assert_eq!(result.normalized_query, "");
    }

    #[test]
    fn shared_alias_is_ambiguous() {
        let index = build_index(vec![
            CanonicalRecord::new("1", "A").with_alias("X"),
            CanonicalRecord::new("2", "B").with_alias("X"),
        ]);
        let result = resolve("X", &index);
        assert!(result.is_ambiguous());
        assert!(!result.is_resolved());
        assert_eq!(result.candidate_ids, vec![CanonicalId::new("1"), CanonicalId::new("2")]);
    }

    #[test]
    fn shared_previous_name_is_ambiguous() {
        let index = build_index(vec![
            CanonicalRecord::new("1", "A").with_previous("OLD"),
            CanonicalRecord::new("2", "B").with_previous("OLD"),
        ]);
        let result = resolve("old", &index);
        assert_eq!(result.confidence, MatchType::Ambiguous);
        assert_eq!(result.candidate_ids.len(), 2);
    }

    #[test]
    fn current_name_outranks_other_records_alias() {
        let index = build_index(vec![
            CanonicalRecord::new("1", "A").with_alias("B").with_previous("B"),
            CanonicalRecord::new("2", "B"),
        ]);
        let result = resolve("b", &index);
        assert_eq!(result.confidence, MatchType::Exact);
        assert_eq!(result.canonical_id, Some(CanonicalId::new("2")));
    }

    #[test]
    fn alias_outranks_previous() {
        let index = build_index(vec![
            CanonicalRecord::new("1", "A").with_alias("Z"),
            CanonicalRecord::new("2", "B").with_previous("Z"),
        ]);
        let result = resolve("Z", &index);
        assert_eq!(result.confidence, MatchType::Alias);
        assert_eq!(result.canonical_id, Some(CanonicalId::new("1")));
    }

    #[test]
    fn resolve_all_preserves_order() {
        let results = resolve_all(&["TP53", "nope", "BRCA1"], &index());
        let types: Vec<MatchType> = results.iter().map(|r| r.confidence).collect();
        assert_eq!(types, vec![MatchType::Exact, MatchType::NotFound, MatchType::Exact]);
    }

    #[test]
    fn match_type_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&MatchType::NotFound).unwrap(), "\"not_found\"");
        assert_eq!(MatchType::Previous.to_string(), "previous");
    }
}
