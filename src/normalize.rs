//! Batch normalization.
//!
//! Turns a list of user-supplied names into canonical records, in input
//! order. Every query that does not produce a found row leaves a typed
//! warning behind; nothing is dropped silently.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::error::ValidationError;
use crate::index::{Candidate, MultiKeyIndex};
use crate::record::{CanonicalId, RecordStatus, CORE_FIELDS};
use crate::resolve::{resolve, MatchType};
use crate::value::Value;

/// Options for [`normalize`].
///
/// # Example
/// ```rust,ignore
/// let options = NormalizeOptions::new()
///     .any_status()
///     .dedupe(false)
///     .fields(["current_name", "location"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Statuses admitted into `found`. `None` admits every status.
    pub status_filter: Option<BTreeSet<RecordStatus>>,
    pub dedupe: bool,
    /// Fields projected into each found row. `None` projects the core fields.
    pub fields: Option<Vec<String>>,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            status_filter: Some(BTreeSet::from([RecordStatus::Approved])),
            dedupe: true,
            fields: None,
        }
    }
}

impl NormalizeOptions {
    /// Creates options with the defaults: approved only, dedupe on, core fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit only the given statuses.
    #[must_use]
    pub fn status_filter(mut self, statuses: impl IntoIterator<Item = RecordStatus>) -> Self {
        self.status_filter = Some(statuses.into_iter().collect());
        self
    }

    /// Admit every status, withdrawn included.
    #[must_use]
    pub fn any_status(mut self) -> Self {
        self.status_filter = None;
        self
    }

    #[must_use]
    pub fn dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    /// Project found rows onto these fields.
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    fn admits(&self, status: &RecordStatus) -> bool {
        self.status_filter
            .as_ref()
            .map_or(true, |allowed| allowed.contains(status))
    }
}

/// Why a query produced a warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    Blank,
    NotFound,
    Ambiguous {
        candidates: Vec<Candidate>,
    },
    Withdrawn {
        canonical_id: CanonicalId,
    },
    FilteredOut {
        canonical_id: CanonicalId,
        status: RecordStatus,
    },
    Duplicate {
        canonical_id: CanonicalId,
        first_position: usize,
    },
}

/// A per-query warning. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchWarning {
    pub position: usize,
    pub query: String,
    #[serde(flatten)]
    pub kind: WarningKind,
}

impl BatchWarning {
    /// Human-readable description of the warning.
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (position, query) = (self.position, &self.query);
        match &self.kind {
            WarningKind::Blank => write!(f, "Skipped blank query at position {position}"),
            WarningKind::NotFound => {
                write!(f, "'{query}' (position {position}) did not match any record")
            }
            WarningKind::Ambiguous { candidates } => {
                let names: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "'{query}' (position {position}) is ambiguous; candidates: {}",
                    names.join(", ")
                )
            }
            WarningKind::Withdrawn { canonical_id } => write!(
                f,
                "'{query}' (position {position}) resolved to withdrawn record {canonical_id}"
            ),
            WarningKind::FilteredOut {
                canonical_id,
                status,
            } => write!(
                f,
                "'{query}' (position {position}) resolved to {canonical_id} with status '{status}', excluded by status filter"
            ),
            WarningKind::Duplicate {
                canonical_id,
                first_position,
            } => write!(
                f,
                "'{query}' (position {position}) duplicates {canonical_id}, already returned for position {first_position}"
            ),
        }
    }
}

/// A query that resolved and passed every filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundRecord {
    pub position: usize,
    pub query: String,
    pub canonical_id: CanonicalId,
    pub match_type: MatchType,
    pub fields: BTreeMap<String, Value>,
}

/// A query that matched no single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedQuery {
    pub position: usize,
    pub query: String,
    /// [`MatchType::NotFound`] or [`MatchType::Ambiguous`].
    pub match_type: MatchType,
}

/// A query that resolved to a withdrawn record excluded by the status filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawnMatch {
    pub position: usize,
    pub query: String,
    pub canonical_id: CanonicalId,
    pub current_name: String,
    pub match_type: MatchType,
}

/// Counts over one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_input: usize,
    pub found: usize,
    pub not_found: usize,
    pub withdrawn: usize,
    pub filtered_out: usize,
    pub duplicates_removed: usize,
    pub blank: usize,
    pub by_match_type: BTreeMap<MatchType, usize>,
}

/// Result of [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub found: Vec<FoundRecord>,
    pub not_found: Vec<UnresolvedQuery>,
    pub withdrawn: Vec<WithdrawnMatch>,
    pub warnings: Vec<BatchWarning>,
    pub summary: BatchSummary,
}

/// Normalizes a batch of queries against a shared index.
///
/// Queries are processed strictly in input order, so the first query to
/// reach a record owns it when deduplication is on.
///
/// # Errors
///
/// Returns [`ValidationError`] when `queries` is empty or an explicitly
/// empty field list was requested. No query is processed in that case.
pub fn normalize<S: AsRef<str>>(
    queries: &[S],
    index: &MultiKeyIndex,
    options: &NormalizeOptions,
) -> Result<BatchOutcome, ValidationError> {
    if queries.is_empty() {
        return Err(ValidationError::empty("queries"));
    }
    let fields: Vec<&str> = match &options.fields {
        Some(fields) if fields.is_empty() => return Err(ValidationError::empty("fields")),
        Some(fields) => fields.iter().map(String::as_str).collect(),
        None => CORE_FIELDS.to_vec(),
    };

    let _span = debug_span!("normalize", queries = queries.len()).entered();

    let mut outcome = BatchOutcome::default();
    let mut accepted: HashMap<CanonicalId, usize> = HashMap::new();

    for (idx, raw) in queries.iter().enumerate() {
        let query = raw.as_ref();
        let position = idx + 1;
        let warn = |kind| BatchWarning {
            position,
            query: query.to_string(),
            kind,
        };

        if query.trim().is_empty() {
            outcome.summary.blank += 1;
            outcome.warnings.push(warn(WarningKind::Blank));
            continue;
        }

        let result = resolve(query, index);
        let (Some(id), Some(record)) = (
            result.canonical_id.as_ref(),
            result.canonical_id.as_ref().and_then(|id| index.record(id)),
        ) else {
            outcome.not_found.push(UnresolvedQuery {
                position,
                query: query.to_string(),
                match_type: result.confidence,
            });
            let kind = if result.is_ambiguous() {
                WarningKind::Ambiguous {
                    candidates: index.candidates(&result.candidate_ids),
                }
            } else {
                WarningKind::NotFound
            };
            outcome.warnings.push(warn(kind));
            continue;
        };

        if !options.admits(&record.status) {
            if record.status.is_withdrawn() {
                outcome.withdrawn.push(WithdrawnMatch {
                    position,
                    query: query.to_string(),
                    canonical_id: id.clone(),
                    current_name: record.current_name.clone(),
                    match_type: result.confidence,
                });
                outcome.warnings.push(warn(WarningKind::Withdrawn {
                    canonical_id: id.clone(),
                }));
            } else {
                outcome.summary.filtered_out += 1;
                outcome.warnings.push(warn(WarningKind::FilteredOut {
                    canonical_id: id.clone(),
                    status: record.status.clone(),
                }));
            }
            continue;
        }

        if options.dedupe {
            if let Some(&first_position) = accepted.get(id) {
                outcome.summary.duplicates_removed += 1;
                outcome.warnings.push(warn(WarningKind::Duplicate {
                    canonical_id: id.clone(),
                    first_position,
                }));
                continue;
            }
            accepted.insert(id.clone(), position);
        }

        let projected = fields
            .iter()
            .map(|&name| (name.to_string(), record.field(name).unwrap_or_default()))
            .collect();
        *outcome
            .summary
            .by_match_type
            .entry(result.confidence)
            .or_insert(0) += 1;
        outcome.found.push(FoundRecord {
            position,
            query: query.to_string(),
            canonical_id: id.clone(),
            match_type: result.confidence,
            fields: projected,
        });
    }

    outcome.summary.total_input = queries.len();
    outcome.summary.found = outcome.found.len();
    outcome.summary.not_found = outcome.not_found.len();
    outcome.summary.withdrawn = outcome.withdrawn.len();

    debug!(
        found = outcome.summary.found,
        not_found = outcome.summary.not_found,
        withdrawn = outcome.summary.withdrawn,
        duplicates = outcome.summary.duplicates_removed,
        warnings = outcome.warnings.len(),
        "normalized batch"
    );

    Ok(outcome)
}
