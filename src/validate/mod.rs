//! Panel validation.
//!
//! Where [`crate::normalize`] quietly maps names to records, validation
//! audits a curated list (a gene panel): every item lands in exactly one
//! bucket, either valid or a single typed issue, and alias or previous-name
//! usage is flagged with a suggested replacement.
//!
//! Per item the checks run in this order, stopping at the first that fires:
//! blank/NA, unresolved (not found or ambiguous), already seen earlier in
//! the pass, withdrawn, alias, previous name. Whatever survives is valid.

mod issue;
mod report;

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span};

use crate::error::ValidationError;
use crate::index::MultiKeyIndex;
use crate::record::{CanonicalId, CanonicalRecord};
use crate::resolve::{resolve, MatchType};

pub use issue::{Issue, IssueKind, Replacement, Severity};
pub use report::{render_report, ValidationSummary};

/// Options for [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateOptions {
    /// Placeholder tokens treated like blank items (case-insensitive).
    pub na_tokens: Vec<String>,
    /// Auxiliary field holding the date a record's name last changed.
    pub change_date_field: String,
    pub report_title: String,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            na_tokens: vec!["NA".to_string(), "N/A".to_string(), "NULL".to_string()],
            change_date_field: "date_symbol_changed".to_string(),
            report_title: "Panel validation report".to_string(),
        }
    }
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn na_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn change_date_field(mut self, field: impl Into<String>) -> Self {
        self.change_date_field = field.into();
        self
    }

    #[must_use]
    pub fn report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = title.into();
        self
    }

    fn is_empty_or_na(&self, item: &str) -> bool {
        let item = item.trim();
        item.is_empty() || self.na_tokens.iter().any(|t| t.eq_ignore_ascii_case(item))
    }
}

/// An item that passed every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidEntry {
    pub position: usize,
    pub input: String,
    pub record: CanonicalRecord,
}

/// Result of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: Vec<ValidEntry>,
    pub issues: Vec<Issue>,
    pub replacements: Vec<Replacement>,
    pub summary: ValidationSummary,
    pub report: String,
}

impl ValidationOutcome {
    /// Returns true if no issue has error severity.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.summary.errors == 0
    }
}

/// Validates a panel against a shared index.
///
/// # Errors
///
/// Returns [`ValidationError`] when `items` is empty. Per-item problems are
/// never errors; they are returned as issues.
pub fn validate<S: AsRef<str>>(
    items: &[S],
    index: &MultiKeyIndex,
    options: &ValidateOptions,
) -> Result<ValidationOutcome, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::empty("items"));
    }

    let _span = debug_span!("validate", items = items.len()).entered();

    let mut valid = Vec::new();
    let mut issues = Vec::new();
    let mut replacements = Vec::new();
    let mut seen: HashMap<CanonicalId, usize> = HashMap::new();

    for (idx, raw) in items.iter().enumerate() {
        let input = raw.as_ref();
        let position = idx + 1;

        if options.is_empty_or_na(input) {
            issues.push(Issue::new(
                position,
                input,
                IssueKind::EmptyOrNa,
                format!("Item {position} is empty or NA"),
            ));
            continue;
        }

        let result = resolve(input, index);
        let (Some(id), Some(record)) = (
            result.canonical_id.as_ref(),
            result.canonical_id.as_ref().and_then(|id| index.record(id)),
        ) else {
            let issue = if result.is_ambiguous() {
                let candidates = index.candidates(&result.candidate_ids);
                let names: Vec<String> = candidates.iter().map(ToString::to_string).collect();
                let mut issue = Issue::new(
                    position,
                    input,
                    IssueKind::Ambiguous,
                    format!("'{input}' matches several records: {}", names.join(", ")),
                );
                issue.candidates = candidates;
                issue
            } else {
                Issue::new(
                    position,
                    input,
                    IssueKind::NotFound,
                    format!("'{input}' did not match any record"),
                )
            };
            issues.push(issue);
            continue;
        };

        if let Some(&first_position) = seen.get(id) {
            let mut issue = Issue::new(
                position,
                input,
                IssueKind::Duplicate,
                format!(
                    "'{input}' resolves to {} ({id}), already listed at position {first_position}",
                    record.current_name
                ),
            )
            .with_id(id);
            issue.first_position = Some(first_position);
            issues.push(issue);
            continue;
        }
        seen.insert(id.clone(), position);

        if record.status.is_withdrawn() {
            issues.push(
                Issue::new(
                    position,
                    input,
                    IssueKind::Withdrawn,
                    format!(
                        "'{input}' resolves to withdrawn record {} ({id})",
                        record.current_name
                    ),
                )
                .with_id(id),
            );
            replacements.push(Replacement {
                position,
                input: input.to_string(),
                suggested: None,
                canonical_id: id.clone(),
                rationale: "Record is withdrawn and no successor is recorded; look up a replacement manually"
                    .to_string(),
            });
            continue;
        }

        match result.confidence {
            MatchType::Alias => {
                issues.push(
                    Issue::new(
                        position,
                        input,
                        IssueKind::AliasUsed,
                        format!(
                            "'{input}' is an alias of {} ({id})",
                            record.current_name
                        ),
                    )
                    .with_id(id),
                );
                replacements.push(Replacement {
                    position,
                    input: input.to_string(),
                    suggested: Some(record.current_name.clone()),
                    canonical_id: id.clone(),
                    rationale: "Use current identifier instead of alias".to_string(),
                });
            }
            MatchType::Previous => {
                issues.push(
                    Issue::new(
                        position,
                        input,
                        IssueKind::PreviousSymbol,
                        format!(
                            "'{input}' is a previous symbol of {} ({id})",
                            record.current_name
                        ),
                    )
                    .with_id(id),
                );
                let mut rationale = format!(
                    "'{input}' was renamed to {}",
                    record.current_name
                );
                if let Some(changed) = change_date(record, &options.change_date_field) {
                    rationale.push_str(&format!(" on {changed}"));
                }
                replacements.push(Replacement {
                    position,
                    input: input.to_string(),
                    suggested: Some(record.current_name.clone()),
                    canonical_id: id.clone(),
                    rationale,
                });
            }
            _ => valid.push(ValidEntry {
                position,
                input: input.to_string(),
                record: record.clone(),
            }),
        }
    }

    let summary = ValidationSummary::from_issues(items.len(), valid.len(), &issues);
    let report = render_report(&options.report_title, items.len(), valid.len(), &issues);

    debug!(
        valid = summary.valid,
        errors = summary.errors,
        warnings = summary.warnings,
        replacements = replacements.len(),
        "validated panel"
    );

    Ok(ValidationOutcome {
        valid,
        issues,
        replacements,
        summary,
        report,
    })
}

/// Reads the change date from a record's auxiliary fields.
///
/// ISO dates and RFC 3339 timestamps are rendered as `YYYY-MM-DD`; anything
/// else is quoted verbatim.
fn change_date(record: &CanonicalRecord, field: &str) -> Option<String> {
    let raw = record.aux.get(field)?.first_str()?.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()));
    Some(match parsed {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => format!("'{raw}'"),
    })
}
