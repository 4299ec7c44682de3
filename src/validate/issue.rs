//! Issue taxonomy for panel validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::index::Candidate;
use crate::record::CanonicalId;

/// What is wrong with an item.
///
/// Declaration order is the order issue groups appear in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    EmptyOrNa,
    NotFound,
    Ambiguous,
    Withdrawn,
    Duplicate,
    AliasUsed,
    PreviousSymbol,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyOrNa => "empty_or_na",
            Self::NotFound => "not_found",
            Self::Ambiguous => "ambiguous",
            Self::Withdrawn => "withdrawn",
            Self::Duplicate => "duplicate",
            Self::AliasUsed => "alias_used",
            Self::PreviousSymbol => "previous_symbol",
        }
    }

    /// Severity attached to every issue of this kind.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::NotFound | Self::Ambiguous | Self::Withdrawn => Severity::Error,
            Self::EmptyOrNa | Self::Duplicate | Self::AliasUsed | Self::PreviousSymbol => {
                Severity::Warning
            }
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// One problem found in a panel. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub position: usize,
    pub input: String,
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_id: Option<CanonicalId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,

    /// For duplicates, the position that first resolved to the same record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_position: Option<usize>,
}

impl Issue {
    pub(crate) fn new(
        position: usize,
        input: &str,
        kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            position,
            input: input.to_string(),
            kind,
            severity: kind.severity(),
            message: message.into(),
            canonical_id: None,
            candidates: Vec::new(),
            first_position: None,
        }
    }

    #[must_use]
    pub(crate) fn with_id(mut self, id: &CanonicalId) -> Self {
        self.canonical_id = Some(id.clone());
        self
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

/// A suggested fix for one item.
///
/// `suggested` is `None` when no authoritative successor exists and the
/// item needs a manual lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub position: usize,
    pub input: String,
    pub suggested: Option<String>,
    pub canonical_id: CanonicalId,
    pub rationale: String,
}
