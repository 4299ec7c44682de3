//! Canonical records and identity.
//!
//! A [`CanonicalRecord`] is one entry of the catalog: a stable id, the name
//! that is current today, the alternate names it has been known by, and any
//! auxiliary columns the source carried.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Stable, globally unique record identifier.
///
/// Ids never change when a record is renamed and are never reused, so they
/// are the only key the index stores outside the id map.
///
/// # Examples
///
/// ```
/// use symres::CanonicalId;
///
/// let id = CanonicalId::new("HGNC:1100");
/// assert_eq!(id.as_str(), "HGNC:1100");
/// assert!(!id.is_blank());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalId(String);

impl CanonicalId {
    /// Creates an id from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for CanonicalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CanonicalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RecordStatus {
    /// The record is active and its current name is authoritative.
    #[default]
    Approved,
    /// The record has been withdrawn and should no longer be used.
    Withdrawn,
    /// Any status the catalog uses that has no dedicated variant.
    Other(String),
}

impl RecordStatus {
    /// Parses a raw status string.
    ///
    /// Matching is case-insensitive. Both `Withdrawn` and the catalog
    /// spelling `Entry Withdrawn` map to [`RecordStatus::Withdrawn`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("approved") {
            Self::Approved
        } else if trimmed.eq_ignore_ascii_case("withdrawn")
            || trimmed.eq_ignore_ascii_case("entry withdrawn")
        {
            Self::Withdrawn
        } else {
            Self::Other(trimmed.to_string())
        }
    }

    #[must_use]
    pub const fn is_withdrawn(&self) -> bool {
        matches!(self, Self::Withdrawn)
    }

    /// Returns the display string for this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Approved => "Approved",
            Self::Withdrawn => "Withdrawn",
            Self::Other(s) => s,
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RecordStatus {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordStatus {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// One catalog entry.
///
/// # Examples
///
/// ```
/// use symres::{CanonicalRecord, RecordStatus};
///
/// let record = CanonicalRecord::new("HGNC:11998", "TP53")
///     .with_previous("P53")
///     .with_aux("date_symbol_changed", "1999-01-01");
///
/// assert_eq!(record.status, RecordStatus::Approved);
/// assert_eq!(record.previous_names, vec!["P53".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub canonical_id: CanonicalId,

    pub current_name: String,

    #[serde(default)]
    pub status: RecordStatus,

    #[serde(default)]
    pub alias_names: Vec<String>,

    #[serde(default)]
    pub previous_names: Vec<String>,

    /// Columns carried through unchanged.
    #[serde(default)]
    pub aux: BTreeMap<String, Value>,
}

/// Field names [`CanonicalRecord::field`] resolves without consulting `aux`.
pub const CORE_FIELDS: [&str; 5] = [
    "canonical_id",
    "current_name",
    "status",
    "alias_names",
    "previous_names",
];

impl CanonicalRecord {
    /// Creates an approved record with no alternate names.
    #[must_use]
    pub fn new(canonical_id: impl Into<CanonicalId>, current_name: impl Into<String>) -> Self {
        Self {
            canonical_id: canonical_id.into(),
            current_name: current_name.into(),
            status: RecordStatus::Approved,
            alias_names: Vec::new(),
            previous_names: Vec::new(),
            aux: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias_names.push(alias.into());
        self
    }

    #[must_use]
    pub fn with_previous(mut self, previous: impl Into<String>) -> Self {
        self.previous_names.push(previous.into());
        self
    }

    #[must_use]
    pub fn with_aux(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.aux.insert(key.into(), value.into());
        self
    }

    /// Looks up a field by name.
    ///
    /// Core fields (see [`CORE_FIELDS`]) take precedence over auxiliary keys
    /// of the same name. Returns `None` when the record has no such field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        match name {
            "canonical_id" => Some(Value::String(self.canonical_id.to_string())),
            "current_name" => Some(Value::String(self.current_name.clone())),
            "status" => Some(Value::String(self.status.to_string())),
            "alias_names" => Some(Value::List(self.alias_names.clone())),
            "previous_names" => Some(Value::List(self.previous_names.clone())),
            other => self.aux.get(other).cloned(),
        }
    }
}
