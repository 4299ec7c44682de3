//! The multi-key name index.
//!
//! [`MultiKeyIndex`] is built once from a record snapshot and never mutated
//! afterwards. Records live exactly once, in the id-keyed store; the three
//! name maps hold only ids. Rebuilding is the only way to pick up new data.
//!
//! Names are normalized with [`normalize_name`] (trim + uppercase) on both
//! the build and the lookup side, so matching is case-insensitive.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::record::{CanonicalId, CanonicalRecord};

/// Normalizes a name for indexing or lookup.
///
/// # Examples
///
/// ```
/// assert_eq!(symres::normalize_name("  brca1 "), "BRCA1");
/// ```
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// A current name claimed by more than one record during a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCollision {
    /// Normalized name.
    pub name: String,
    /// Id the name pointed at before the collision.
    pub replaced: CanonicalId,
    /// Id the name points at after the collision (last write wins).
    pub winner: CanonicalId,
}

/// A candidate record named in an ambiguity report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub canonical_id: CanonicalId,
    pub current_name: String,
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_name, self.canonical_id)
    }
}

/// Data-quality findings from a build.
///
/// None of these stop the build; they are collected so callers can decide
/// whether the snapshot is fit for use.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBuildReport {
    pub records_indexed: usize,
    pub skipped_missing_id: usize,
    pub duplicate_ids: Vec<CanonicalId>,
    pub name_collisions: Vec<NameCollision>,
}

impl IndexBuildReport {
    /// Returns true if the build saw no anomalies.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped_missing_id == 0
            && self.duplicate_ids.is_empty()
            && self.name_collisions.is_empty()
    }
}

/// Content hash of the snapshot an index was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexFingerprint([u8; 32]);

impl IndexFingerprint {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for IndexFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Immutable keyed views over one record snapshot.
///
/// `MultiKeyIndex` is `Send + Sync`; share one instance (by reference or
/// behind an `Arc`) across as many batch calls and threads as needed.
#[derive(Debug, Clone)]
pub struct MultiKeyIndex {
    name_to_id: HashMap<String, CanonicalId>,
    alias_to_ids: HashMap<String, Vec<CanonicalId>>,
    previous_to_ids: HashMap<String, Vec<CanonicalId>>,
    id_to_record: HashMap<CanonicalId, CanonicalRecord>,
    report: IndexBuildReport,
    fingerprint: IndexFingerprint,
}

/// Builds an index from a record snapshot.
///
/// Records with a blank id are skipped. A current name claimed twice maps
/// to the later record; the collision is logged and kept in the
/// [`IndexBuildReport`]. Runs in time linear in the total number of names.
pub fn build_index<I>(records: I) -> MultiKeyIndex
where
    I: IntoIterator<Item = CanonicalRecord>,
{
    let mut name_to_id: HashMap<String, CanonicalId> = HashMap::new();
    let mut alias_to_ids: HashMap<String, Vec<CanonicalId>> = HashMap::new();
    let mut previous_to_ids: HashMap<String, Vec<CanonicalId>> = HashMap::new();
    let mut id_to_record: HashMap<CanonicalId, CanonicalRecord> = HashMap::new();
    let mut report = IndexBuildReport::default();
    let mut hasher = blake3::Hasher::new();

    for record in records {
        if record.canonical_id.is_blank() {
            report.skipped_missing_id += 1;
            continue;
        }
        let id = record.canonical_id.clone();

        let name = normalize_name(&record.current_name);
        if !name.is_empty() {
            if let Some(previous) = name_to_id.insert(name.clone(), id.clone()) {
                if previous != id {
                    warn!(
                        symbol = %name,
                        replaced = %previous,
                        winner = %id,
                        "current name claimed by more than one record; keeping the later one"
                    );
                    report.name_collisions.push(NameCollision {
                        name: name.clone(),
                        replaced: previous,
                        winner: id.clone(),
                    });
                }
            }
        }

        for alias in &record.alias_names {
            insert_candidate(&mut alias_to_ids, alias, &id);
        }
        for previous in &record.previous_names {
            insert_candidate(&mut previous_to_ids, previous, &id);
        }

        hash_record(&mut hasher, &record, &name);

        if id_to_record.insert(id.clone(), record).is_some() {
            warn!(id = %id, "canonical id appears more than once; keeping the later record");
            report.duplicate_ids.push(id);
        } else {
            report.records_indexed += 1;
        }
    }

    let fingerprint = IndexFingerprint(*hasher.finalize().as_bytes());

    debug!(
        records = report.records_indexed,
        names = name_to_id.len(),
        aliases = alias_to_ids.len(),
        previous = previous_to_ids.len(),
        skipped = report.skipped_missing_id,
        collisions = report.name_collisions.len(),
        fingerprint = %fingerprint,
        "built multi-key index"
    );

    MultiKeyIndex {
        name_to_id,
        alias_to_ids,
        previous_to_ids,
        id_to_record,
        report,
        fingerprint,
    }
}

fn insert_candidate(map: &mut HashMap<String, Vec<CanonicalId>>, raw: &str, id: &CanonicalId) {
    let key = normalize_name(raw);
    if key.is_empty() {
        return;
    }
    let ids = map.entry(key).or_default();
    if !ids.contains(id) {
        ids.push(id.clone());
    }
}

fn hash_record(hasher: &mut blake3::Hasher, record: &CanonicalRecord, name: &str) {
    hasher.update(record.canonical_id.as_str().as_bytes());
    hasher.update(&[0]);
    hasher.update(name.as_bytes());
    hasher.update(&[0]);
    hasher.update(record.status.as_str().as_bytes());
    hasher.update(&[1]);
    for alias in &record.alias_names {
        hasher.update(normalize_name(alias).as_bytes());
        hasher.update(&[0]);
    }
    hasher.update(&[2]);
    for previous in &record.previous_names {
        hasher.update(normalize_name(previous).as_bytes());
        hasher.update(&[0]);
    }
    hasher.update(&[3]);
}

impl MultiKeyIndex {
    /// Builds an index; see [`build_index`].
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CanonicalRecord>,
    {
        build_index(records)
    }

    /// Returns the record stored under `id`.
    #[must_use]
    pub fn record(&self, id: &CanonicalId) -> Option<&CanonicalRecord> {
        self.id_to_record.get(id)
    }

    /// Looks up an already-normalized current name.
    #[must_use]
    pub fn lookup_name(&self, normalized: &str) -> Option<&CanonicalId> {
        self.name_to_id.get(normalized)
    }

    /// Looks up an already-normalized alias. Candidates keep insertion order.
    #[must_use]
    pub fn lookup_alias(&self, normalized: &str) -> &[CanonicalId] {
        self.alias_to_ids
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Looks up an already-normalized previous name. Candidates keep insertion order.
    #[must_use]
    pub fn lookup_previous(&self, normalized: &str) -> &[CanonicalId] {
        self.previous_to_ids
            .get(normalized)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Pairs each id with its record's current name, keeping order.
    #[must_use]
    pub fn candidates(&self, ids: &[CanonicalId]) -> Vec<Candidate> {
        ids.iter()
            .map(|id| Candidate {
                canonical_id: id.clone(),
                current_name: self
                    .record(id)
                    .map(|r| r.current_name.clone())
                    .unwrap_or_default(),
            })
            .collect()
    }

    /// Number of distinct records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.id_to_record.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id_to_record.is_empty()
    }

    /// Iterates every id referenced by any of the three name maps.
    pub fn referenced_ids(&self) -> impl Iterator<Item = &CanonicalId> {
        self.name_to_id
            .values()
            .chain(self.alias_to_ids.values().flatten())
            .chain(self.previous_to_ids.values().flatten())
    }

    /// Records sorted by id.
    #[must_use]
    pub fn records(&self) -> Vec<&CanonicalRecord> {
        let mut records: Vec<&CanonicalRecord> = self.id_to_record.values().collect();
        records.sort_by(|a, b| a.canonical_id.cmp(&b.canonical_id));
        records
    }

    #[must_use]
    pub const fn build_report(&self) -> &IndexBuildReport {
        &self.report
    }

    #[must_use]
    pub const fn fingerprint(&self) -> IndexFingerprint {
        self.fingerprint
    }
}
