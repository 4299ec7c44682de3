//! # symres - bulk symbol resolution against a canonical catalog
//!
//! symres resolves arbitrary user-supplied names (gene symbols and the like)
//! to canonical records. Each record has a stable id, one current name and
//! any number of aliases and previous names; queries are matched with a
//! fixed precedence and anything ambiguous is reported, never guessed.
//!
//! ## Core Concepts
//!
//! - **MultiKeyIndex**: immutable name views over one record snapshot, built once
//! - **resolve**: exact current name, then alias, then previous name
//! - **normalize**: batch resolution with status filtering and deduplication
//! - **validate**: panel audit with a typed issue per problem and a text report
//!
//! ## Usage
//!
//! ```rust
//! use symres::{build_index, normalize, validate, CanonicalRecord, NormalizeOptions, ValidateOptions};
//!
//! let index = build_index(vec![
//!     CanonicalRecord::new("HGNC:1100", "BRCA1").with_alias("BRCA-1"),
//!     CanonicalRecord::new("HGNC:11998", "TP53").with_previous("P53"),
//! ]);
//!
//! let batch = normalize(&["brca1", "TP53"], &index, &NormalizeOptions::new())?;
//! assert_eq!(batch.found.len(), 2);
//!
//! let panel = validate(&["BRCA1", "P53"], &index, &ValidateOptions::new())?;
//! assert_eq!(panel.valid.len(), 1);
//! assert_eq!(panel.replacements[0].suggested.as_deref(), Some("TP53"));
//! # Ok::<(), symres::ValidationError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod index;
pub mod normalize;
pub mod record;
pub mod record_set;
pub mod resolve;
pub mod validate;
pub mod value;

pub use error::{RecordSetError, SymresError, SymresResult, ValidationError};
pub use index::{
    build_index, normalize_name, Candidate, IndexBuildReport, IndexFingerprint, MultiKeyIndex,
    NameCollision,
};
pub use normalize::{
    normalize, BatchOutcome, BatchSummary, BatchWarning, FoundRecord, NormalizeOptions,
    UnresolvedQuery, WarningKind, WithdrawnMatch,
};
pub use record::{CanonicalId, CanonicalRecord, RecordStatus};
pub use record_set::{RecordSchema, RecordSet};
pub use resolve::{resolve, resolve_all, MatchType, ResolutionResult};
pub use validate::{
    render_report, validate, Issue, IssueKind, Replacement, Severity, ValidEntry, ValidateOptions,
    ValidationOutcome, ValidationSummary,
};
pub use value::Value;
