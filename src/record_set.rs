//! Raw record sets.
//!
//! The catalog arrives either as a tab-separated dump or as JSON documents.
//! In both layouts alias and previous-name columns may hold several names
//! joined with `|`; they are split here so the index only ever sees clean
//! name lists. Uniqueness is not checked at this stage.

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::error::RecordSetError;
use crate::record::{CanonicalId, CanonicalRecord, RecordStatus};
use crate::value::Value;

/// Delimiter between names in multi-valued columns.
pub const NAME_DELIMITER: char = '|';

/// Column names used to pick core fields out of a raw row.
///
/// Defaults match the HGNC complete-set layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSchema {
    pub id_column: String,
    pub name_column: String,
    pub status_column: String,
    pub alias_column: String,
    pub previous_column: String,
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self {
            id_column: "hgnc_id".to_string(),
            name_column: "symbol".to_string(),
            status_column: "status".to_string(),
            alias_column: "alias_symbol".to_string(),
            previous_column: "prev_symbol".to_string(),
        }
    }
}

impl RecordSchema {
    fn is_core(&self, column: &str) -> bool {
        column == self.id_column
            || column == self.name_column
            || column == self.status_column
            || column == self.alias_column
            || column == self.previous_column
    }
}

/// An ordered snapshot of catalog records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordSet {
    records: Vec<CanonicalRecord>,
}

impl RecordSet {
    #[must_use]
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<CanonicalRecord> {
        self.records
    }

    /// Reads a tab-separated dump with a header row.
    ///
    /// Blank lines are ignored. Rows shorter than the header are padded with
    /// empty cells; rows wider than the header are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`RecordSetError`] if the reader fails, the header is absent
    /// or lacks the id/name columns, or a row is wider than the header.
    pub fn from_tsv<R: BufRead>(reader: R, schema: &RecordSchema) -> Result<Self, RecordSetError> {
        let mut lines = reader.lines().enumerate();

        let header = loop {
            match lines.next() {
                Some((_, line)) => {
                    let line = line?;
                    if !line.trim().is_empty() {
                        break split_row(&line);
                    }
                }
                None => return Err(RecordSetError::MissingHeader),
            }
        };

        let position = |column: &str| header.iter().position(|h| h == column);
        let id_at = position(schema.id_column.as_str()).ok_or_else(|| RecordSetError::MissingColumn {
            column: schema.id_column.clone(),
        })?;
        let name_at = position(schema.name_column.as_str()).ok_or_else(|| RecordSetError::MissingColumn {
            column: schema.name_column.clone(),
        })?;
        let status_at = position(schema.status_column.as_str());
        let alias_at = position(schema.alias_column.as_str());
        let previous_at = position(schema.previous_column.as_str());

        let mut records = Vec::new();
        for (idx, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let mut cells = split_row(&line);
            if cells.len() > header.len() {
                return Err(RecordSetError::RowWidth {
                    line: idx + 1,
                    expected: header.len(),
                    actual: cells.len(),
                });
            }
            cells.resize(header.len(), String::new());

            let mut record = CanonicalRecord::new(
                CanonicalId::new(cells[id_at].as_str()),
                cells[name_at].as_str(),
            );
            if let Some(at) = status_at {
                if !cells[at].is_empty() {
                    record.status = RecordStatus::parse(&cells[at]);
                }
            }
            if let Some(at) = alias_at {
                record.alias_names = split_names(&cells[at]);
            }
            if let Some(at) = previous_at {
                record.previous_names = split_names(&cells[at]);
            }
            for (column, cell) in header.iter().zip(cells) {
                if !cell.is_empty() && !schema.is_core(column) {
                    record.aux.insert(column.clone(), Value::String(cell));
                }
            }
            records.push(record);
        }

        Ok(Self { records })
    }

    /// Parses JSON documents.
    ///
    /// Accepts a top-level array of objects or the download envelope
    /// `{"response": {"docs": [...]}}`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordSetError`] on malformed JSON or when the document list
    /// cannot be located or holds non-object entries.
    pub fn from_json(input: &str, schema: &RecordSchema) -> Result<Self, RecordSetError> {
        use serde_json::Value as Json;

        let root: Json = serde_json::from_str(input)?;
        let docs = match root {
            Json::Array(docs) => docs,
            Json::Object(mut obj) => match obj.remove("response") {
                Some(Json::Object(mut response)) => match response.remove("docs") {
                    Some(Json::Array(docs)) => docs,
                    _ => {
                        return Err(RecordSetError::Shape {
                            message: "'response.docs' is not an array".to_string(),
                        })
                    }
                },
                _ => {
                    return Err(RecordSetError::Shape {
                        message: "expected an array or a 'response' object".to_string(),
                    })
                }
            },
            _ => {
                return Err(RecordSetError::Shape {
                    message: "expected an array or a 'response' object".to_string(),
                })
            }
        };

        let mut records = Vec::with_capacity(docs.len());
        for (idx, doc) in docs.into_iter().enumerate() {
            let Json::Object(mut fields) = doc else {
                return Err(RecordSetError::Shape {
                    message: format!("document {idx} is not an object"),
                });
            };

            let id = fields.remove(&schema.id_column).map(json_scalar).unwrap_or_default();
            let name = fields.remove(&schema.name_column).map(json_scalar).unwrap_or_default();
            let mut record = CanonicalRecord::new(CanonicalId::new(id), name);

            if let Some(status) = fields.remove(&schema.status_column).map(json_scalar) {
                if !status.is_empty() {
                    record.status = RecordStatus::parse(&status);
                }
            }
            if let Some(aliases) = fields.remove(&schema.alias_column) {
                record.alias_names = json_names(aliases);
            }
            if let Some(previous) = fields.remove(&schema.previous_column) {
                record.previous_names = json_names(previous);
            }
            for (key, value) in fields {
                if !value.is_null() {
                    record.aux.insert(key, Value::from_json(value));
                }
            }
            records.push(record);
        }

        Ok(Self { records })
    }
}

impl From<Vec<CanonicalRecord>> for RecordSet {
    fn from(records: Vec<CanonicalRecord>) -> Self {
        Self::new(records)
    }
}

impl FromIterator<CanonicalRecord> for RecordSet {
    fn from_iter<I: IntoIterator<Item = CanonicalRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for RecordSet {
    type Item = CanonicalRecord;
    type IntoIter = std::vec::IntoIter<CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a CanonicalRecord;
    type IntoIter = std::slice::Iter<'a, CanonicalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn strip_quotes(cell: &str) -> &str {
    let cell = cell.trim();
    cell.strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(cell)
        .trim()
}

fn split_row(line: &str) -> Vec<String> {
    line.trim_end_matches('\r')
        .split('\t')
        .map(|cell| strip_quotes(cell).to_string())
        .collect()
}

/// Splits a pipe-delimited name cell into trimmed, non-empty names.
#[must_use]
pub fn split_names(raw: &str) -> Vec<String> {
    strip_quotes(raw)
        .split(NAME_DELIMITER)
        .map(strip_quotes)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn json_scalar(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_names(value: serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(json_scalar)
            .flat_map(|item| split_names(&item))
            .collect(),
        other => split_names(&json_scalar(other)),
    }
}
