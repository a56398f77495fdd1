//! In-memory record table.
//!
//! A record table maps a string key to a sparse mapping of field name to
//! string value. It knows nothing about backends; engines own one and
//! replace it wholesale on pull.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{FoodbotError, Result};

/// Field name to value mapping for a single record.
pub type Fields = BTreeMap<String, String>;

/// Key to record mapping for a whole table.
pub type Records = BTreeMap<String, Fields>;

/// The in-memory table shared by every storage engine.
///
/// All reads hand out owned copies, so callers can never mutate stored
/// state through a returned value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordTable {
    records: Records,
}

impl RecordTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing record for `key` with exactly `fields`.
    pub fn write(&mut self, key: impl Into<String>, fields: Fields) {
        self.records.insert(key.into(), fields);
    }

    /// Return a copy of the record for `key`, or `None` if the key is unknown.
    pub fn read(&self, key: &str) -> Option<Fields> {
        self.records.get(key).cloned()
    }

    /// Return a copy of the whole table.
    pub fn read_all(&self) -> Records {
        self.records.clone()
    }

    /// Merge `fields` into the record for `key`.
    ///
    /// Fields not named in `fields` survive. An unknown key gets a new record
    /// holding exactly `fields`; no other record is touched.
    pub fn update(&mut self, key: impl Into<String>, fields: Fields) {
        self.records.entry(key.into()).or_default().extend(fields);
    }

    /// Remove and return the record for `key`.
    ///
    /// Deleting an unknown key is a programming error and reported as
    /// [`FoodbotError::MissingKey`].
    pub fn delete(&mut self, key: &str) -> Result<Fields> {
        self.records
            .remove(key)
            .ok_or_else(|| FoodbotError::missing_key(key))
    }

    /// Replace the entire table contents.
    pub fn replace(&mut self, records: Records) {
        self.records = records;
    }

    /// Check whether a record exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Iterate over records in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Fields)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sorted union of field names across all records.
    pub fn field_names(&self) -> Vec<String> {
        let names: BTreeSet<&String> = self.records.values().flat_map(|f| f.keys()).collect();
        names.into_iter().cloned().collect()
    }
}

impl From<Records> for RecordTable {
    fn from(records: Records) -> Self {
        Self { records }
    }
}

/// Build a [`Fields`] mapping from string pairs.
pub fn fields<K, V, I>(pairs: I) -> Fields
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
