//! Field collector and its immutable snapshot.

use super::model::FieldName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Buffer of collected field values for one session.
///
/// Holds no validation logic: the dialogue engine validates a response before
/// calling [`FieldCollector::update`]. Values are never removed during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCollector {
    values: BTreeMap<FieldName, String>,
}

impl FieldCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `field`, replacing any earlier value.
    pub fn update(&mut self, field: FieldName, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Returns the value collected for `field`, if any.
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over collected values in canonical field order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Returns an immutable copy for submission.
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            values: self.values.clone(),
        }
    }
}

/// Immutable copy of a [`FieldCollector`], taken at submission time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSnapshot {
    values: BTreeMap<FieldName, String>,
}

impl FieldSnapshot {
    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Returns the value for `field` or an empty string.
    ///
    /// Wire payloads send empty strings for fields a variant does not collect.
    pub fn get_or_empty(&self, field: FieldName) -> String {
        self.get(field).unwrap_or_default().to_string()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl<const N: usize> From<[(FieldName, &str); N]> for FieldSnapshot {
    fn from(entries: [(FieldName, &str); N]) -> Self {
        Self {
            values: entries
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
        }
    }
}
