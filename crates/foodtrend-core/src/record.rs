//! Harvested observations and the per-cycle corpus that groups them by source.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One observation from a signal source.
///
/// Only `platform` is shared across sources; everything else is an open
/// key/value bag whose shape is owned by the harvester that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    platform: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(platform: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            fields: Map::new(),
        }
    }

    /// Attach a source-specific field. A `platform` key is ignored so the
    /// serialized record never carries the tag twice.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        if key != "platform" {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Records from one collection cycle, keyed by source name.
///
/// Every configured source has a key. A source that failed or found nothing
/// maps to an empty `Vec`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Corpus {
    sources: BTreeMap<String, Vec<Record>>,
}

impl Corpus {
    /// Create a corpus with an empty entry for each source name.
    pub fn with_sources<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sources: names.into_iter().map(|n| (n.into(), Vec::new())).collect(),
        }
    }

    /// Store the records for `name`, replacing anything already there.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<Record>) {
        self.sources.insert(name.into(), records);
    }

    /// Append records to `name`, creating the entry if needed.
    pub fn append(&mut self, name: &str, records: Vec<Record>) {
        self.sources
            .entry(name.to_string())
            .or_default()
            .extend(records);
    }

    pub fn get(&self, name: &str) -> Option<&[Record]> {
        self.sources.get(name).map(Vec::as_slice)
    }

    pub fn contains_source(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// `(source, record count)` pairs in source-name order.
    pub fn counts(&self) -> impl Iterator<Item = (&str, usize)> {
        self.sources.iter().map(|(k, v)| (k.as_str(), v.len()))
    }

    pub fn total(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
