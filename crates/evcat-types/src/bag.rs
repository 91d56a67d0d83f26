use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Keyed lookup of per-event computed values.
///
/// Stands in for the host framework's producer and analyzer managers: the
/// host fills one bag per collaborator before an evaluation phase runs, and
/// category logic reads from it by key. The engine itself only ever reads.
///
/// Values are stored as `serde_json::Value` so a bag can carry scalars as
/// well as per-object vectors (e.g. one `pt` per reconstructed electron).
#[derive(Debug, Clone, Default)]
pub struct EventBag {
    values: HashMap<String, Value>,
}

impl EventBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value under `key`. Last write wins.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Typed lookup of the value stored under `key`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self
            .values
            .get(key)
            .ok_or_else(|| Error::MissingValue(key.to_string()))?;
        serde_json::from_value(value.clone()).map_err(|source| Error::InvalidValue {
            key: key.to_string(),
            source,
        })
    }

    pub fn get_f64(&self, key: &str) -> Result<f64> {
        self.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop all values, e.g. when the host recycles a bag between events.
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for EventBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = EventBag::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}
