use std::collections::HashMap;

use crate::error::{Error, Result};

/// Output column store contract consumed by the categorization engine.
///
/// Columns are declared once at setup time and written once per event; the
/// host owns row commit/flush. The store is assumed to be positioned at the
/// current event whenever a write occurs.
pub trait ColumnSink {
    /// Declare a boolean column. Setup-time only; declaring the same key
    /// twice is a configuration error.
    fn declare_bool(&mut self, key: &str) -> Result<()>;

    /// Write this event's value for a previously declared column.
    fn write_bool(&mut self, key: &str, value: bool) -> Result<()>;
}

impl<S: ColumnSink + ?Sized> ColumnSink for Box<S> {
    fn declare_bool(&mut self, key: &str) -> Result<()> {
        (**self).declare_bool(key)
    }

    fn write_bool(&mut self, key: &str, value: bool) -> Result<()> {
        (**self).write_bool(key, value)
    }
}

/// In-memory column store with explicit row commit.
///
/// Used by the test suites and by lightweight hosts that post-process rows
/// themselves instead of writing a tree file.
#[derive(Debug, Default)]
pub struct MemoryColumns {
    order: Vec<String>,
    current: HashMap<String, bool>,
    committed: HashMap<String, Vec<bool>>,
}

impl MemoryColumns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the current value of every declared column to its committed
    /// rows. Called by the host once per event, after both evaluation phases.
    pub fn commit_row(&mut self) {
        for key in &self.order {
            let value = self.current.get(key).copied().unwrap_or(false);
            if let Some(rows) = self.committed.get_mut(key) {
                rows.push(value);
            }
        }
    }

    /// Committed rows for one column, oldest event first.
    pub fn column(&self, key: &str) -> Option<&[bool]> {
        self.committed.get(key).map(|rows| rows.as_slice())
    }

    /// Declared column keys, in declaration order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    /// Number of committed rows.
    pub fn rows(&self) -> usize {
        self.order
            .first()
            .and_then(|key| self.committed.get(key))
            .map(|rows| rows.len())
            .unwrap_or(0)
    }
}

impl ColumnSink for MemoryColumns {
    fn declare_bool(&mut self, key: &str) -> Result<()> {
        if self.committed.contains_key(key) {
            return Err(Error::DuplicateColumn(key.to_string()));
        }
        self.order.push(key.to_string());
        self.current.insert(key.to_string(), false);
        self.committed.insert(key.to_string(), Vec::new());
        Ok(())
    }

    fn write_bool(&mut self, key: &str, value: bool) -> Result<()> {
        let slot = self
            .current
            .get_mut(key)
            .ok_or_else(|| Error::UnknownColumn(key.to_string()))?;
        *slot = value;
        Ok(())
    }
}
