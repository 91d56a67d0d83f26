use evcat_types::ColumnSink;

use crate::error::{Error, Result};
use crate::summary::CutSummary;

/// One named boolean checkpoint within a category's selection logic.
///
/// A cut carries no logic of its own: the owning category marks it pass or
/// fail during evaluation, and the cut keeps a cumulative pass count across
/// the whole run for cut-flow reporting.
#[derive(Debug)]
struct Cut {
    name: String,
    /// Output column key, `<category>_<name>`
    column: String,
    /// This event's outcome; defaults to false until marked
    outcome: bool,
    /// Number of events whose final outcome was a pass
    passed_events: u64,
}

/// Ordered set of cuts owned by one category.
///
/// Cut names are unique within the owning category only; persisted columns
/// are prefixed with the category name, so two categories may register cuts
/// with the same name without collision.
#[derive(Debug)]
pub struct CutManager {
    category: String,
    cuts: Vec<Cut>,
}

impl CutManager {
    pub(crate) fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            cuts: Vec::new(),
        }
    }

    /// Declare a new cut. Setup-time only, called from
    /// `Category::register_cuts`; registration order is the reporting and
    /// column order for the whole run.
    pub fn register(&mut self, name: &str) -> Result<()> {
        if self.cuts.iter().any(|cut| cut.name == name) {
            return Err(Error::DuplicateCut {
                category: self.category.clone(),
                cut: name.to_string(),
            });
        }
        self.cuts.push(Cut {
            name: name.to_string(),
            column: format!("{}_{}", self.category, name),
            outcome: false,
            passed_events: 0,
        });
        Ok(())
    }

    /// Set this event's outcome for the named cut.
    ///
    /// The cumulative counter follows the per-event outcome: it goes up when
    /// the cut first passes this event and back down if the cut is re-marked
    /// as failed before the event completes, so across events it counts
    /// exactly the events whose final outcome was a pass.
    pub fn set(&mut self, name: &str, outcome: bool) -> Result<()> {
        let cut = self
            .cuts
            .iter_mut()
            .find(|cut| cut.name == name)
            .ok_or_else(|| Error::UnknownCut {
                category: self.category.clone(),
                cut: name.to_string(),
            })?;
        if outcome && !cut.outcome {
            cut.passed_events += 1;
        } else if !outcome && cut.outcome {
            cut.passed_events -= 1;
        }
        cut.outcome = outcome;
        Ok(())
    }

    /// Mark the named cut as passed for this event.
    pub fn pass(&mut self, name: &str) -> Result<()> {
        self.set(name, true)
    }

    /// Mark the named cut as failed for this event.
    pub fn fail(&mut self, name: &str) -> Result<()> {
        self.set(name, false)
    }

    /// Start a new event: every outcome back to false. Cumulative counters
    /// are untouched.
    pub(crate) fn reset(&mut self) {
        for cut in &mut self.cuts {
            cut.outcome = false;
        }
    }

    /// Write every cut's current outcome to its output column, in
    /// registration order.
    pub(crate) fn flush<S: ColumnSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        for cut in &self.cuts {
            sink.write_bool(&cut.column, cut.outcome)?;
        }
        Ok(())
    }

    pub(crate) fn column_keys(&self) -> impl Iterator<Item = &str> {
        self.cuts.iter().map(|cut| cut.column.as_str())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.cuts.iter().any(|cut| cut.name == name)
    }

    /// This event's outcome for the named cut, if registered.
    pub fn outcome(&self, name: &str) -> Option<bool> {
        self.cuts.iter().find(|cut| cut.name == name).map(|cut| cut.outcome)
    }

    /// Cumulative pass counts in registration order, for cut-flow reporting.
    pub fn cut_flow(&self) -> Vec<CutSummary> {
        self.cuts
            .iter()
            .map(|cut| CutSummary {
                name: cut.name.clone(),
                passed_events: cut.passed_events,
            })
            .collect()
    }
}
