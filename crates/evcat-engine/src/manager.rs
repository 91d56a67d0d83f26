use chrono::{DateTime, Utc};
use uuid::Uuid;

use evcat_types::{ColumnSink, EventBag};

use crate::category::{Category, CategoryData, CategoryMetadata};
use crate::error::{Error, Result};
use crate::summary::{CategorySummary, RunSummary};

/// Orchestrates two-phase category evaluation for one run.
///
/// Owns the registered categories in registration order, the output column
/// sink, and the run-wide counters. One manager instance per run (and per
/// worker, if the host parallelizes across events): nothing here defends
/// against concurrent access, per the host's single-event-at-a-time
/// guarantee.
///
/// Generic over the column sink so hosts keep typed access to their store;
/// `CategoryManager<Box<dyn ColumnSink>>` works where the sink is only known
/// at run time.
pub struct CategoryManager<S: ColumnSink> {
    categories: Vec<CategoryData>,
    columns: S,
    run_id: Uuid,
    started_at: DateTime<Utc>,
    /// Events for which phase 2 completed
    processed_events: u64,
    /// Events entered by at least one category
    selected_events: u64,
    /// Set by the first evaluation; registration is refused afterwards so
    /// the column layout stays fixed for the whole run
    sealed: bool,
}

impl<S: ColumnSink> CategoryManager<S> {
    pub fn new(columns: S) -> Self {
        Self {
            categories: Vec::new(),
            columns,
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            processed_events: 0,
            selected_events: 0,
            sealed: false,
        }
    }

    /// Register a category constructed from its `Default` impl.
    ///
    /// Setup-time only: fails once any event has been evaluated. Declares
    /// the membership column, runs the category's `register_cuts` exactly
    /// once, then declares one column per registered cut.
    pub fn new_category<T>(&mut self, name: &str, description: &str) -> Result<()>
    where
        T: Category + Default + 'static,
    {
        self.add_category(name, description, Box::new(T::default()))
    }

    /// Register an already-constructed category instance.
    pub fn add_category(
        &mut self,
        name: &str,
        description: &str,
        callback: Box<dyn Category>,
    ) -> Result<()> {
        if self.sealed {
            return Err(Error::RegistrationClosed(name.to_string()));
        }
        if self.categories.iter().any(|data| data.name() == name) {
            return Err(Error::DuplicateCategory(name.to_string()));
        }

        let mut data = CategoryData::new(name, description, callback);
        self.columns.declare_bool(data.column())?;
        data.callback.register_cuts(&mut data.cuts)?;
        for key in data.cuts.column_keys() {
            self.columns.declare_bool(key)?;
        }
        self.categories.push(data);
        Ok(())
    }

    /// Phase 1: evaluate every category against producer outputs only.
    ///
    /// Returns whether any category is still a candidate for this event. The
    /// host may use a false return to skip analyzer work entirely; if it
    /// does, it must also skip [`Self::evaluate_post_analyzers`], and the
    /// event is then not counted as processed.
    pub fn evaluate_pre_analyzers(&mut self, producers: &EventBag) -> Result<bool> {
        self.sealed = true;
        let mut candidate = false;
        for data in &mut self.categories {
            data.cuts.reset();
            data.callback.evaluate_cuts_pre_analyzers(&mut data.cuts, producers)?;
            let selected = data.callback.event_in_category_pre_analyzers(producers)?;
            data.in_category_pre = selected;
            data.in_category = selected;
            self.columns.write_bool(data.column(), selected)?;
            data.cuts.flush(&mut self.columns)?;
            candidate = candidate || selected;
        }
        Ok(candidate)
    }

    /// Phase 2: finalize membership and cut outcomes with analyzer outputs.
    ///
    /// Overwrites the persisted membership value, bumps each entered
    /// category's `events` counter, and updates the run-wide counters.
    /// Returns whether any category selected the event.
    pub fn evaluate_post_analyzers(
        &mut self,
        producers: &EventBag,
        analyzers: &EventBag,
    ) -> Result<bool> {
        let mut selected_any = false;
        for data in &mut self.categories {
            data.callback
                .evaluate_cuts_post_analyzers(&mut data.cuts, producers, analyzers)?;
            let selected = data
                .callback
                .event_in_category_post_analyzers(producers, analyzers)?;
            data.in_category_post = selected;
            data.in_category = selected;
            if selected {
                data.events += 1;
            }
            self.columns.write_bool(data.column(), selected)?;
            data.cuts.flush(&mut self.columns)?;
            selected_any = selected_any || selected;
        }

        self.processed_events += 1;
        if selected_any {
            self.selected_events += 1;
        }
        Ok(selected_any)
    }

    /// Clear all per-event transient state in preparation for the next
    /// event. Idempotent; cumulative counters are untouched.
    pub fn reset(&mut self) {
        for data in &mut self.categories {
            data.reset();
        }
    }

    /// Cumulative statistics for the run so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            processed_events: self.processed_events,
            selected_events: self.selected_events,
            categories: self
                .categories
                .iter()
                .map(|data| CategorySummary {
                    name: data.name().to_string(),
                    description: data.description().to_string(),
                    events: data.events(),
                    cuts: data.cuts().cut_flow(),
                })
                .collect(),
        }
    }

    /// Render the run summary to standard diagnostic output.
    pub fn print_summary(&self) {
        eprintln!("{}", self.summary());
    }

    pub fn category(&self, name: &str) -> Option<&CategoryData> {
        self.categories.iter().find(|data| data.name() == name)
    }

    /// Registered categories, in registration order.
    pub fn categories(&self) -> &[CategoryData] {
        &self.categories
    }

    /// Shared metadata handle of the named category, if it allocates one.
    pub fn metadata(&self, name: &str) -> Option<CategoryMetadata> {
        self.category(name).and_then(|data| data.metadata())
    }

    /// The output column store, e.g. for a host-side row commit.
    pub fn columns(&self) -> &S {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut S {
        &mut self.columns
    }

    pub fn processed_events(&self) -> u64 {
        self.processed_events
    }

    pub fn selected_events(&self) -> u64 {
        self.selected_events
    }
}

