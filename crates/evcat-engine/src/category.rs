use std::any::Any;
use std::sync::Arc;

use evcat_types::EventBag;

use crate::cut::CutManager;
use crate::error::Result;

/// Shared handle to category-defined run-time state.
///
/// A category may allocate state that other consumers (typically analyzers
/// that need to know what the category decided) read during the event. The
/// handle is exclusively owned by the category; callers only ever get a
/// shared clone through [`CategoryData::metadata`], and it never outlives the
/// owning category. Interior mutability, if the category wants to update the
/// state from its `&self` hooks, is the category author's concern.
pub type CategoryMetadata = Arc<dyn Any + Send + Sync>;

/// User-supplied per-category decision logic.
///
/// A category is an independent, named event-classification rule evaluated
/// in two phases: phase 1 sees only producer outputs, phase 2 additionally
/// sees analyzer outputs. Its membership decision must not depend on another
/// category's outcome within the same event.
///
/// Decision hooks return `Result` so upstream lookup failures propagate
/// unchanged through the manager; the manager never catches them.
pub trait Category {
    /// Phase-1 decision, from producer outputs only. Must be deterministic
    /// and free of side effects beyond reading producer state.
    fn event_in_category_pre_analyzers(&self, producers: &EventBag) -> Result<bool>;

    /// Phase-2 decision, from producer and analyzer outputs. The manager
    /// invokes this unconditionally; a category that recorded its own
    /// disqualification in phase 1 is expected to return false here.
    fn event_in_category_post_analyzers(
        &self,
        producers: &EventBag,
        analyzers: &EventBag,
    ) -> Result<bool>;

    /// Declare the category's cuts. Called exactly once, at registration
    /// time, before any event is processed.
    fn register_cuts(&mut self, _cuts: &mut CutManager) -> Result<()> {
        Ok(())
    }

    /// Mark cuts for this event from producer outputs. Called every event,
    /// regardless of the category's own membership decision.
    fn evaluate_cuts_pre_analyzers(
        &self,
        _cuts: &mut CutManager,
        _producers: &EventBag,
    ) -> Result<()> {
        Ok(())
    }

    /// Mark cuts for this event from producer and analyzer outputs.
    fn evaluate_cuts_post_analyzers(
        &self,
        _cuts: &mut CutManager,
        _producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<()> {
        Ok(())
    }

    /// The category's shared metadata handle, if it allocates one.
    fn metadata(&self) -> Option<CategoryMetadata> {
        None
    }
}

/// One registered category with its bookkeeping.
///
/// Binds the category instance to its output namespace (columns prefixed
/// `<name>_`), its own cut manager and its counters. Exactly one `Category`
/// and one `CutManager` per `CategoryData` for their entire lifetime.
pub struct CategoryData {
    name: String,
    description: String,
    /// Membership output column, `<name>_category`
    column: String,
    pub(crate) callback: Box<dyn Category>,
    pub(crate) cuts: CutManager,
    /// Number of events this category entered (phase-2 decisions only)
    pub(crate) events: u64,
    pub(crate) in_category_pre: bool,
    pub(crate) in_category_post: bool,
    /// Persisted membership value: whichever phase last ran for this event
    pub(crate) in_category: bool,
}

impl CategoryData {
    pub(crate) fn new(name: &str, description: &str, callback: Box<dyn Category>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            column: format!("{}_category", name),
            callback,
            cuts: CutManager::new(name),
            events: 0,
            in_category_pre: false,
            in_category_post: false,
            in_category: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn column(&self) -> &str {
        &self.column
    }

    /// Cumulative number of events this category entered.
    pub fn events(&self) -> u64 {
        self.events
    }

    /// This event's phase-1 decision.
    pub fn in_category_pre(&self) -> bool {
        self.in_category_pre
    }

    /// This event's phase-2 decision.
    pub fn in_category_post(&self) -> bool {
        self.in_category_post
    }

    /// The persisted membership value for this event.
    pub fn in_category(&self) -> bool {
        self.in_category
    }

    pub fn cuts(&self) -> &CutManager {
        &self.cuts
    }

    /// Stable accessor for the category's shared metadata handle.
    pub fn metadata(&self) -> Option<CategoryMetadata> {
        self.callback.metadata()
    }

    pub(crate) fn reset(&mut self) {
        self.in_category_pre = false;
        self.in_category_post = false;
        self.in_category = false;
        self.cuts.reset();
    }
}
