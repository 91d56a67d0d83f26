//! Canned categories with known behavior.

use std::sync::{Arc, Mutex};

use evcat_engine::{Category, CategoryMetadata, CutManager, Result};
use evcat_types::EventBag;

/// Enters every event, in both phases.
#[derive(Debug, Default)]
pub struct AlwaysIn;

impl Category for AlwaysIn {
    fn event_in_category_pre_analyzers(&self, _producers: &EventBag) -> Result<bool> {
        Ok(true)
    }

    fn event_in_category_post_analyzers(
        &self,
        _producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<bool> {
        Ok(true)
    }
}

/// Enters no event. Registers no cuts; the default hooks apply.
#[derive(Debug, Default)]
pub struct NeverIn;

impl Category for NeverIn {
    fn event_in_category_pre_analyzers(&self, _producers: &EventBag) -> Result<bool> {
        Ok(false)
    }

    fn event_in_category_post_analyzers(
        &self,
        _producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<bool> {
        Ok(false)
    }
}

/// Selects events with a leading electron above a pt threshold.
///
/// Reads `electron_pt` from the producers bag in both phases and registers a
/// single `pt_cut` marked pass iff the threshold is met. A missing or
/// malformed `electron_pt` propagates as an upstream-data error.
#[derive(Debug)]
pub struct PtThreshold {
    pub threshold: f64,
}

impl Default for PtThreshold {
    fn default() -> Self {
        Self { threshold: 20.0 }
    }
}

impl Category for PtThreshold {
    fn event_in_category_pre_analyzers(&self, producers: &EventBag) -> Result<bool> {
        Ok(producers.get_f64("electron_pt")? > self.threshold)
    }

    fn event_in_category_post_analyzers(
        &self,
        producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<bool> {
        Ok(producers.get_f64("electron_pt")? > self.threshold)
    }

    fn register_cuts(&mut self, cuts: &mut CutManager) -> Result<()> {
        cuts.register("pt_cut")
    }

    fn evaluate_cuts_pre_analyzers(&self, cuts: &mut CutManager, producers: &EventBag) -> Result<()> {
        cuts.set("pt_cut", producers.get_f64("electron_pt")? > self.threshold)
    }

    fn evaluate_cuts_post_analyzers(
        &self,
        cuts: &mut CutManager,
        producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<()> {
        cuts.set("pt_cut", producers.get_f64("electron_pt")? > self.threshold)
    }
}

/// Hook invocation log shared through the category metadata handle.
#[derive(Debug, Default)]
pub struct HookLog {
    calls: Mutex<Vec<&'static str>>,
}

impl HookLog {
    fn record(&self, hook: &'static str) {
        self.calls.lock().unwrap().push(hook);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

/// Enters every event and records every hook invocation in its metadata.
///
/// Used to assert the manager's phase ordering and the metadata exposure
/// path: tests downcast the handle back to [`HookLog`].
pub struct CountingCategory {
    log: Arc<HookLog>,
}

impl Default for CountingCategory {
    fn default() -> Self {
        Self {
            log: Arc::new(HookLog::default()),
        }
    }
}

impl Category for CountingCategory {
    fn event_in_category_pre_analyzers(&self, _producers: &EventBag) -> Result<bool> {
        self.log.record("decide_pre");
        Ok(true)
    }

    fn event_in_category_post_analyzers(
        &self,
        _producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<bool> {
        self.log.record("decide_post");
        Ok(true)
    }

    fn register_cuts(&mut self, cuts: &mut CutManager) -> Result<()> {
        self.log.record("register_cuts");
        cuts.register("seen")
    }

    fn evaluate_cuts_pre_analyzers(
        &self,
        cuts: &mut CutManager,
        _producers: &EventBag,
    ) -> Result<()> {
        self.log.record("evaluate_cuts_pre");
        cuts.pass("seen")
    }

    fn evaluate_cuts_post_analyzers(
        &self,
        cuts: &mut CutManager,
        _producers: &EventBag,
        _analyzers: &EventBag,
    ) -> Result<()> {
        self.log.record("evaluate_cuts_post");
        cuts.pass("seen")
    }

    fn metadata(&self) -> Option<CategoryMetadata> {
        Some(self.log.clone())
    }
}
