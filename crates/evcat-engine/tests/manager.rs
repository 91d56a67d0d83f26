use evcat_engine::{Category, CategoryManager, CutManager, Error, Result};
use evcat_testing::categories::{AlwaysIn, CountingCategory, HookLog, NeverIn, PtThreshold};
use evcat_testing::events::{bag, electron_event};
use serde_json::json;
use evcat_types::{EventBag, MemoryColumns};

fn manager() -> CategoryManager<MemoryColumns> {
    CategoryManager::new(MemoryColumns::new())
}

/// Drive one event through both phases and commit its row, the way a host
/// event loop would.
fn run_event(manager: &mut CategoryManager<MemoryColumns>, producers: &EventBag) -> bool {
    manager.reset();
    manager.evaluate_pre_analyzers(producers).unwrap();
    let selected = manager
        .evaluate_post_analyzers(producers, &EventBag::new())
        .unwrap();
    manager.columns_mut().commit_row();
    selected
}

#[test]
fn test_single_electron_scenario() {
    let mut manager = manager();
    manager
        .new_category::<PtThreshold>("single", "one electron above threshold")
        .unwrap();

    // pt = 25: both phases select, cut passes
    let producers = electron_event(25.0);
    manager.reset();
    assert!(manager.evaluate_pre_analyzers(&producers).unwrap());
    assert!(
        manager
            .evaluate_post_analyzers(&producers, &EventBag::new())
            .unwrap()
    );
    let data = manager.category("single").unwrap();
    assert!(data.in_category_pre());
    assert!(data.in_category_post());
    assert!(data.in_category());
    assert_eq!(data.events(), 1);
    assert_eq!(data.cuts().cut_flow()[0].passed_events, 1);
    assert_eq!(manager.selected_events(), 1);

    // pt = 10: both phases reject, nothing moves
    let producers = electron_event(10.0);
    manager.reset();
    assert!(!manager.evaluate_pre_analyzers(&producers).unwrap());
    assert!(
        !manager
            .evaluate_post_analyzers(&producers, &EventBag::new())
            .unwrap()
    );
    let data = manager.category("single").unwrap();
    assert!(!data.in_category());
    assert_eq!(data.events(), 1);
    assert_eq!(data.cuts().cut_flow()[0].passed_events, 1);
    assert_eq!(manager.processed_events(), 2);
    assert_eq!(manager.selected_events(), 1);
}

#[test]
fn test_two_categories_over_three_events() {
    let mut manager = manager();
    manager.new_category::<AlwaysIn>("a", "every event").unwrap();
    manager.new_category::<NeverIn>("b", "no event").unwrap();

    for _ in 0..3 {
        run_event(&mut manager, &EventBag::new());
    }

    assert_eq!(manager.processed_events(), 3);
    assert_eq!(manager.selected_events(), 3);
    assert_eq!(manager.category("a").unwrap().events(), 3);
    assert_eq!(manager.category("b").unwrap().events(), 0);
}

#[test]
fn test_selected_events_counts_once_per_event() {
    let mut manager = manager();
    manager.new_category::<AlwaysIn>("first", "every event").unwrap();
    manager.new_category::<AlwaysIn>("second", "every event too").unwrap();

    run_event(&mut manager, &EventBag::new());

    // Two categories selected the event; the run-wide counter moves once
    assert_eq!(manager.selected_events(), 1);
    assert_eq!(manager.category("first").unwrap().events(), 1);
    assert_eq!(manager.category("second").unwrap().events(), 1);
}

#[test]
fn test_default_decisions_leave_everything_false() {
    // NeverIn overrides nothing optional: no cuts, default evaluation hooks
    let mut manager = manager();
    manager.new_category::<NeverIn>("empty", "defaults only").unwrap();

    manager.reset();
    let candidate = manager.evaluate_pre_analyzers(&EventBag::new()).unwrap();

    assert!(!candidate);
    let data = manager.category("empty").unwrap();
    assert!(!data.in_category_pre());
    assert!(!data.in_category());
    assert!(data.cuts().cut_flow().is_empty());
}

/// Rejected in phase 1, entered in phase 2 (e.g. a decision that needs an
/// analyzer-computed discriminant).
#[derive(Default)]
struct PostOnly;

impl Category for PostOnly {
    fn event_in_category_pre_analyzers(&self, _producers: &EventBag) -> Result<bool> {
        Ok(false)
    }

    fn event_in_category_post_analyzers(
        &self,
        _producers: &EventBag,
        analyzers: &EventBag,
    ) -> Result<bool> {
        analyzers.get_bool("mva_pass").map_err(Into::into)
    }
}

#[test]
fn test_events_counter_independent_of_phase_one() {
    let mut manager = manager();
    manager.new_category::<PostOnly>("mva", "analyzer-driven").unwrap();

    let analyzers = bag([("mva_pass", json!(true))]);

    manager.reset();
    let candidate = manager.evaluate_pre_analyzers(&EventBag::new()).unwrap();
    assert!(!candidate);
    assert!(!manager.category("mva").unwrap().in_category());

    // Host ran analyzers anyway; phase 2 overturns the phase-1 decision
    let selected = manager
        .evaluate_post_analyzers(&EventBag::new(), &analyzers)
        .unwrap();
    assert!(selected);
    let data = manager.category("mva").unwrap();
    assert!(!data.in_category_pre());
    assert!(data.in_category_post());
    assert!(data.in_category());
    assert_eq!(data.events(), 1);
}

#[test]
fn test_hook_order_and_metadata_handle() {
    let mut manager = manager();
    manager.new_category::<CountingCategory>("counting", "logs hooks").unwrap();

    run_event(&mut manager, &EventBag::new());

    let metadata = manager.metadata("counting").expect("metadata handle");
    let log = metadata.downcast::<HookLog>().expect("HookLog handle");
    assert_eq!(
        log.calls(),
        [
            "register_cuts",
            "evaluate_cuts_pre",
            "decide_pre",
            "evaluate_cuts_post",
            "decide_post",
        ]
    );
}

#[test]
fn test_upstream_error_propagates() {
    let mut manager = manager();
    manager
        .new_category::<PtThreshold>("single", "one electron above threshold")
        .unwrap();

    // Producers bag misses electron_pt entirely
    manager.reset();
    let err = manager.evaluate_pre_analyzers(&EventBag::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::Store(evcat_types::Error::MissingValue(key)) if key == "electron_pt"
    ));
    // The failed event was never counted
    assert_eq!(manager.processed_events(), 0);
}

#[test]
fn test_host_may_skip_phase_two_on_false_candidate() {
    let mut manager = manager();
    manager
        .new_category::<PtThreshold>("single", "one electron above threshold")
        .unwrap();

    manager.reset();
    let candidate = manager.evaluate_pre_analyzers(&electron_event(10.0)).unwrap();
    assert!(!candidate);
    // Host skips analyzers and phase 2: the event is not processed
    assert_eq!(manager.processed_events(), 0);
    assert_eq!(manager.selected_events(), 0);
    assert_eq!(manager.category("single").unwrap().cuts().cut_flow()[0].passed_events, 0);

    // The next event goes through both phases untouched by the skipped one
    let producers = electron_event(25.0);
    manager.reset();
    assert!(manager.evaluate_pre_analyzers(&producers).unwrap());
    manager
        .evaluate_post_analyzers(&producers, &EventBag::new())
        .unwrap();
    assert_eq!(manager.processed_events(), 1);
    assert_eq!(manager.selected_events(), 1);
}

#[test]
fn test_summary_enumerates_in_registration_order() {
    let mut manager = manager();
    manager.new_category::<NeverIn>("zeta", "registered first").unwrap();
    manager.new_category::<AlwaysIn>("alpha", "registered second").unwrap();
    manager
        .new_category::<PtThreshold>("single", "registered third")
        .unwrap();

    run_event(&mut manager, &electron_event(25.0));

    let summary = manager.summary();
    let names: Vec<_> = summary.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["zeta", "alpha", "single"]);
    assert_eq!(summary.processed_events, 1);
    assert_eq!(summary.selected_events, 1);
    assert_eq!(summary.categories[2].cuts[0].name, "pt_cut");
    assert_eq!(summary.categories[2].cuts[0].passed_events, 1);
}

#[test]
fn test_duplicate_category_rejected() {
    let mut manager = manager();
    manager.new_category::<AlwaysIn>("inclusive", "all events").unwrap();
    let err = manager
        .new_category::<NeverIn>("inclusive", "all events again")
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateCategory(name) if name == "inclusive"));
    // The existing registration survives
    assert_eq!(manager.categories().len(), 1);
}

#[test]
fn test_registration_closed_after_first_event() {
    let mut manager = manager();
    manager.new_category::<AlwaysIn>("inclusive", "all events").unwrap();
    manager.evaluate_pre_analyzers(&EventBag::new()).unwrap();
    let err = manager.new_category::<NeverIn>("late", "too late").unwrap_err();
    assert!(matches!(err, Error::RegistrationClosed(name) if name == "late"));
}

#[test]
fn test_reset_is_idempotent_and_keeps_counters() {
    let mut manager = manager();
    manager.new_category::<AlwaysIn>("inclusive", "all events").unwrap();
    manager.evaluate_pre_analyzers(&EventBag::new()).unwrap();
    manager
        .evaluate_post_analyzers(&EventBag::new(), &EventBag::new())
        .unwrap();

    manager.reset();
    manager.reset();
    let data = manager.category("inclusive").unwrap();
    assert!(!data.in_category_pre());
    assert!(!data.in_category_post());
    assert!(!data.in_category());
    assert_eq!(data.events(), 1);
    assert_eq!(manager.processed_events(), 1);
}

#[test]
fn test_membership_column_declared_at_registration() {
    let mut manager = manager();
    manager.new_category::<AlwaysIn>("inclusive", "all events").unwrap();
    assert_eq!(manager.columns().keys(), ["inclusive_category"]);
}

/// A category whose register_cuts declares the same name twice.
#[derive(Default)]
struct BrokenCuts;

impl Category for BrokenCuts {
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

    fn register_cuts(&mut self, cuts: &mut CutManager) -> Result<()> {
        cuts.register("pt_cut")?;
        cuts.register("pt_cut")
    }
}

#[test]
fn test_duplicate_cut_fails_at_registration() {
    let mut manager = manager();
    let err = manager
        .new_category::<BrokenCuts>("broken", "duplicate cut")
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateCut { cut, .. } if cut == "pt_cut"));
}
