//! Event-bag builders for producer/analyzer inputs.

use evcat_types::EventBag;
use serde_json::Value;

/// Build a bag from key/value pairs.
pub fn bag<const N: usize>(pairs: [(&str, Value); N]) -> EventBag {
    pairs.into_iter().collect()
}

/// Producer bag for an event with one electron of the given pt.
pub fn electron_event(pt: f64) -> EventBag {
    let mut producers = EventBag::new();
    producers.insert("electron_pt", pt);
    producers
}
