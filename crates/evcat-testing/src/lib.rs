//! Testing fixtures for the evcat engine suites.
//!
//! Provides:
//! - `categories`: canned category implementations with known behavior
//! - `events`: event-bag builders for producer/analyzer inputs

pub mod categories;
pub mod events;
