//! Two-phase categorization engine for collision-event analyses.
//!
//! Analyses declare named [`Category`] rules; per event, the host runs
//! phase 1 ([`CategoryManager::evaluate_pre_analyzers`]) after its producers
//! and phase 2 ([`CategoryManager::evaluate_post_analyzers`]) after its
//! analyzers. Each category's membership and per-cut outcomes land in the
//! output column store under the category's namespace, and cumulative
//! counters feed the end-of-run cut-flow summary.

pub mod category;
pub mod cut;
pub mod error;
pub mod manager;
pub mod summary;

pub use category::{Category, CategoryData, CategoryMetadata};
pub use cut::CutManager;
pub use error::{Error, Result};
pub use manager::CategoryManager;
pub use summary::{CategorySummary, CutSummary, RunSummary};
