use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Cumulative statistics for one whole run.
///
/// Categories appear in registration order, and cuts within a category in
/// their own registration order, regardless of when pass/fail marks happened
/// during the run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    /// Events for which phase 2 completed
    pub processed_events: u64,
    /// Events entered by at least one category
    pub selected_events: u64,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub description: String,
    /// Events this category entered
    pub events: u64,
    pub cuts: Vec<CutSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CutSummary {
    pub name: String,
    /// Events where this cut's final outcome was a pass
    pub passed_events: u64,
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Categorization summary ---")?;
        writeln!(f, "Run {} (started {})", self.run_id, self.started_at)?;
        writeln!(f, "Processed events: {}", self.processed_events)?;
        writeln!(
            f,
            "Selected events:  {} ({:.1}%)",
            self.selected_events,
            percent(self.selected_events, self.processed_events)
        )?;
        for category in &self.categories {
            writeln!(f)?;
            writeln!(f, "{}: {}", category.name, category.description)?;
            writeln!(
                f,
                "  events: {} ({:.1}% of processed)",
                category.events,
                percent(category.events, self.processed_events)
            )?;
            for cut in &category.cuts {
                writeln!(
                    f,
                    "  cut {:<24} passed {:>10} ({:.1}%)",
                    cut.name,
                    cut.passed_events,
                    percent(cut.passed_events, self.processed_events)
                )?;
            }
        }
        Ok(())
    }
}
