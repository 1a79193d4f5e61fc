use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Category, Freshness};

/// Sample count and freshness for one category in a region.
/// Invariant: `gap == (sample_count == 0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCoverage {
    pub category: Category,
    pub sample_count: usize,
    pub freshest_recorded_at: Option<DateTime<Utc>>,
    pub freshest_age_days: Option<f64>,
    pub freshness: Freshness,
    pub gap: bool,
}

/// Freshness/completeness snapshot for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub region: String,
    pub as_of: DateTime<Utc>,
    pub categories: Vec<CategoryCoverage>,
    /// Worst freshness among categories with data; `NoData` if all are gaps.
    pub freshness: Freshness,
    pub gap_count: usize,
}

impl CoverageSummary {
    pub fn category(&self, name: &str) -> Option<&CategoryCoverage> {
        let wanted = Category::new(name);
        self.categories.iter().find(|c| c.category == wanted)
    }

    pub fn gaps(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| c.gap).map(|c| &c.category)
    }
}
