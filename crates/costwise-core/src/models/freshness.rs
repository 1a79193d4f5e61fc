use serde::{Deserialize, Serialize};

/// Age class of the freshest observation for a category or region.
///
/// Variants are ordered from best to worst so `max()` picks the worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Freshest sample is no older than `fresh_days`.
    Fresh,
    /// Between `fresh_days` and `stale_days`.
    Aging,
    /// Older than `stale_days`.
    Stale,
    /// No samples at all.
    NoData,
}

impl Freshness {
    pub fn classify(age_days: f64, fresh_days: u32, stale_days: u32) -> Self {
        if age_days <= fresh_days as f64 {
            Self::Fresh
        } else if age_days < stale_days as f64 {
            Self::Aging
        } else {
            Self::Stale
        }
    }
}
