use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, Category, Confidence, ObservationWindow, PersonaInput};

/// Estimate for one spending category. Invariant: `low <= point <= high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryEstimate {
    pub category: Category,
    pub low: Amount,
    pub point: Amount,
    pub high: Amount,
    pub confidence: Confidence,
    pub sample_size: usize,
    pub freshest_recorded_at: Option<DateTime<Utc>>,
}

impl CategoryEstimate {
    /// The in-band "no data" estimate: all zeros, zero confidence.
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            low: Amount::ZERO,
            point: Amount::ZERO,
            high: Amount::ZERO,
            confidence: Confidence::ZERO,
            sample_size: 0,
            freshest_recorded_at: None,
        }
    }

    pub fn has_data(&self) -> bool {
        self.sample_size > 0
    }
}

/// Full persona-conditioned estimate for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub region: String,
    pub persona: PersonaInput,
    pub window: ObservationWindow,
    /// In persona resolver order.
    pub categories: Vec<CategoryEstimate>,
    pub total_low: Amount,
    pub total_high: Amount,
    pub overall_confidence: Confidence,
}

impl EstimateResult {
    pub fn category(&self, name: &str) -> Option<&CategoryEstimate> {
        let wanted = Category::new(name);
        self.categories.iter().find(|c| c.category == wanted)
    }

    /// Categories that had no matching samples.
    pub fn categories_without_data(&self) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(|c| !c.has_data())
            .map(|c| &c.category)
    }
}
