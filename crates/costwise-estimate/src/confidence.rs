use costwise_core::constants::CONFIDENCE_CURVE_STEEPNESS;
use costwise_core::{Confidence, EstimatorConfig};

/// Two-factor confidence formula.
///
/// ```text
/// confidence = clamp(0, 1, size(n) × recency(age_of_freshest))
///
/// size(n)      = (1 − e^(−k·n/N)) / (1 − e^(−k))   for n < N, else 1
/// recency(age) = 1                                 for age ≤ fresh_days
///              = linear from 1 down to floor       for fresh_days < age < stale_days
///              = floor                             for age ≥ stale_days
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    pub saturation_n: u32,
    pub fresh_days: u32,
    pub stale_days: u32,
    pub recency_floor: f64,
}

/// Each factor of a confidence score, for debugging and observability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceBreakdown {
    pub size_factor: f64,
    pub recency_factor: f64,
    pub confidence: Confidence,
}

impl ConfidencePolicy {
    pub fn from_config(config: &EstimatorConfig) -> Self {
        Self {
            saturation_n: config.confidence_saturation_n,
            fresh_days: config.fresh_days,
            stale_days: config.stale_days,
            recency_floor: config.recency_floor,
        }
    }

    /// Sample-size factor. 0 at n = 0, rising to exactly 1 at `saturation_n`.
    pub fn size_factor(&self, sample_count: usize) -> f64 {
        let saturation = self.saturation_n.max(1) as f64;
        let n = sample_count as f64;
        if n >= saturation {
            return 1.0;
        }
        let k = CONFIDENCE_CURVE_STEEPNESS;
        ((1.0 - (-k * n / saturation).exp()) / (1.0 - (-k).exp())).clamp(0.0, 1.0)
    }

    /// Recency factor for the age (in days) of the freshest sample.
    pub fn recency_factor(&self, age_days: f64) -> f64 {
        let fresh = self.fresh_days as f64;
        let stale = self.stale_days as f64;
        let floor = self.recency_floor.clamp(0.0, 1.0);

        if age_days <= fresh {
            1.0
        } else if age_days >= stale {
            floor
        } else {
            let progress = (age_days - fresh) / (stale - fresh);
            1.0 - (1.0 - floor) * progress
        }
    }

    pub fn score(&self, sample_count: usize, freshest_age_days: Option<f64>) -> Confidence {
        self.breakdown(sample_count, freshest_age_days).confidence
    }

    /// Score with each factor exposed. No samples (or no age) scores zero.
    pub fn breakdown(&self, sample_count: usize, freshest_age_days: Option<f64>) -> ConfidenceBreakdown {
        let size_factor = self.size_factor(sample_count);
        let recency_factor = match freshest_age_days {
            Some(age) if sample_count > 0 => self.recency_factor(age),
            _ => 0.0,
        };
        ConfidenceBreakdown {
            size_factor,
            recency_factor,
            confidence: Confidence::new(size_factor * recency_factor),
        }
    }
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self::from_config(&EstimatorConfig::default())
    }
}
