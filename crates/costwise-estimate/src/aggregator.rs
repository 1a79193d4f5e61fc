//! Category Aggregator: one category's samples → point, IQR range, confidence.

use chrono::{DateTime, Utc};
use costwise_core::constants::{RANGE_HIGH_PERCENTILE, RANGE_LOW_PERCENTILE};
use costwise_core::errors::{CostwiseResult, EstimationError};
use costwise_core::{
    Amount, CancellationToken, Category, CategoryEstimate, CostQuery, ICostDataPort,
    ObservationWindow,
};
use tracing::debug;

use crate::confidence::ConfidencePolicy;
use crate::persona::CategoryPlan;
use crate::stats;

/// One participating observation with its sub-category weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSample {
    pub amount: Amount,
    pub weight: f64,
    pub recorded_at: DateTime<Utc>,
}

/// Reduces matching data points for one category into a [`CategoryEstimate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryAggregator {
    policy: ConfidencePolicy,
}

impl CategoryAggregator {
    pub fn new(policy: ConfidencePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConfidencePolicy {
        &self.policy
    }

    /// Query the port for `plan` and summarize the result.
    ///
    /// Cancellation is checked before and after the port call; a cancelled
    /// branch returns `Cancelled` and discards whatever it fetched.
    pub fn aggregate(
        &self,
        port: &dyn ICostDataPort,
        region: &str,
        plan: &CategoryPlan,
        window: &ObservationWindow,
        cancel: &CancellationToken,
    ) -> CostwiseResult<CategoryEstimate> {
        let _span = costwise_observability::aggregate_span!(region, plan.category).entered();

        if cancel.is_cancelled() {
            return Err(EstimationError::Cancelled);
        }

        let query = CostQuery::new(region, plan.category.clone(), *window)
            .with_sub_categories(plan.sub_category_names());
        let points = port.query_cancellable(&query, cancel)?;

        if cancel.is_cancelled() {
            return Err(EstimationError::Cancelled);
        }

        // Ports filter, but participation is decided here.
        let samples: Vec<WeightedSample> = points
            .iter()
            .filter(|p| query.matches(p))
            .map(|p| WeightedSample {
                amount: p.amount,
                weight: plan.sample_weight(&p.sub_category),
                recorded_at: p.recorded_at,
            })
            .filter(|s| s.weight > 0.0)
            .collect();

        debug!(
            category = %plan.category,
            fetched = points.len(),
            participating = samples.len(),
            "aggregating category"
        );

        Ok(self.summarize(plan.category.clone(), &samples, window.as_of))
    }

    /// Pure reduction of already-filtered samples.
    pub fn summarize(
        &self,
        category: Category,
        samples: &[WeightedSample],
        as_of: DateTime<Utc>,
    ) -> CategoryEstimate {
        if samples.is_empty() {
            return CategoryEstimate::empty(category);
        }

        let freshest = samples.iter().map(|s| s.recorded_at).max();
        let (low, point, high) = central_range(samples);

        let freshest_age = freshest.map(|ts| ObservationWindow::unbounded(as_of).age_days(ts));
        let confidence = self.policy.score(samples.len(), freshest_age);

        CategoryEstimate {
            category,
            low,
            point,
            high,
            confidence,
            sample_size: samples.len(),
            freshest_recorded_at: freshest,
        }
    }
}

/// (low, point, high) for a non-empty sample set.
///
/// Uniform weights use the interpolated median and quartiles; non-uniform
/// weights use the weighted versions. Fewer than two samples collapse the
/// range onto the point.
fn central_range(samples: &[WeightedSample]) -> (Amount, Amount, Amount) {
    let first_weight = samples[0].weight;
    let uniform = samples.iter().all(|s| s.weight == first_weight);

    let (low, point, high) = if uniform {
        let mut values: Vec<i64> = samples.iter().map(|s| s.amount.minor()).collect();
        values.sort_unstable();
        (
            stats::percentile(&values, RANGE_LOW_PERCENTILE),
            stats::median(&values),
            stats::percentile(&values, RANGE_HIGH_PERCENTILE),
        )
    } else {
        let mut pairs: Vec<(i64, f64)> = samples
            .iter()
            .map(|s| (s.amount.minor(), s.weight))
            .collect();
        pairs.sort_unstable_by_key(|(v, _)| *v);
        (
            stats::weighted_percentile(&pairs, RANGE_LOW_PERCENTILE),
            stats::weighted_median(&pairs),
            stats::weighted_percentile(&pairs, RANGE_HIGH_PERCENTILE),
        )
    };

    let point = Amount::from_minor_f64(point.unwrap_or(0.0));
    if samples.len() < 2 {
        return (point, point, point);
    }
    let low = Amount::from_minor_f64(low.unwrap_or(0.0)).min(point);
    let high = Amount::from_minor_f64(high.unwrap_or(0.0)).max(point);
    (low, point, high)
}
