//! Coverage Summarizer: per-category sample counts, freshness, and gaps for a region.

use chrono::{DateTime, Utc};
use costwise_core::errors::{CostwiseResult, EstimationError};
use costwise_core::{
    CancellationToken, CategoryCoverage, CostQuery, CoverageSummary, EstimatorConfig, Freshness,
    ICostDataPort, ObservationWindow,
};
use tracing::debug;

/// Reports data coverage for every known category, independent of any persona.
pub struct CoverageSummarizer<'a> {
    port: &'a dyn ICostDataPort,
    config: &'a EstimatorConfig,
}

impl<'a> CoverageSummarizer<'a> {
    pub fn new(port: &'a dyn ICostDataPort, config: &'a EstimatorConfig) -> Self {
        Self { port, config }
    }

    pub fn summarize(&self, region: &str, as_of: DateTime<Utc>) -> CostwiseResult<CoverageSummary> {
        self.summarize_with_cancel(region, as_of, &CancellationToken::new())
    }

    pub fn summarize_with_cancel(
        &self,
        region: &str,
        as_of: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> CostwiseResult<CoverageSummary> {
        let region = self
            .config
            .supported_region(region)
            .ok_or_else(|| EstimationError::RegionNotSupported {
                region: region.to_string(),
            })?;
        let _span = costwise_observability::coverage_span!(region).entered();

        let window = ObservationWindow::unbounded(as_of);
        let known = self.config.persona_category_map.known_categories();
        let mut categories = Vec::with_capacity(known.len());

        for category in known {
            if cancel.is_cancelled() {
                return Err(EstimationError::Cancelled);
            }

            let query = CostQuery::new(region, category.clone(), window);
            let points = self.port.query_cancellable(&query, cancel)?;
            if cancel.is_cancelled() {
                return Err(EstimationError::Cancelled);
            }
            let sample_count = points.iter().filter(|p| query.matches(p)).count();

            let freshest = if sample_count == 0 {
                None
            } else {
                // Fall back to the rows themselves if the port has no timestamp index.
                self.port
                    .latest_timestamp(region, &category, as_of)?
                    .or_else(|| {
                        points
                            .iter()
                            .filter(|p| query.matches(p))
                            .map(|p| p.recorded_at)
                            .max()
                    })
            };

            let age = freshest.map(|ts| window.age_days(ts));
            let freshness = match age {
                Some(days) => Freshness::classify(days, self.config.fresh_days, self.config.stale_days),
                None => Freshness::NoData,
            };

            let gap = sample_count == 0;
            if gap {
                costwise_observability::events::coverage_gap_detected(region, category.as_str());
            }
            debug!(category = %category, sample_count, ?freshness, "category coverage");

            categories.push(CategoryCoverage {
                category,
                sample_count,
                freshest_recorded_at: freshest,
                freshest_age_days: age,
                freshness,
                gap,
            });
        }

        let freshness = categories
            .iter()
            .filter(|c| !c.gap)
            .map(|c| c.freshness)
            .max()
            .unwrap_or(Freshness::NoData);
        let gap_count = categories.iter().filter(|c| c.gap).count();

        Ok(CoverageSummary {
            region: region.to_string(),
            as_of,
            categories,
            freshness,
            gap_count,
        })
    }
}
