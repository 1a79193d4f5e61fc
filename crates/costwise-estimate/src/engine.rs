//! EstimationEngine: validates the request, fans out one aggregation per
//! resolved category, and combines the results.
//!
//! Fan-out runs on rayon and is joined before `estimate` returns. The first
//! failing branch cancels its siblings; no partial breakdown is ever returned.

use chrono::{DateTime, Utc};
use costwise_core::errors::{ConfigError, CostwiseResult, EstimationError};
use costwise_core::{
    Amount, CancellationToken, CategoryEstimate, Confidence, CoverageSummary, EstimateResult, EstimatorConfig,
    ICostDataPort, ObservationWindow, PersonaInput,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::aggregator::CategoryAggregator;
use crate::confidence::ConfidencePolicy;
use crate::coverage::CoverageSummarizer;
use crate::persona::{PersonaResolver, ResolvedPersona};

/// The estimation orchestrator.
pub struct EstimationEngine<'a> {
    port: &'a dyn ICostDataPort,
    config: EstimatorConfig,
    resolver: PersonaResolver,
    aggregator: CategoryAggregator,
    /// Dedicated bounded pool when `worker_threads > 0`.
    pool: Option<rayon::ThreadPool>,
}

impl<'a> EstimationEngine<'a> {
    /// Validate `config` and build the engine around a port.
    pub fn new(port: &'a dyn ICostDataPort, config: EstimatorConfig) -> CostwiseResult<Self> {
        config.validate()?;

        let pool = if config.worker_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.worker_threads)
                .thread_name(|i| format!("costwise-worker-{i}"))
                .build()
                .map_err(|e| ConfigError::Invalid {
                    field: "worker_threads".to_string(),
                    reason: e.to_string(),
                })?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            port,
            resolver: PersonaResolver::new(config.persona_category_map.clone()),
            aggregator: CategoryAggregator::new(ConfidencePolicy::from_config(&config)),
            config,
            pool,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PersonaResolver {
        &self.resolver
    }

    pub fn estimate(
        &self,
        region: &str,
        persona: &PersonaInput,
        window: ObservationWindow,
    ) -> CostwiseResult<EstimateResult> {
        self.estimate_with_cancel(region, persona, window, &CancellationToken::new())
    }

    /// Estimate from raw persona strings. Region and persona are both
    /// validated before the port is touched.
    pub fn estimate_raw(
        &self,
        region: &str,
        housing: &str,
        lifestyle: &str,
        transport: &str,
        window: ObservationWindow,
    ) -> CostwiseResult<EstimateResult> {
        self.check_region(region)?;
        let persona = PersonaInput::parse(housing, lifestyle, transport)?;
        self.estimate(region, &persona, window)
    }

    pub fn estimate_with_cancel(
        &self,
        region: &str,
        persona: &PersonaInput,
        window: ObservationWindow,
        cancel: &CancellationToken,
    ) -> CostwiseResult<EstimateResult> {
        let region = self.check_region(region)?.to_string();
        let _span = costwise_observability::estimate_span!(region, persona).entered();

        let resolved = self.resolver.resolve(persona);
        debug!(categories = resolved.plans.len(), "persona resolved");

        let categories = self.fan_out(&region, &resolved, &window, cancel)?;
        let result = combine(region, &resolved, window, categories);

        costwise_observability::events::estimate_completed(
            &result.region,
            result.categories.len(),
            result.categories_without_data().count(),
            result.overall_confidence.value(),
        );
        Ok(result)
    }

    /// Coverage summary over the same port and configuration.
    pub fn coverage(
        &self,
        region: &str,
        as_of: DateTime<Utc>,
    ) -> CostwiseResult<CoverageSummary> {
        CoverageSummarizer::new(self.port, &self.config).summarize(region, as_of)
    }

    fn check_region(&self, region: &str) -> CostwiseResult<&str> {
        self.config
            .supported_region(region)
            .ok_or_else(|| EstimationError::RegionNotSupported {
                region: region.to_string(),
            })
    }

    /// One aggregation per plan, in parallel, joined before returning.
    fn fan_out(
        &self,
        region: &str,
        resolved: &ResolvedPersona,
        window: &ObservationWindow,
        cancel: &CancellationToken,
    ) -> CostwiseResult<Vec<CategoryEstimate>> {
        let branch_cancel = cancel.child();

        let run = || -> Vec<CostwiseResult<CategoryEstimate>> {
            resolved
                .plans
                .par_iter()
                .map(|plan| {
                    let result =
                        self.aggregator
                            .aggregate(self.port, region, plan, window, &branch_cancel);
                    if let Err(err) = &result {
                        if !matches!(err, EstimationError::Cancelled) {
                            branch_cancel.cancel();
                        }
                    }
                    result
                })
                .collect()
        };

        let results = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        if cancel.is_cancelled() {
            info!(region, "estimate cancelled by caller");
            return Err(EstimationError::Cancelled);
        }

        // Sibling branches stopped by the first failure report `Cancelled`;
        // surface the failure that caused it.
        let mut first_cancelled = None;
        let mut estimates = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(estimate) => estimates.push(estimate),
                Err(EstimationError::Cancelled) => {
                    first_cancelled.get_or_insert(EstimationError::Cancelled);
                }
                Err(err) => {
                    if let EstimationError::DataAccess(inner) = &err {
                        costwise_observability::events::data_access_failed(
                            region,
                            &inner.to_string(),
                        );
                    }
                    return Err(err);
                }
            }
        }
        match first_cancelled {
            Some(err) => Err(err),
            None => Ok(estimates),
        }
    }
}

/// Sum the ranges and weight-average the confidences.
fn combine(
    region: String,
    resolved: &ResolvedPersona,
    window: ObservationWindow,
    categories: Vec<CategoryEstimate>,
) -> EstimateResult {
    let total_low: Amount = categories.iter().map(|c| c.low).sum();
    let total_high: Amount = categories.iter().map(|c| c.high).sum();

    let total_weight = resolved.total_weight();
    let overall = if total_weight > 0.0 {
        resolved
            .plans
            .iter()
            .zip(&categories)
            .map(|(plan, est)| plan.weight * est.confidence.value())
            .sum::<f64>()
            / total_weight
    } else {
        0.0
    };

    EstimateResult {
        region,
        persona: resolved.persona,
        window,
        categories,
        total_low,
        total_high,
        overall_confidence: Confidence::new(overall),
    }
}
