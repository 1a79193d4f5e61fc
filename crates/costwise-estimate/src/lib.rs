//! # costwise-estimate
//!
//! The estimation engine: persona resolution, per-category aggregation with
//! confidence scoring, the parallel orchestrator, and regional coverage summaries.

pub mod aggregator;
pub mod confidence;
pub mod coverage;
pub mod engine;
pub mod persona;
pub mod stats;

pub use aggregator::{CategoryAggregator, WeightedSample};
pub use costwise_core::CancellationToken;
pub use confidence::{ConfidenceBreakdown, ConfidencePolicy};
pub use coverage::CoverageSummarizer;
pub use engine::EstimationEngine;
pub use persona::{CategoryPlan, PersonaResolver, ResolvedPersona};
