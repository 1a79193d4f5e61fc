//! # costwise-core
//!
//! Foundation crate for the Costwise cost-of-living engine.
//! Defines the data model, the Data Access Port trait, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::{EstimatorConfig, PersonaCategoryMap};
pub use errors::{CostwiseResult, DataAccessError, ErrorKind, EstimationError};
pub use models::{
    Amount, Category, CategoryCoverage, CategoryEstimate, Confidence, CostDataPoint,
    CoverageSummary, EstimateResult, Freshness, HousingType, LifestyleTier, ObservationWindow,
    PersonaInput, TransportMode,
};
pub use traits::{CancellationToken, CostQuery, ICostDataPort};
