mod amount;
mod category;
mod confidence;
mod cost_data_point;
mod coverage;
mod estimate;
mod freshness;
mod persona;
mod window;

pub use amount::Amount;
pub use category::Category;
pub use confidence::Confidence;
pub use cost_data_point::{CostDataPoint, PointMetadata};
pub use coverage::{CategoryCoverage, CoverageSummary};
pub use estimate::{CategoryEstimate, EstimateResult};
pub use freshness::Freshness;
pub use persona::{HousingType, LifestyleTier, PersonaDimension, PersonaInput, TransportMode};
pub use window::ObservationWindow;
