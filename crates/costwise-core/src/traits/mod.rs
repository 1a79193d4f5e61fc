mod cancellation;
mod cost_data;

pub use cancellation::CancellationToken;
pub use cost_data::{CostQuery, ICostDataPort};
