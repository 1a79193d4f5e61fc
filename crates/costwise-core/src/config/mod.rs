pub mod defaults;
mod estimator_config;
mod persona_map;

pub use estimator_config::EstimatorConfig;
pub use persona_map::{CategoryRule, CategoryVariant, PersonaCategoryMap, SubCategoryFilter};
