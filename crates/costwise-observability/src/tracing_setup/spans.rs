//! Span definitions per operation: estimate, aggregate, coverage.

/// Create an estimate span.
#[macro_export]
macro_rules! estimate_span {
    ($region:expr, $persona:expr) => {
        tracing::info_span!("costwise.estimate", region = %$region, persona = %$persona)
    };
}

/// Create a per-category aggregation span.
#[macro_export]
macro_rules! aggregate_span {
    ($region:expr, $category:expr) => {
        tracing::debug_span!("costwise.aggregate", region = %$region, category = %$category)
    };
}

/// Create a coverage span.
#[macro_export]
macro_rules! coverage_span {
    ($region:expr) => {
        tracing::info_span!("costwise.coverage", region = %$region)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ESTIMATE: &str = "costwise.estimate";
    pub const AGGREGATE: &str = "costwise.aggregate";
    pub const COVERAGE: &str = "costwise.coverage";
}
