/// Costwise engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Minor currency units per major unit (fils per dirham, cents per dollar).
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Largest amount a single data point may carry (10^13 major units).
pub const MAX_POINT_AMOUNT_MINOR: i64 = 1_000_000_000_000_000;

/// Length of a "month" when a window is expressed in trailing months.
pub const DAYS_PER_MONTH: u32 = 30;

/// Steepness of the sample-count confidence curve.
/// At n = saturation / 4 the base factor is ~0.72.
pub const CONFIDENCE_CURVE_STEEPNESS: f64 = 5.0;

/// Lower percentile used for the estimate range.
pub const RANGE_LOW_PERCENTILE: f64 = 0.25;

/// Upper percentile used for the estimate range.
pub const RANGE_HIGH_PERCENTILE: f64 = 0.75;
