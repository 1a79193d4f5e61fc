use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::DAYS_PER_MONTH;

/// Trailing observation window ending at `as_of`.
///
/// `as_of` comes from the caller so repeated estimates over unchanged data
/// are identical. `lookback_days = None` means no lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub as_of: DateTime<Utc>,
    pub lookback_days: Option<u32>,
}

impl ObservationWindow {
    pub fn trailing_days(as_of: DateTime<Utc>, days: u32) -> Self {
        Self {
            as_of,
            lookback_days: Some(days),
        }
    }

    pub fn trailing_months(as_of: DateTime<Utc>, months: u32) -> Self {
        Self::trailing_days(as_of, months.saturating_mul(DAYS_PER_MONTH))
    }

    /// Everything recorded up to `as_of`.
    pub fn unbounded(as_of: DateTime<Utc>) -> Self {
        Self {
            as_of,
            lookback_days: None,
        }
    }

    /// Lower bound of the window. A lookback reaching past the representable
    /// date range has no lower bound.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        let days = self.lookback_days?;
        TimeDelta::try_days(i64::from(days)).and_then(|span| self.as_of.checked_sub_signed(span))
    }

    /// Inclusive on both ends.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts <= self.as_of && self.start().map_or(true, |start| ts >= start)
    }

    /// Age of `ts` in fractional days relative to `as_of`, never negative.
    pub fn age_days(&self, ts: DateTime<Utc>) -> f64 {
        self.as_of.signed_duration_since(ts).num_seconds().max(0) as f64 / 86_400.0
    }
}
