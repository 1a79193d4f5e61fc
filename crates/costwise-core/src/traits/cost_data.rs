use chrono::{DateTime, Utc};

use super::CancellationToken;
use crate::errors::DataAccessError;
use crate::models::{Category, CostDataPoint, ObservationWindow};

/// Filter for one port query.
///
/// An empty `sub_categories` list matches every sub-category.
#[derive(Debug, Clone, PartialEq)]
pub struct CostQuery {
    pub region: String,
    pub category: Category,
    pub sub_categories: Vec<String>,
    pub window: ObservationWindow,
}

impl CostQuery {
    pub fn new(region: impl Into<String>, category: Category, window: ObservationWindow) -> Self {
        Self {
            region: region.into(),
            category,
            sub_categories: Vec::new(),
            window,
        }
    }

    pub fn with_sub_categories(mut self, sub_categories: Vec<String>) -> Self {
        self.sub_categories = sub_categories;
        self
    }

    /// Whether `point` satisfies every filter of this query.
    /// Region and sub-category comparisons ignore ASCII case.
    pub fn matches(&self, point: &CostDataPoint) -> bool {
        point.region.eq_ignore_ascii_case(&self.region)
            && point.category == self.category
            && self.window.contains(point.recorded_at)
            && (self.sub_categories.is_empty()
                || self
                    .sub_categories
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(&point.sub_category)))
    }
}

/// Read-only query capability over stored cost data points.
///
/// Implementations must be safe for concurrent use by multiple in-flight
/// queries. "No matching rows" is `Ok(vec![])` / `Ok(None)`, never an error.
///
/// Cancellation is cooperative. The engine checks its token before and after
/// each call, so a request cannot finish sooner than the port call it is
/// waiting on. Ports with long-running queries should override
/// [`query_cancellable`](Self::query_cancellable) and return early once the
/// token fires.
pub trait ICostDataPort: Send + Sync {
    /// Data points matching region, category, sub-categories, and window.
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError>;

    /// `query` for a request that may be cancelled mid-flight. After `cancel`
    /// fires the caller discards the result, so an implementation may return
    /// whatever it has (typically `Ok(vec![])`). Defaults to `query`.
    fn query_cancellable(
        &self,
        query: &CostQuery,
        _cancel: &CancellationToken,
    ) -> Result<Vec<CostDataPoint>, DataAccessError> {
        self.query(query)
    }

    /// Timestamp of the freshest point for `(region, category)` recorded no later than `as_of`.
    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError>;
}

impl<T: ICostDataPort + ?Sized> ICostDataPort for std::sync::Arc<T> {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        (**self).query(query)
    }

    fn query_cancellable(
        &self,
        query: &CostQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<CostDataPoint>, DataAccessError> {
        (**self).query_cancellable(query, cancel)
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        (**self).latest_timestamp(region, category, as_of)
    }
}
