//! Retry policy for transient port failures.
//!
//! The engine never retries; wrapping a port in [`RetryingPort`] is how a
//! deployment opts into retries for `Timeout` and `Connectivity` failures.

use std::time::Duration;

use chrono::{DateTime, Utc};
use costwise_core::{
    CancellationToken, Category, CostDataPoint, CostQuery, DataAccessError, ICostDataPort,
};

/// Bounded fixed-backoff retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. 0 is treated as 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

/// Decorator retrying transient failures of an inner port.
pub struct RetryingPort<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: ICostDataPort> RetryingPort<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn run<T>(
        &self,
        operation: &str,
        cancel: Option<&CancellationToken>,
        mut f: impl FnMut(&P) -> Result<T, DataAccessError>,
    ) -> Result<T, DataAccessError> {
        let max = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match f(&self.inner) {
                Err(err)
                    if err.is_transient()
                        && attempt < max
                        && !cancel.is_some_and(CancellationToken::is_cancelled) =>
                {
                    costwise_observability::events::retry_attempted(
                        operation,
                        attempt,
                        max,
                        &err.to_string(),
                    );
                    if !self.policy.backoff.is_zero() {
                        std::thread::sleep(self.policy.backoff);
                    }
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl<P: ICostDataPort> ICostDataPort for RetryingPort<P> {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        self.run("query", None, |port| port.query(query))
    }

    fn query_cancellable(
        &self,
        query: &CostQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<CostDataPoint>, DataAccessError> {
        self.run("query", Some(cancel), |port| port.query_cancellable(query, cancel))
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        self.run("latest_timestamp", None, |port| port.latest_timestamp(region, category, as_of))
    }
}
