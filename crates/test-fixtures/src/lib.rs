//! Shared fixtures for Costwise tests: point builders, golden datasets, and
//! instrumented ports (counting, failing, slow).

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use costwise_core::{
    Amount, CancellationToken, Category, CostDataPoint, CostQuery, DataAccessError, ICostDataPort,
};
use serde::de::DeserializeOwned;

/// Fixed evaluation time used by every golden scenario.
pub fn as_of() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
}

/// Build a data point recorded `days_ago` days before [`as_of`].
pub fn point(
    id: &str,
    region: &str,
    category: &str,
    sub_category: &str,
    major: i64,
    days_ago: i64,
) -> CostDataPoint {
    CostDataPoint {
        id: id.to_string(),
        recorded_at: as_of() - ChronoDuration::days(days_ago),
        category: Category::new(category),
        sub_category: sub_category.to_string(),
        region: region.to_string(),
        amount: Amount::from_major(major),
        metadata: None,
    }
}

/// The five Dubai 1BR rent listings from the reference scenario.
pub fn dubai_1br_rent() -> Vec<CostDataPoint> {
    [3000, 3200, 3100, 3050, 3400]
        .iter()
        .enumerate()
        .map(|(i, &amount)| point(&format!("rent-{i}"), "Dubai", "housing", "1br_rent", amount, 3 + i as i64))
        .collect()
}

fn data_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Absolute path to a fixture file under `data/`.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    data_root().join(relative_path)
}

/// Raw contents of a fixture file.
///
/// # Panics
/// Panics if the file doesn't exist.
pub fn load_fixture_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture_text(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {relative_path}: {e}"))
}

/// The golden multi-category dataset (Dubai + Abu Dhabi, no Dubai entertainment).
pub fn golden_points() -> Vec<CostDataPoint> {
    load_fixture("golden_points.json")
}

/// Port over a plain vector, filtering exactly like the contract requires.
#[derive(Debug, Default)]
pub struct VecPort {
    pub points: Vec<CostDataPoint>,
}

impl VecPort {
    pub fn new(points: Vec<CostDataPoint>) -> Self {
        Self { points }
    }
}

impl ICostDataPort for VecPort {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        Ok(self.points.iter().filter(|p| query.matches(p)).cloned().collect())
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        Ok(self
            .points
            .iter()
            .filter(|p| p.region.eq_ignore_ascii_case(region) && &p.category == category && p.recorded_at <= as_of)
            .map(|p| p.recorded_at)
            .max())
    }
}

/// Wraps a port and counts every call.
#[derive(Debug)]
pub struct CountingPort<P> {
    pub inner: P,
    queries: AtomicUsize,
    latest_calls: AtomicUsize,
}

impl<P> CountingPort<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
            latest_calls: AtomicUsize::new(0),
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.query_count() + self.latest_calls.load(Ordering::SeqCst)
    }
}

impl<P: ICostDataPort> ICostDataPort for CountingPort<P> {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.inner.query(query)
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        self.latest_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.latest_timestamp(region, category, as_of)
    }
}

/// Fails queries for one category (or all, when `category` is `None`)
/// with a scripted sequence of errors, then delegates.
pub struct FailingPort<P> {
    pub inner: P,
    category: Option<Category>,
    script: Mutex<Vec<DataAccessError>>,
    always: Option<DataAccessError>,
}

impl<P> FailingPort<P> {
    /// Fail every matching query with `error`.
    pub fn always(inner: P, category: Option<&str>, error: DataAccessError) -> Self {
        Self {
            inner,
            category: category.map(Category::new),
            script: Mutex::new(Vec::new()),
            always: Some(error),
        }
    }

    /// Fail the next matching queries with `errors` in order, then succeed.
    pub fn scripted(inner: P, category: Option<&str>, mut errors: Vec<DataAccessError>) -> Self {
        errors.reverse();
        Self {
            inner,
            category: category.map(Category::new),
            script: Mutex::new(errors),
            always: None,
        }
    }

    fn next_error(&self, category: &Category) -> Option<DataAccessError> {
        if self.category.as_ref().is_some_and(|c| c != category) {
            return None;
        }
        if let Some(err) = &self.always {
            return Some(err.clone());
        }
        self.script.lock().ok().and_then(|mut s| s.pop())
    }
}

impl<P: ICostDataPort> ICostDataPort for FailingPort<P> {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        match self.next_error(&query.category) {
            Some(err) => Err(err),
            None => self.inner.query(query),
        }
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        match self.next_error(category) {
            Some(err) => Err(err),
            None => self.inner.latest_timestamp(region, category, as_of),
        }
    }
}

/// Sleeps before every query, to give cancellation something to interrupt.
/// The cancellable query wakes every few milliseconds and gives up once the
/// token fires.
pub struct SlowPort<P> {
    pub inner: P,
    pub delay: Duration,
}

impl<P: ICostDataPort> ICostDataPort for SlowPort<P> {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        std::thread::sleep(self.delay);
        self.inner.query(query)
    }

    fn query_cancellable(
        &self,
        query: &CostQuery,
        cancel: &CancellationToken,
    ) -> Result<Vec<CostDataPoint>, DataAccessError> {
        let deadline = Instant::now() + self.delay;
        while Instant::now() < deadline {
            if cancel.is_cancelled() {
                return Ok(Vec::new());
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.inner.query(query)
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        self.inner.latest_timestamp(region, category, as_of)
    }
}
