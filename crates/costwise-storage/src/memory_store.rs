//! In-memory cost data store behind a `RwLock` (many concurrent readers).

use std::collections::HashSet;
use std::path::Path;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use costwise_core::{Category, CostDataPoint, CostQuery, DataAccessError, ICostDataPort};
use tracing::debug;

/// Thread-safe in-memory store enforcing the data point invariants on insert.
#[derive(Debug, Default)]
pub struct InMemoryCostStore {
    points: RwLock<Vec<CostDataPoint>>,
}

impl InMemoryCostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a point ingested now.
    pub fn insert(&self, point: CostDataPoint) -> Result<(), DataAccessError> {
        self.insert_at(point, Utc::now())
    }

    /// Insert a point ingested at `ingested_at`. Rejects negative amounts,
    /// future timestamps, and duplicate `(id, recorded_at)` keys.
    pub fn insert_at(&self, point: CostDataPoint, ingested_at: DateTime<Utc>) -> Result<(), DataAccessError> {
        point.validate(ingested_at)?;
        let mut points = self.points.write().map_err(|e| lock_err(&e.to_string()))?;
        if points.iter().any(|p| p.key() == point.key()) {
            return Err(DataAccessError::DuplicateKey {
                id: point.id.clone(),
                recorded_at: point.recorded_at.to_rfc3339(),
            });
        }
        points.push(point);
        Ok(())
    }

    /// Insert many points atomically: either all are stored or none are.
    pub fn insert_bulk(
        &self,
        batch: Vec<CostDataPoint>,
        ingested_at: DateTime<Utc>,
    ) -> Result<usize, DataAccessError> {
        let mut points = self.points.write().map_err(|e| lock_err(&e.to_string()))?;
        let mut keys: HashSet<(String, DateTime<Utc>)> = points
            .iter()
            .map(|p| (p.id.clone(), p.recorded_at))
            .collect();

        for point in &batch {
            point.validate(ingested_at)?;
            if !keys.insert((point.id.clone(), point.recorded_at)) {
                return Err(DataAccessError::DuplicateKey {
                    id: point.id.clone(),
                    recorded_at: point.recorded_at.to_rfc3339(),
                });
            }
        }

        let count = batch.len();
        points.extend(batch);
        debug!(inserted = count, total = points.len(), "bulk insert");
        Ok(count)
    }

    /// Load a JSON array of data points.
    pub fn load_json(&self, json: &str, ingested_at: DateTime<Utc>) -> Result<usize, DataAccessError> {
        let batch: Vec<CostDataPoint> =
            serde_json::from_str(json).map_err(|e| DataAccessError::Backend {
                message: format!("invalid data point JSON: {e}"),
            })?;
        self.insert_bulk(batch, ingested_at)
    }

    pub fn load_json_file(&self, path: &Path, ingested_at: DateTime<Utc>) -> Result<usize, DataAccessError> {
        let raw = std::fs::read_to_string(path).map_err(|e| DataAccessError::Connectivity {
            message: format!("{}: {e}", path.display()),
        })?;
        self.load_json(&raw, ingested_at)
    }

    /// Administrative delete by composite key. Returns whether a point was removed.
    pub fn remove(&self, id: &str, recorded_at: DateTime<Utc>) -> Result<bool, DataAccessError> {
        let mut points = self.points.write().map_err(|e| lock_err(&e.to_string()))?;
        let before = points.len();
        points.retain(|p| p.key() != (id, recorded_at));
        Ok(points.len() != before)
    }

    pub fn len(&self) -> Result<usize, DataAccessError> {
        let points = self.points.read().map_err(|e| lock_err(&e.to_string()))?;
        Ok(points.len())
    }

    pub fn is_empty(&self) -> Result<bool, DataAccessError> {
        Ok(self.len()? == 0)
    }
}

impl ICostDataPort for InMemoryCostStore {
    fn query(&self, query: &CostQuery) -> Result<Vec<CostDataPoint>, DataAccessError> {
        let points = self.points.read().map_err(|e| lock_err(&e.to_string()))?;
        Ok(points.iter().filter(|p| query.matches(p)).cloned().collect())
    }

    fn latest_timestamp(
        &self,
        region: &str,
        category: &Category,
        as_of: DateTime<Utc>,
    ) -> Result<Option<DateTime<Utc>>, DataAccessError> {
        let points = self.points.read().map_err(|e| lock_err(&e.to_string()))?;
        Ok(points
            .iter()
            .filter(|p| {
                p.region.eq_ignore_ascii_case(region) && &p.category == category && p.recorded_at <= as_of
            })
            .map(|p| p.recorded_at)
            .max())
    }
}

fn lock_err(message: &str) -> DataAccessError {
    DataAccessError::Backend {
        message: format!("store lock poisoned: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn poisoned_lock_is_reported_not_hidden() {
        let store = Arc::new(InMemoryCostStore::new());
        let writer = Arc::clone(&store);
        let _ = thread::spawn(move || {
            let _guard = writer.points.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        assert!(matches!(store.len(), Err(DataAccessError::Backend { .. })));
        assert!(store.is_empty().is_err());
    }
}
