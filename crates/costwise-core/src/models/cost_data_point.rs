use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, Category};
use crate::constants::MAX_POINT_AMOUNT_MINOR;
use crate::errors::DataAccessError;

/// An observed price sample. `(id, recorded_at)` is the composite key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostDataPoint {
    pub id: String,
    pub recorded_at: DateTime<Utc>,
    pub category: Category,
    #[serde(default)]
    pub sub_category: String,
    pub region: String,
    pub amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PointMetadata>,
}

/// Optional provenance attached by the ingestion side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointMetadata {
    pub source: Option<String>,
    pub unit: Option<String>,
}

impl CostDataPoint {
    /// Composite key.
    pub fn key(&self) -> (&str, DateTime<Utc>) {
        (&self.id, self.recorded_at)
    }

    /// Check the per-point invariants against the ingestion time.
    pub fn validate(&self, ingested_at: DateTime<Utc>) -> Result<(), DataAccessError> {
        if self.amount.is_negative() {
            return Err(self.invalid(format!("negative amount {}", self.amount)));
        }
        if self.amount.minor() > MAX_POINT_AMOUNT_MINOR {
            return Err(self.invalid(format!("amount {} exceeds the supported maximum", self.amount)));
        }
        if self.recorded_at > ingested_at {
            return Err(self.invalid(format!(
                "recorded_at {} is after ingestion time {}",
                self.recorded_at, ingested_at
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> DataAccessError {
        DataAccessError::InvalidPoint {
            id: self.id.clone(),
            reason,
        }
    }
}
