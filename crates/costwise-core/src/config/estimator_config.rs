use std::path::Path;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::PersonaCategoryMap;
use crate::errors::ConfigError;

/// Immutable engine configuration, built once at startup and injected into
/// the engines at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Regions the engine will answer for. Matching ignores ASCII case.
    pub region_allowlist: Vec<String>,
    /// Samples at most this old get full recency credit.
    pub fresh_days: u32,
    /// Samples at least this old get only `recency_floor` credit.
    pub stale_days: u32,
    /// Minimum recency factor for stale data.
    pub recency_floor: f64,
    /// Sample count at which the size factor reaches 1.0.
    pub confidence_saturation_n: u32,
    /// Fan-out worker threads per engine. 0 uses the global rayon pool.
    pub worker_threads: usize,
    pub persona_category_map: PersonaCategoryMap,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            region_allowlist: defaults::DEFAULT_REGION_ALLOWLIST
                .iter()
                .map(|r| r.to_string())
                .collect(),
            fresh_days: defaults::DEFAULT_FRESH_DAYS,
            stale_days: defaults::DEFAULT_STALE_DAYS,
            recency_floor: defaults::DEFAULT_RECENCY_FLOOR,
            confidence_saturation_n: defaults::DEFAULT_CONFIDENCE_SATURATION_N,
            worker_threads: defaults::DEFAULT_WORKER_THREADS,
            persona_category_map: PersonaCategoryMap::default(),
        }
    }
}

impl EstimatorConfig {
    /// Parse and validate a TOML document. Missing fields take defaults.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.region_allowlist.is_empty() {
            return Err(invalid("region_allowlist", "must name at least one region"));
        }
        if self.region_allowlist.iter().any(|r| r.trim().is_empty()) {
            return Err(invalid("region_allowlist", "region names must be non-empty"));
        }
        if self.fresh_days > self.stale_days {
            return Err(invalid(
                "fresh_days",
                &format!(
                    "fresh_days ({}) must not exceed stale_days ({})",
                    self.fresh_days, self.stale_days
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.recency_floor) {
            return Err(invalid("recency_floor", "must be within [0.0, 1.0]"));
        }
        if self.confidence_saturation_n == 0 {
            return Err(invalid("confidence_saturation_n", "must be at least 1"));
        }
        self.persona_category_map.validate()
    }

    /// Canonical allow-list spelling of `region`, if supported.
    pub fn supported_region(&self, region: &str) -> Option<&str> {
        let wanted = region.trim();
        self.region_allowlist
            .iter()
            .find(|r| r.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
