pub mod coverage;
pub mod estimate;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use costwise_core::errors::{ConfigError, DataAccessError, ErrorKind, EstimationError};
use costwise_core::EstimatorConfig;
use costwise_storage::InMemoryCostStore;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "costwise")]
#[command(about = "Persona-conditioned cost-of-living estimates from observed prices.")]
pub struct CommandLine {
    #[command(flatten)]
    pub shared: SharedArgs,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct SharedArgs {
    /// Engine configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Evaluation time (RFC 3339). Defaults to now.
    #[arg(long, global = true)]
    pub as_of: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Estimate monthly costs for a persona in a region
    #[command(alias = "e")]
    Estimate(estimate::EstimateArgs),
    /// Report data coverage and freshness for a region
    #[command(alias = "c")]
    Coverage(coverage::CoverageArgs),
    /// Show the categories and sub-categories a persona resolves to
    #[command(alias = "p")]
    Plan(plan::PlanArgs),
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl SharedArgs {
    pub fn load_config(&self) -> anyhow::Result<EstimatorConfig> {
        match &self.config {
            Some(path) => EstimatorConfig::from_file(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(EstimatorConfig::default()),
        }
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of.unwrap_or_else(Utc::now)
    }
}

/// Load a JSON array of data points ingested now. Points newer than a
/// past `--as-of` are kept; windows and coverage exclude them.
pub fn load_store(path: &Path) -> anyhow::Result<InMemoryCostStore> {
    let store = InMemoryCostStore::new();
    let loaded = store
        .load_json_file(path, Utc::now())
        .with_context(|| format!("loading data points from {}", path.display()))?;
    tracing::info!(loaded, path = %path.display(), "data points loaded");
    Ok(store)
}

pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("serializing result")
}

/// One line naming the error class, then the error chain.
pub fn render_error(err: &anyhow::Error) -> String {
    let kind = if let Some(e) = err.downcast_ref::<EstimationError>() {
        Some(e.kind())
    } else if let Some(e) = err.downcast_ref::<DataAccessError>() {
        Some(e.kind())
    } else if err.downcast_ref::<ConfigError>().is_some() {
        Some(ErrorKind::ServiceImpaired)
    } else {
        None
    };
    match kind {
        Some(kind) => format!("{kind:?}: {err:#}"),
        None => format!("Error: {err:#}"),
    }
}
