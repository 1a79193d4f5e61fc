use std::path::PathBuf;

use clap::Args;
use costwise_core::ObservationWindow;
use costwise_estimate::EstimationEngine;

use super::{load_store, to_json, SharedArgs};

#[derive(Args)]
pub struct EstimateArgs {
    /// JSON array of cost data points
    #[arg(long)]
    pub data: PathBuf,
    #[arg(long)]
    pub region: String,
    /// studio | 1br | 2br | 3br | villa
    #[arg(long)]
    pub housing: String,
    /// budget | standard | premium
    #[arg(long)]
    pub lifestyle: String,
    /// public | car | rideshare
    #[arg(long)]
    pub transport: String,
    /// Trailing window length; omit to use every observation up to --as-of
    #[arg(long)]
    pub lookback_days: Option<u32>,
}

pub fn run(shared: &SharedArgs, args: &EstimateArgs) -> anyhow::Result<String> {
    let config = shared.load_config()?;
    let as_of = shared.as_of();
    let store = load_store(&args.data)?;
    let engine = EstimationEngine::new(&store, config)?;
    let window = match args.lookback_days {
        Some(days) => ObservationWindow::trailing_days(as_of, days),
        None => ObservationWindow::unbounded(as_of),
    };

    let result = engine.estimate_raw(
        &args.region,
        &args.housing,
        &args.lifestyle,
        &args.transport,
        window,
    )?;
    to_json(&result)
}
