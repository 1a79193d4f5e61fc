use std::path::PathBuf;

use clap::Args;
use costwise_estimate::CoverageSummarizer;

use super::{load_store, to_json, SharedArgs};

#[derive(Args)]
pub struct CoverageArgs {
    /// JSON array of cost data points
    #[arg(long)]
    pub data: PathBuf,
    #[arg(long)]
    pub region: String,
}

pub fn run(shared: &SharedArgs, args: &CoverageArgs) -> anyhow::Result<String> {
    let config = shared.load_config()?;
    let as_of = shared.as_of();
    let store = load_store(&args.data)?;

    let summary = CoverageSummarizer::new(&store, &config).summarize(&args.region, as_of)?;
    to_json(&summary)
}
