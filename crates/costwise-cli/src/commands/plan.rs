use clap::Args;
use costwise_estimate::PersonaResolver;

use super::{to_json, SharedArgs};

#[derive(Args)]
pub struct PlanArgs {
    #[arg(long)]
    pub housing: String,
    #[arg(long)]
    pub lifestyle: String,
    #[arg(long)]
    pub transport: String,
}

pub fn run(shared: &SharedArgs, args: &PlanArgs) -> anyhow::Result<String> {
    let config = shared.load_config()?;
    let resolver = PersonaResolver::new(config.persona_category_map);
    let resolved = resolver.resolve_raw(&args.housing, &args.lifestyle, &args.transport)?;
    to_json(&resolved)
}
