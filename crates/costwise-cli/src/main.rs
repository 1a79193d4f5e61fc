mod commands;

use std::process::ExitCode;

use commands::{CommandLine, Commands};

fn main() -> ExitCode {
    let cli = CommandLine::parse_args();
    costwise_observability::init_tracing();

    let outcome = match &cli.command {
        Commands::Estimate(args) => commands::estimate::run(&cli.shared, args),
        Commands::Coverage(args) => commands::coverage::run(&cli.shared, args),
        Commands::Plan(args) => commands::plan::run(&cli.shared, args),
    };

    match outcome {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}", commands::render_error(&err));
            ExitCode::FAILURE
        }
    }
}
