//! calc-probe: run the calculator suite from the command line
//!
//! ## Usage
//!
//! ```bash
//! calc-probe run                              # Full suite in headless Chromium
//! calc-probe run -g infinity --fail-fast      # One group, stop at first failure
//! calc-probe run --driver model --format json # Offline model, JSON report
//! calc-probe list                             # Show every case
//! ```

use calc_probe_cli::{logging, Cli, CliConfig, CliResult, Commands, SuiteRunner, Verbosity};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every executed case passed
fn run() -> CliResult<bool> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    logging::init(config.verbosity, config.color.should_color());

    match cli.command {
        Commands::Run(args) => {
            let config = config.with_format(args.format.into());
            let mut runner = SuiteRunner::new(config);
            let report = runner.run(&args)?;
            Ok(report.all_passed())
        }
        Commands::List(args) => {
            SuiteRunner::new(config).list(&args)?;
            Ok(true)
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(cli.color.into())
}
