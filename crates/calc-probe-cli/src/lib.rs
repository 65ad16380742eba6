//! calc-probe CLI library
//!
//! Argument parsing, logging setup, progress output and the suite runner
//! behind the `calc-probe` binary.

#![warn(missing_docs)]

mod commands;
mod config;
mod error;
pub mod logging;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, DriverArg, FormatArg, ListArgs, RunArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, ProgressReporter};
pub use runner::{browser_config, harness_config, parse_groups, selection, SuiteRunner};
