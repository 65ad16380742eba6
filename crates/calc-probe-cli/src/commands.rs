//! CLI command definitions using clap

use calc_probe::{DEFAULT_TIMEOUT_MS, TARGET_URL};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// calc-probe: end-to-end checks for the number calculator web page
#[derive(Parser, Debug)]
#[command(name = "calc-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the calculator suite
    Run(RunArgs),

    /// List scenario groups and cases
    List(ListArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Calculator page to test
    #[arg(long, default_value = TARGET_URL)]
    pub url: String,

    /// Driver backend
    #[arg(long, value_enum, default_value = "chromium")]
    pub driver: DriverArg,

    /// Chromium binary (auto-detected when unset)
    #[arg(long, env = "CHROMIUM_PATH")]
    pub chromium_path: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    pub headful: bool,

    /// Disable the Chromium sandbox (containers, CI)
    #[arg(long)]
    pub no_sandbox: bool,

    /// Browser window size, as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720", value_parser = parse_viewport)]
    pub viewport: (u32, u32),

    /// Timeout for a single browser request, in seconds
    #[arg(long, default_value_t = 30)]
    pub request_timeout: u64,

    /// How long to wait for each page element at setup, in milliseconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub element_timeout: u64,

    /// Only run these groups (repeatable)
    #[arg(short, long = "group")]
    pub groups: Vec<String>,

    /// Only run cases whose name contains this text
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Skip the remaining cases after the first failure
    #[arg(long)]
    pub fail_fast: bool,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    pub format: FormatArg,

    /// Write the JSON report to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_viewport(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("invalid viewport dimension '{part}'"))
    };
    Ok((parse(width)?, parse(height)?))
}

/// Arguments for the list command
#[derive(Parser, Debug, Clone)]
pub struct ListArgs {
    /// Only list these groups (repeatable)
    #[arg(short, long = "group")]
    pub groups: Vec<String>,
}

/// Driver backend
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverArg {
    /// Headless Chromium over CDP
    #[default]
    Chromium,
    /// Offline model of the page
    Model,
}

/// Report format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatArg {
    /// Human-readable text
    #[default]
    Text,
    /// JSON on stdout
    Json,
}

impl From<FormatArg> for crate::output::OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => Self::Text,
            FormatArg::Json => Self::Json,
        }
    }
}

/// Color output argument
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorChoice;
    use crate::output::OutputFormat;

    mod parse_tests {
        use super::*;

        #[test]
        fn test_cli_debug_assert() {
            use clap::CommandFactory;
            Cli::command().debug_assert();
        }

        #[test]
        fn test_run_defaults() {
            let cli = Cli::try_parse_from(["calc-probe", "run"]).unwrap();
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.url, TARGET_URL);
            assert_eq!(args.driver, DriverArg::Chromium);
            assert_eq!(args.element_timeout, DEFAULT_TIMEOUT_MS);
            assert_eq!(args.viewport, (1280, 720));
            assert_eq!(args.request_timeout, 30);
            assert!(args.groups.is_empty());
            assert!(!args.fail_fast);
            assert_eq!(args.format, FormatArg::Text);
        }

        #[test]
        fn test_run_all_options() {
            let cli = Cli::try_parse_from([
                "calc-probe",
                "-vv",
                "--color",
                "never",
                "run",
                "--driver",
                "model",
                "--url",
                "http://localhost:8080/",
                "-g",
                "integers",
                "--group",
                "infinity",
                "-f",
                "Infinity",
                "--fail-fast",
                "--headful",
                "--no-sandbox",
                "--element-timeout",
                "250",
                "--viewport",
                "800x600",
                "--request-timeout",
                "5",
                "--format",
                "json",
                "-o",
                "report.json",
            ])
            .unwrap();
            assert_eq!(cli.verbose, 2);
            assert!(matches!(cli.color, ColorArg::Never));
            let Commands::Run(args) = cli.command else {
                panic!("expected run");
            };
            assert_eq!(args.driver, DriverArg::Model);
            assert_eq!(args.groups, ["integers", "infinity"]);
            assert_eq!(args.filter.as_deref(), Some("Infinity"));
            assert!(args.fail_fast && args.headful && args.no_sandbox);
            assert_eq!(args.element_timeout, 250);
            assert_eq!(args.viewport, (800, 600));
            assert_eq!(args.request_timeout, 5);
            assert_eq!(args.output, Some(PathBuf::from("report.json")));
        }

        #[test]
        fn test_bad_viewport_rejected() {
            for bad in ["800", "800x", "0x600", "wide x tall"] {
                assert!(
                    Cli::try_parse_from(["calc-probe", "run", "--viewport", bad]).is_err(),
                    "{bad}"
                );
            }
        }

        #[test]
        fn test_unknown_driver_rejected() {
            assert!(Cli::try_parse_from(["calc-probe", "run", "--driver", "firefox"]).is_err());
        }

        #[test]
        fn test_list_groups() {
            let cli = Cli::try_parse_from(["calc-probe", "list", "-g", "decimals"]).unwrap();
            let Commands::List(args) = cli.command else {
                panic!("expected list");
            };
            assert_eq!(args.groups, ["decimals"]);
        }
    }

    mod conversion_tests {
        use super::*;

        #[test]
        fn test_color_conversion() {
            assert_eq!(ColorChoice::from(ColorArg::Always), ColorChoice::Always);
            assert_eq!(ColorChoice::from(ColorArg::Never), ColorChoice::Never);
            assert_eq!(ColorChoice::from(ColorArg::Auto), ColorChoice::Auto);
        }

        #[test]
        fn test_format_conversion() {
            assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
            assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
        }
    }
}
