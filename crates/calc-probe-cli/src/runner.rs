//! Suite runner: turns parsed arguments into a harness run.

use calc_probe::{
    BrowserConfig, CalcCase, HarnessConfig, ModelDriver, ProbeDriver, ScenarioGroup, Selection,
    SuiteReport, TestHarness, WaitOptions,
};
use std::io::Write;
use std::time::Duration;
use tracing::info;

use crate::commands::{DriverArg, ListArgs, RunArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{OutputFormat, ProgressReporter};

/// Resolve group names to groups
///
/// # Errors
///
/// Returns `InvalidArgument` naming the first unknown group
pub fn parse_groups(names: &[String]) -> CliResult<Vec<ScenarioGroup>> {
    names
        .iter()
        .map(|name| {
            ScenarioGroup::from_name(name).ok_or_else(|| {
                let known: Vec<&str> = ScenarioGroup::ALL.iter().map(|g| g.name()).collect();
                CliError::invalid_argument(format!(
                    "unknown group '{name}' (expected one of: {})",
                    known.join(", ")
                ))
            })
        })
        .collect()
}

/// Build the case selection for a run
///
/// # Errors
///
/// Returns error on unknown group names or when nothing matches
pub fn selection(groups: &[String], filter: Option<&str>) -> CliResult<Vec<&'static CalcCase>> {
    let mut selection = Selection::all();
    for group in parse_groups(groups)? {
        selection = selection.with_group(group);
    }
    if let Some(filter) = filter {
        selection = selection.with_filter(filter);
    }
    let cases = selection.cases();
    if cases.is_empty() {
        return Err(CliError::invalid_argument("no cases match the selection"));
    }
    Ok(cases)
}

/// Browser configuration from run arguments
#[must_use]
pub fn browser_config(args: &RunArgs) -> BrowserConfig {
    let (width, height) = args.viewport;
    let mut config = BrowserConfig::default()
        .with_headless(!args.headful)
        .with_viewport(width, height)
        .with_request_timeout(Duration::from_secs(args.request_timeout));
    if args.no_sandbox {
        config = config.with_no_sandbox();
    }
    if let Some(ref path) = args.chromium_path {
        config = config.with_chromium_path(path.to_string_lossy());
    }
    config
}

/// Harness configuration from run arguments
#[must_use]
pub fn harness_config(args: &RunArgs) -> HarnessConfig {
    HarnessConfig::default()
        .with_url(args.url.clone())
        .with_wait(WaitOptions::default().with_timeout(Duration::from_millis(args.element_timeout)))
        .with_fail_fast(args.fail_fast)
}

/// Runs the suite and renders its report
#[derive(Debug)]
pub struct SuiteRunner {
    config: CliConfig,
    reporter: ProgressReporter,
}

impl SuiteRunner {
    /// Create a runner
    #[must_use]
    pub fn new(config: CliConfig) -> Self {
        // JSON goes to stdout, so keep stderr to failures
        let quiet = config.verbosity.is_quiet() || config.format == OutputFormat::Json;
        let reporter = ProgressReporter::new(config.color.should_color(), quiet);
        Self { config, reporter }
    }

    /// Runner configuration
    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    /// Execute the `run` command and return the report
    ///
    /// # Errors
    ///
    /// Returns error for bad arguments, a fatal setup failure, or when the
    /// report cannot be written
    pub fn run(&mut self, args: &RunArgs) -> CliResult<SuiteReport> {
        let cases = selection(&args.groups, args.filter.as_deref())?;
        let harness = TestHarness::new(harness_config(args));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::test_execution(format!("could not start runtime: {e}")))?;

        self.reporter
            .header(&format!("calc-probe: {} cases against {}", cases.len(), args.url));
        self.reporter.start_progress(cases.len() as u64, "running");

        let reporter = &self.reporter;
        let result = runtime.block_on(async {
            let driver = open_driver(args).await?;
            info!(driver = driver.name(), "driver ready");
            harness
                .run(driver, &cases, |outcome| reporter.outcome(outcome))
                .await
                .map_err(CliError::from)
        });
        self.reporter.finish();
        let report = result?;

        self.emit(&report)?;
        if let Some(ref path) = args.output {
            report.write_json(path)?;
            self.reporter
                .info(&format!("report written to {}", path.display()));
        }
        Ok(report)
    }

    fn emit(&self, report: &SuiteReport) -> CliResult<()> {
        match self.config.format {
            OutputFormat::Text => self.reporter.report_summary(report),
            OutputFormat::Json => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", serde_json::to_string_pretty(report)?)?;
            }
        }
        Ok(())
    }

    /// Execute the `list` command
    ///
    /// # Errors
    ///
    /// Returns error on unknown group names
    pub fn list(&self, args: &ListArgs) -> CliResult<()> {
        let mut groups = parse_groups(&args.groups)?;
        if groups.is_empty() {
            groups = ScenarioGroup::ALL.to_vec();
        }
        let mut stdout = std::io::stdout().lock();
        for group in groups {
            writeln!(stdout, "{} ({})", group.name(), group.description())?;
            for case in group.cases() {
                writeln!(stdout, "  {}  ->  {}", case.name(), case.expected)?;
            }
        }
        Ok(())
    }
}

async fn open_driver(args: &RunArgs) -> CliResult<Box<dyn ProbeDriver>> {
    match args.driver {
        DriverArg::Model => Ok(Box::new(ModelDriver::new())),
        DriverArg::Chromium => launch_chromium(browser_config(args)).await,
    }
}

#[cfg(feature = "browser")]
async fn launch_chromium(config: BrowserConfig) -> CliResult<Box<dyn ProbeDriver>> {
    let driver = calc_probe::ChromiumDriver::launch(config).await?;
    Ok(Box::new(driver))
}

#[cfg(not(feature = "browser"))]
async fn launch_chromium(_config: BrowserConfig) -> CliResult<Box<dyn ProbeDriver>> {
    Err(CliError::config(
        "built without the `browser` feature; use --driver model or rebuild with --features browser",
    ))
}
