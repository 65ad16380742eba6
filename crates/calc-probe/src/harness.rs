//! Suite harness.
//!
//! Runs the selected cases one after another against a single fixture.
//! Setup failures abort the run; everything after setup is recorded per
//! case and the session is always closed at the end.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::assertion::Assertion;
use crate::driver::ProbeDriver;
use crate::fixture::{CalculatorFixture, FixtureBody};
use crate::locator::WaitOptions;
use crate::page_object::CalculatorPage;
use crate::reporter::{CaseOutcome, SuiteReport};
use crate::result::ProbeResult;
use crate::scenario::CalcCase;
use crate::TARGET_URL;

/// Harness configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Page under test
    pub url: String,
    /// Element auto-wait used at setup
    pub wait: WaitOptions,
    /// Skip the remaining cases after the first failure
    pub fail_fast: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            url: TARGET_URL.to_string(),
            wait: WaitOptions::default(),
            fail_fast: false,
        }
    }
}

impl HarnessConfig {
    /// Set the target URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the element wait
    #[must_use]
    pub const fn with_wait(mut self, wait: WaitOptions) -> Self {
        self.wait = wait;
        self
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }
}

/// Test harness for running calculator suites
#[derive(Debug, Clone, Default)]
pub struct TestHarness {
    config: HarnessConfig,
}

impl TestHarness {
    /// Create a harness
    #[must_use]
    pub const fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Harness configuration
    #[must_use]
    pub const fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run `cases` on `driver`, calling `on_outcome` after each case.
    ///
    /// # Errors
    ///
    /// Returns the setup error when the page or one of its elements is
    /// unreachable. Case failures never error; they are in the report.
    pub async fn run<D, F>(
        &self,
        driver: D,
        cases: &[&CalcCase],
        mut on_outcome: F,
    ) -> ProbeResult<SuiteReport>
    where
        D: ProbeDriver,
        F: FnMut(&CaseOutcome),
    {
        let started = Instant::now();
        info!(
            url = %self.config.url,
            driver = driver.name(),
            cases = cases.len(),
            "suite starting"
        );
        let suite = SuiteRun {
            harness: self,
            cases,
            report: SuiteReport::new(&self.config.url, driver.name()),
            on_outcome: &mut on_outcome,
        };

        let fixture = CalculatorFixture::new(&self.config.url, self.config.wait);
        let mut report = fixture.scoped(driver, suite).await?;

        report.duration_ms = millis(started.elapsed());
        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            duration_ms = report.duration_ms,
            "suite finished"
        );
        Ok(report)
    }

    async fn run_cases<D, F>(
        &self,
        page: &mut CalculatorPage<D>,
        cases: &[&CalcCase],
        report: &mut SuiteReport,
        on_outcome: &mut F,
    ) where
        D: ProbeDriver,
        F: FnMut(&CaseOutcome),
    {
        let mut stopped = false;
        for case in cases {
            let outcome = if stopped {
                CaseOutcome::skipped(case)
            } else {
                Self::run_case(page, case).await
            };
            if self.config.fail_fast && outcome.status.is_failed() {
                stopped = true;
            }
            on_outcome(&outcome);
            report.record(outcome);
        }
    }

    async fn run_case<D: ProbeDriver>(page: &mut CalculatorPage<D>, case: &CalcCase) -> CaseOutcome {
        let started = Instant::now();
        let outcome = match page.execute(case).await {
            Ok(actual) => match Assertion::text_equals(case.expected, &actual).into_result() {
                Ok(()) => CaseOutcome::passed(case, actual, started.elapsed()),
                Err(e) => CaseOutcome::failed(case, Some(actual), e.to_string(), started.elapsed()),
            },
            Err(e) => CaseOutcome::failed(case, None, e.to_string(), started.elapsed()),
        };
        debug!(
            case = %outcome.name,
            status = outcome.status.label(),
            actual = outcome.actual.as_deref().unwrap_or(""),
            "case finished"
        );
        outcome
    }
}

/// Every selected case, run inside one fixture scope
struct SuiteRun<'a, F> {
    harness: &'a TestHarness,
    cases: &'a [&'a CalcCase],
    report: SuiteReport,
    on_outcome: &'a mut F,
}

#[async_trait(?Send)]
impl<'a, D, F> FixtureBody<D> for SuiteRun<'a, F>
where
    D: ProbeDriver,
    F: FnMut(&CaseOutcome),
{
    type Output = SuiteReport;

    async fn run(mut self, page: &mut CalculatorPage<D>) -> ProbeResult<SuiteReport> {
        self.harness
            .run_cases(page, self.cases, &mut self.report, self.on_outcome)
            .await;
        Ok(self.report)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;
    use crate::locator::CalculatorElement;
    use crate::model::ModelDriver;
    use crate::reporter::CaseStatus;
    use crate::scenario::{ScenarioGroup, Selection};

    fn quick() -> HarnessConfig {
        HarnessConfig::default()
            .with_url("https://calc.test/")
            .with_wait(
                WaitOptions::default()
                    .with_timeout(Duration::from_millis(20))
                    .with_poll_interval(Duration::from_millis(5)),
            )
    }

    fn full_page() -> MockDriver {
        MockDriver::with_elements(CalculatorElement::ALL.map(CalculatorElement::id))
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_default_targets_hosted_page() {
            let config = HarnessConfig::default();
            assert_eq!(config.url, TARGET_URL);
            assert!(!config.fail_fast);
        }
    }

    mod run_tests {
        use super::*;

        #[tokio::test]
        async fn test_model_run_passes_integers() {
            let cases = Selection::all()
                .with_group(ScenarioGroup::Integers)
                .cases();
            let mut seen = Vec::new();
            let report = TestHarness::new(quick())
                .run(ModelDriver::new(), &cases, |o| seen.push(o.name.clone()))
                .await
                .unwrap();

            assert!(report.all_passed(), "{}", report.render_text());
            assert_eq!(report.total_count(), 4);
            assert_eq!(report.driver, "model");
            assert_eq!(seen.len(), 4);
        }

        #[tokio::test]
        async fn test_mismatch_recorded_and_run_continues() {
            let mut driver = full_page();
            driver.script_text("result", ["Result: 4", "Result: -1"]);
            let session = driver.session();
            let cases: Vec<&CalcCase> = ScenarioGroup::Integers.cases()[..2].iter().collect();

            let report = TestHarness::new(quick())
                .run(driver, &cases, |_| {})
                .await
                .unwrap();

            assert_eq!(report.outcomes[0].status, CaseStatus::Failed);
            assert_eq!(report.outcomes[0].actual.as_deref(), Some("Result: 4"));
            assert!(report.outcomes[0]
                .error
                .as_deref()
                .unwrap()
                .starts_with("Assertion failed: expected \"Result: 3\""));
            assert_eq!(report.outcomes[1].status, CaseStatus::Passed);
            assert!(session.is_closed());
        }

        #[tokio::test]
        async fn test_driver_error_is_case_failure() {
            let mut driver = full_page();
            driver.fail_on("type:#number2");
            let session = driver.session();
            let cases: Vec<&CalcCase> = ScenarioGroup::Integers.cases().iter().collect();

            let report = TestHarness::new(quick())
                .run(driver, &cases, |_| {})
                .await
                .unwrap();

            assert_eq!(report.failed_count(), 4);
            assert!(report.outcomes.iter().all(|o| o.actual.is_none()));
            assert!(report.outcomes[0]
                .error
                .as_deref()
                .unwrap()
                .contains("scripted failure"));
            assert!(session.is_closed());
        }

        #[tokio::test]
        async fn test_fail_fast_skips_rest() {
            let mut driver = full_page();
            driver.script_text("result", ["Result: 3", "wrong"]);
            let session = driver.session();
            let cases: Vec<&CalcCase> = ScenarioGroup::Integers.cases().iter().collect();

            let report = TestHarness::new(quick().with_fail_fast(true))
                .run(driver, &cases, |_| {})
                .await
                .unwrap();

            let statuses: Vec<CaseStatus> = report.outcomes.iter().map(|o| o.status).collect();
            assert_eq!(
                statuses,
                [
                    CaseStatus::Passed,
                    CaseStatus::Failed,
                    CaseStatus::Skipped,
                    CaseStatus::Skipped
                ]
            );
            assert!(session.is_closed());
        }

        #[tokio::test]
        async fn test_setup_failure_is_fatal() {
            let mut driver = full_page();
            driver.remove_element("calcButton");
            let session = driver.session();
            let cases: Vec<&CalcCase> = ScenarioGroup::Integers.cases().iter().collect();

            let mut called = false;
            let err = TestHarness::new(quick())
                .run(driver, &cases, |_| called = true)
                .await
                .unwrap_err();
            assert!(err.is_fatal());
            assert!(!called);
            assert!(session.is_closed());
        }

        #[tokio::test]
        async fn test_empty_selection_still_opens_page() {
            let report = TestHarness::new(quick())
                .run(ModelDriver::new(), &[], |_| {})
                .await
                .unwrap();
            assert_eq!(report.total_count(), 0);
            assert!(report.all_passed());
        }
    }
}
