//! Suite report: per-case outcomes plus totals.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use crate::result::ProbeResult;
use crate::scenario::{CalcCase, ScenarioGroup};

/// Case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    /// Result text matched
    Passed,
    /// Mismatch or driver error
    Failed,
    /// Not executed (fail-fast)
    Skipped,
}

impl CaseStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(self) -> bool {
        matches!(self, Self::Failed)
    }

    /// Short label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
            Self::Skipped => "SKIP",
        }
    }
}

/// Outcome of one case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseOutcome {
    /// Display name
    pub name: String,
    /// Scenario group
    pub group: ScenarioGroup,
    /// Status
    pub status: CaseStatus,
    /// Expected result text
    pub expected: String,
    /// Text actually rendered, if it could be read
    pub actual: Option<String>,
    /// Mismatch or driver error message
    pub error: Option<String>,
    /// Wall time in milliseconds
    pub duration_ms: u64,
}

impl CaseOutcome {
    fn base(case: &CalcCase, status: CaseStatus, duration: Duration) -> Self {
        Self {
            name: case.name(),
            group: case.group,
            status,
            expected: case.expected.to_string(),
            actual: None,
            error: None,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Passing outcome
    #[must_use]
    pub fn passed(case: &CalcCase, actual: impl Into<String>, duration: Duration) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::base(case, CaseStatus::Passed, duration)
        }
    }

    /// Failing outcome; `actual` is `None` when a driver error cut the
    /// case short
    #[must_use]
    pub fn failed(
        case: &CalcCase,
        actual: Option<String>,
        error: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            actual,
            error: Some(error.into()),
            ..Self::base(case, CaseStatus::Failed, duration)
        }
    }

    /// Skipped outcome
    #[must_use]
    pub fn skipped(case: &CalcCase) -> Self {
        Self::base(case, CaseStatus::Skipped, Duration::ZERO)
    }
}

/// Report for one suite run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Target page
    pub url: String,
    /// Driver backend name
    pub driver: String,
    /// Outcomes in execution order
    pub outcomes: Vec<CaseOutcome>,
    /// Total wall time in milliseconds
    pub duration_ms: u64,
}

impl SuiteReport {
    /// Create an empty report
    #[must_use]
    pub fn new(url: impl Into<String>, driver: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            driver: driver.into(),
            ..Self::default()
        }
    }

    /// Record an outcome
    pub fn record(&mut self, outcome: CaseOutcome) {
        self.outcomes.push(outcome);
    }

    fn count(&self, status: CaseStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Get number of passed cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.count(CaseStatus::Passed)
    }

    /// Get number of failed cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(CaseStatus::Failed)
    }

    /// Get number of skipped cases
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(CaseStatus::Skipped)
    }

    /// Get total case count
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// True when no case failed or was skipped
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed_count() == self.total_count()
    }

    /// Failing outcomes
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseOutcome> {
        self.outcomes
            .iter()
            .filter(|o| o.status.is_failed())
            .collect()
    }

    /// One-line summary
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{} passed, {} failed, {} skipped ({} total) in {}ms",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.total_count(),
            self.duration_ms
        )
    }

    /// Plain-text rendering, one line per case plus failure details
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let _ = writeln!(out, "{} {}", outcome.status.label(), outcome.name);
        }
        let failures = self.failures();
        if !failures.is_empty() {
            out.push_str("\nfailures:\n");
            for outcome in failures {
                let _ = writeln!(
                    out,
                    "  {}\n    {}",
                    outcome.name,
                    outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        let _ = writeln!(out, "\n{}", self.summary());
        out
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails
    pub fn to_json(&self) -> ProbeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the JSON report to `path`
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file writing fails
    pub fn write_json(&self, path: &Path) -> ProbeResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
