//! calc-probe: end-to-end checks for a hosted web calculator
//!
//! Drives a browser against the calculator page, types operands and an
//! operator into its form, clicks calculate and compares the rendered
//! result label with the expected text.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────────┐    ┌──────────────┐
//! │ Scenario   │───►│ TestHarness │───►│ Calculator     │───►│ ProbeDriver  │
//! │ tables     │    │ (sequential)│    │ Fixture / Page │    │ chromium,    │
//! └────────────┘    └──────┬──────┘    └────────────────┘    │ model, mock  │
//!                          ▼                                 └──────────────┘
//!                    SuiteReport
//! ```
//!
//! Enable the `browser` feature for [`ChromiumDriver`]. Without it the
//! suite still runs against the offline [`ModelDriver`].

#![warn(missing_docs)]

mod assertion;
mod browser;
mod driver;
mod fixture;
mod harness;
mod locator;
mod page_object;
mod reporter;
mod result;

/// Offline model of the calculator page
pub mod model;

/// Scenario tables and case selection
pub mod scenario;

/// The hosted calculator page
pub const TARGET_URL: &str = "https://number-calculator.nakov.repl.co/";

pub use assertion::{Assertion, AssertionResult};
pub use browser::BrowserConfig;
#[cfg(feature = "browser")]
pub use browser::ChromiumDriver;
pub use driver::{MockDriver, ProbeDriver, SessionFlag};
pub use fixture::{CalculatorFixture, FixtureBody, FixtureState};
pub use harness::{HarnessConfig, TestHarness};
pub use locator::{
    wait_for, CalculatorElement, ElementRole, Selector, WaitOptions, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_TIMEOUT_MS,
};
pub use model::{ModelDriver, RESULT_PREFIX};
pub use page_object::CalculatorPage;
pub use reporter::{CaseOutcome, CaseStatus, SuiteReport};
pub use result::{ProbeError, ProbeResult};
pub use scenario::{CalcCase, ScenarioGroup, Selection};
