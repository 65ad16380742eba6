//! Locators for the calculator page's elements.
//!
//! The page exposes six elements, each addressed by its DOM `id`. A
//! [`Selector`] turns those ids into CSS queries for the CDP driver, while
//! [`CalculatorElement`] names the role each one plays in a case.
//!
//! Locating auto-waits: [`wait_for`] polls the driver until the element is
//! present or the timeout elapses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::driver::ProbeDriver;
use crate::result::{ProbeError, ProbeResult};

/// Default timeout for auto-waiting (5 seconds)
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Default polling interval for auto-waiting (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Id selector for a page element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    id: String,
}

impl Selector {
    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// Convert to a CSS query string
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("#{}", self.id)
    }

    /// The element id this selector targets
    #[must_use]
    pub fn element_id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// What a page element is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementRole {
    /// Accepts typed text
    TextInput,
    /// Receives clicks
    Button,
    /// Read-only text output
    Label,
}

/// The six elements every case interacts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorElement {
    /// First operand field
    FirstOperand,
    /// Second operand field
    SecondOperand,
    /// Operator field
    Operator,
    /// Calculate button
    Calculate,
    /// Reset button
    Reset,
    /// Result label
    Result,
}

impl CalculatorElement {
    /// All elements, in the order they are resolved at setup
    pub const ALL: [Self; 6] = [
        Self::FirstOperand,
        Self::SecondOperand,
        Self::Operator,
        Self::Calculate,
        Self::Reset,
        Self::Result,
    ];

    /// DOM id of the element
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::FirstOperand => "number1",
            Self::SecondOperand => "number2",
            Self::Operator => "operation",
            Self::Calculate => "calcButton",
            Self::Reset => "resetButton",
            Self::Result => "result",
        }
    }

    /// Role the element plays
    #[must_use]
    pub const fn role(self) -> ElementRole {
        match self {
            Self::FirstOperand | Self::SecondOperand | Self::Operator => ElementRole::TextInput,
            Self::Calculate | Self::Reset => ElementRole::Button,
            Self::Result => ElementRole::Label,
        }
    }

    /// Look up an element by its DOM id
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|element| element.id() == id)
    }

    /// Selector addressing this element
    #[must_use]
    pub fn selector(self) -> Selector {
        Selector::id(self.id())
    }
}

impl fmt::Display for CalculatorElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Auto-wait options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl WaitOptions {
    /// Set the timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

/// Wait until `selector` is present on the driver's page.
///
/// Always polls at least once, so a zero timeout still finds an element
/// that is already there.
pub async fn wait_for<D>(driver: &mut D, selector: &Selector, options: WaitOptions) -> ProbeResult<()>
where
    D: ProbeDriver + ?Sized,
{
    let start = Instant::now();
    let mut attempts = 0_u32;
    loop {
        attempts += 1;
        if driver.locate(selector).await? {
            debug!(%selector, attempts, "element located");
            return Ok(());
        }
        if start.elapsed() >= options.timeout {
            return Err(ProbeError::ElementNotFound {
                selector: selector.to_string(),
                message: format!(
                    "not present after {}ms ({attempts} attempts)",
                    options.timeout.as_millis()
                ),
            });
        }
        tokio::time::sleep(options.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::MockDriver;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_id_selector_to_css() {
            assert_eq!(Selector::id("number1").to_css(), "#number1");
        }

        #[test]
        fn test_element_id() {
            assert_eq!(Selector::id("result").element_id(), "result");
            assert_eq!(Selector::id("calcButton").element_id(), "calcButton");
        }

        #[test]
        fn test_display_matches_css() {
            assert_eq!(Selector::id("operation").to_string(), "#operation");
        }
    }

    mod element_tests {
        use super::*;

        #[test]
        fn test_element_ids_match_page_contract() {
            let ids: Vec<&str> = CalculatorElement::ALL.iter().map(|e| e.id()).collect();
            assert_eq!(
                ids,
                ["number1", "number2", "operation", "calcButton", "resetButton", "result"]
            );
        }

        #[test]
        fn test_roles() {
            assert_eq!(CalculatorElement::Operator.role(), ElementRole::TextInput);
            assert_eq!(CalculatorElement::Reset.role(), ElementRole::Button);
            assert_eq!(CalculatorElement::Result.role(), ElementRole::Label);
        }

        #[test]
        fn test_from_id_round_trip() {
            for element in CalculatorElement::ALL {
                assert_eq!(CalculatorElement::from_id(element.id()), Some(element));
            }
            assert_eq!(CalculatorElement::from_id("number3"), None);
        }
    }

    mod wait_tests {
        use super::*;

        fn quick() -> WaitOptions {
            WaitOptions::default()
                .with_timeout(Duration::from_millis(40))
                .with_poll_interval(Duration::from_millis(5))
        }

        #[tokio::test]
        async fn test_wait_finds_present_element() {
            let mut driver = MockDriver::with_elements(["result"]);
            wait_for(&mut driver, &Selector::id("result"), quick())
                .await
                .unwrap();
            assert!(driver.was_called("locate:#result"));
        }

        #[tokio::test]
        async fn test_wait_polls_until_element_appears() {
            let mut driver = MockDriver::with_elements(["result"]);
            driver.delay_element("result", 3);
            wait_for(&mut driver, &Selector::id("result"), quick())
                .await
                .unwrap();
            assert_eq!(driver.count_calls("locate:#result"), 4);
        }

        #[tokio::test]
        async fn test_wait_times_out_on_missing_element() {
            let mut driver = MockDriver::new();
            let err = wait_for(&mut driver, &Selector::id("number1"), quick())
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::ElementNotFound { .. }));
            assert!(err.to_string().contains("#number1"));
        }

        #[tokio::test]
        async fn test_zero_timeout_still_polls_once() {
            let mut driver = MockDriver::with_elements(["number2"]);
            let options = WaitOptions::default().with_timeout(Duration::ZERO);
            wait_for(&mut driver, &Selector::id("number2"), options)
                .await
                .unwrap();
        }
    }
}
