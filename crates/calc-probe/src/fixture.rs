//! Suite-scoped fixture around the calculator page.
//!
//! The fixture owns the only driver session of a run. `setup` opens the
//! page and resolves its elements, `teardown` closes the session, and
//! [`CalculatorFixture::scoped`] runs a body in between with teardown
//! guaranteed.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::driver::ProbeDriver;
use crate::locator::WaitOptions;
use crate::page_object::CalculatorPage;
use crate::result::{ProbeError, ProbeResult};

/// Lifecycle state of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    /// Created but not set up
    Registered,
    /// Page open and elements resolved
    SetUp,
    /// Session closed
    TornDown,
    /// Setup failed
    Failed,
}

/// Work run against the page between setup and teardown
#[async_trait(?Send)]
pub trait FixtureBody<D: ProbeDriver> {
    /// Value handed back once the session is closed
    type Output;

    /// Run against the opened page
    async fn run(self, page: &mut CalculatorPage<D>) -> ProbeResult<Self::Output>;
}

/// Browser session plus resolved calculator page
#[derive(Debug)]
pub struct CalculatorFixture<D: ProbeDriver> {
    url: String,
    wait: WaitOptions,
    page: Option<CalculatorPage<D>>,
    state: FixtureState,
}

impl<D: ProbeDriver> CalculatorFixture<D> {
    /// Create a fixture for the page at `url`
    #[must_use]
    pub fn new(url: impl Into<String>, wait: WaitOptions) -> Self {
        Self {
            url: url.into(),
            wait,
            page: None,
            state: FixtureState::Registered,
        }
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> FixtureState {
        self.state
    }

    /// Target URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Open the page on `driver` and resolve all elements.
    ///
    /// If the page or an element is unreachable the driver is closed
    /// before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns a fixture error when called twice, otherwise the
    /// navigation or element failure
    pub async fn setup(&mut self, driver: D) -> ProbeResult<()> {
        if self.state != FixtureState::Registered {
            return Err(ProbeError::fixture(format!(
                "setup called in state {:?}",
                self.state
            )));
        }
        info!(url = %self.url, driver = driver.name(), "fixture setup");
        match CalculatorPage::open(driver, &self.url, self.wait).await {
            Ok(page) => {
                self.page = Some(page);
                self.state = FixtureState::SetUp;
                Ok(())
            }
            Err((mut driver, e)) => {
                self.state = FixtureState::Failed;
                if let Err(close_err) = driver.close().await {
                    warn!(error = %close_err, "closing driver after failed setup");
                }
                Err(e)
            }
        }
    }

    /// The opened page
    ///
    /// # Errors
    ///
    /// Returns a fixture error unless the fixture is set up
    pub fn page_mut(&mut self) -> ProbeResult<&mut CalculatorPage<D>> {
        match (self.state, self.page.as_mut()) {
            (FixtureState::SetUp, Some(page)) => Ok(page),
            (state, _) => Err(ProbeError::fixture(format!(
                "page not available in state {state:?}"
            ))),
        }
    }

    /// Close the session. Calling it again, or on a fixture that never
    /// set up, is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the driver's close error; the fixture still counts as torn
    /// down
    pub async fn teardown(&mut self) -> ProbeResult<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        self.state = FixtureState::TornDown;
        let mut driver = page.into_driver();
        info!(driver = driver.name(), "fixture teardown");
        driver.close().await
    }

    /// Set up, run `body` against the page, then tear down whatever the
    /// body returned.
    ///
    /// A teardown failure is logged; the body's result still comes back.
    ///
    /// # Errors
    ///
    /// Returns the setup error, otherwise the body's error
    pub async fn scoped<B>(mut self, driver: D, body: B) -> ProbeResult<B::Output>
    where
        B: FixtureBody<D>,
    {
        self.setup(driver).await?;
        let outcome = match self.page_mut() {
            Ok(page) => body.run(page).await,
            Err(e) => Err(e),
        };
        if let Err(e) = self.teardown().await {
            warn!(error = %e, "teardown failed");
        }
        outcome
    }
}

impl<D: ProbeDriver> Drop for CalculatorFixture<D> {
    fn drop(&mut self) {
        if self.page.is_some() {
            warn!(url = %self.url, "fixture dropped without teardown");
        }
    }
}
