//! Page Object for the calculator page.
//!
//! [`CalculatorPage`] owns the driver and knows the page's element
//! contract, so cases only speak in operands and operators.

use tracing::debug;

use crate::driver::ProbeDriver;
use crate::locator::{wait_for, CalculatorElement, WaitOptions};
use crate::result::{ProbeError, ProbeResult};
use crate::scenario::CalcCase;

/// The calculator page, bound to one driver session
#[derive(Debug)]
pub struct CalculatorPage<D: ProbeDriver> {
    driver: D,
    url: String,
}

impl<D: ProbeDriver> CalculatorPage<D> {
    /// Navigate to `url` and wait for all six elements to resolve.
    ///
    /// On error the driver is handed back so the caller can still close it.
    ///
    /// # Errors
    ///
    /// Returns the navigation or element lookup failure
    pub async fn open(
        mut driver: D,
        url: &str,
        wait: WaitOptions,
    ) -> Result<Self, (D, ProbeError)> {
        if let Err(e) = driver.navigate(url).await {
            return Err((driver, e));
        }
        for element in CalculatorElement::ALL {
            if let Err(e) = wait_for(&mut driver, &element.selector(), wait).await {
                return Err((driver, e));
            }
        }
        debug!(url, driver = driver.name(), "calculator page ready");
        Ok(Self {
            driver,
            url: url.to_string(),
        })
    }

    /// URL the page was opened at
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Click reset
    ///
    /// # Errors
    ///
    /// Returns error if the click fails
    pub async fn reset(&mut self) -> ProbeResult<()> {
        self.driver.click(&CalculatorElement::Reset.selector()).await
    }

    /// Type `value` into a field. An empty value leaves the field untouched.
    ///
    /// # Errors
    ///
    /// Returns error if typing fails
    pub async fn enter(&mut self, field: CalculatorElement, value: &str) -> ProbeResult<()> {
        if value.is_empty() {
            return Ok(());
        }
        self.driver.type_text(&field.selector(), value).await
    }

    /// Click calculate
    ///
    /// # Errors
    ///
    /// Returns error if the click fails
    pub async fn calculate(&mut self) -> ProbeResult<()> {
        self.driver
            .click(&CalculatorElement::Calculate.selector())
            .await
    }

    /// Current result label text
    ///
    /// # Errors
    ///
    /// Returns error if the label cannot be read
    pub async fn result_text(&mut self) -> ProbeResult<String> {
        self.driver.text(&CalculatorElement::Result.selector()).await
    }

    /// Run one case: reset, fill the non-empty fields, calculate, and
    /// return the rendered result text.
    ///
    /// # Errors
    ///
    /// Returns the first driver error
    pub async fn execute(&mut self, case: &CalcCase) -> ProbeResult<String> {
        self.reset().await?;
        self.enter(CalculatorElement::FirstOperand, case.first).await?;
        self.enter(CalculatorElement::Operator, case.operator).await?;
        self.enter(CalculatorElement::SecondOperand, case.second)
            .await?;
        self.calculate().await?;
        self.result_text().await
    }

    /// Borrow the driver
    #[must_use]
    pub const fn driver(&self) -> &D {
        &self.driver
    }

    /// Borrow the driver mutably
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Release the driver without closing it
    pub fn into_driver(self) -> D {
        self.driver
    }
}
