//! Offline model of the calculator page.
//!
//! Reproduces the observable behaviour of the hosted page closely enough to
//! run every scenario table without a browser:
//!
//! - operands are validated first, then the operator
//! - a NaN result is reported as an invalid calculation
//! - finite results are rounded to 12 significant digits and rendered the
//!   way an ECMAScript engine prints numbers (`1.8e+99`, `0.000001`, `-0`
//!   shown as `0`)
//!
//! [`ModelDriver`] wraps the model in a [`ProbeDriver`] that simulates the
//! six page elements.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::driver::ProbeDriver;
use crate::locator::{CalculatorElement, ElementRole, Selector};
use crate::result::{ProbeError, ProbeResult};

/// Prefix the page puts in front of every result
pub const RESULT_PREFIX: &str = "Result: ";

/// Significant digits the page keeps before rendering
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Supported arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl Operation {
    /// Every supported operator
    pub const ALL: [Self; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Parse an operator token exactly as typed
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "*" => Some(Self::Multiply),
            "/" => Some(Self::Divide),
            _ => None,
        }
    }

    /// Operator symbol
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Apply with IEEE-754 semantics
    #[must_use]
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
        }
    }
}

/// Outcome of one calculation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// A number (possibly infinite)
    Value(f64),
    /// An operand was missing or not a number
    InvalidInput,
    /// The operator is not supported
    InvalidOperation,
    /// The arithmetic has no defined result
    InvalidCalculation,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.write_str(&format_number(*value)),
            Self::InvalidInput => f.write_str("invalid input"),
            Self::InvalidOperation => f.write_str("invalid operation"),
            Self::InvalidCalculation => f.write_str("invalid calculation"),
        }
    }
}

/// Parse an operand field's contents.
///
/// Accepts decimal and exponential literals plus `Infinity` with an
/// optional sign. Empty text and anything else are rejected.
#[must_use]
pub fn parse_operand(text: &str) -> Option<f64> {
    let text = text.trim();
    match text {
        "" => None,
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        // f64::from_str also takes "inf" and "NaN", which the page rejects
        _ if text
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            text.parse().ok()
        }
        _ => None,
    }
}

/// Evaluate the three field values the way the page does
#[must_use]
pub fn evaluate(first: &str, operator: &str, second: &str) -> Evaluation {
    let (Some(lhs), Some(rhs)) = (parse_operand(first), parse_operand(second)) else {
        return Evaluation::InvalidInput;
    };
    let Some(operation) = Operation::parse(operator) else {
        return Evaluation::InvalidOperation;
    };
    let value = operation.apply(lhs, rhs);
    if value.is_nan() {
        Evaluation::InvalidCalculation
    } else {
        Evaluation::Value(round_significant(value, SIGNIFICANT_DIGITS))
    }
}

/// Full result label text for three field values
#[must_use]
pub fn result_label(first: &str, operator: &str, second: &str) -> String {
    format!("{RESULT_PREFIX}{}", evaluate(first, operator, second))
}

/// Round to `digits` significant decimal digits.
///
/// Zero, infinities and NaN pass through untouched.
#[must_use]
pub fn round_significant(value: f64, digits: usize) -> f64 {
    if value == 0.0 || !value.is_finite() || digits == 0 {
        return value;
    }
    format!("{:.*e}", digits - 1, value)
        .parse()
        .unwrap_or(value)
}

/// Render a number with the ECMAScript `Number::toString` rules.
///
/// Uses the shortest round-tripping digits. Decimal exponents in
/// `(-6, 21]` print in fixed notation, everything else in scientific
/// notation with an explicit exponent sign.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value < 0.0 {
        return format!("-{}", format_number(-value));
    }

    // `{:e}` yields the shortest digits, e.g. "1.8e99" or "3e0"
    let scientific = format!("{value:e}");
    let (mantissa, exponent) = scientific
        .split_once('e')
        .unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let sign = if n - 1 < 0 { '-' } else { '+' };
        let exp = (n - 1).abs();
        if k == 1 {
            format!("{digits}e{sign}{exp}")
        } else {
            let (lead, rest) = digits.split_at(1);
            format!("{lead}.{rest}e{sign}{exp}")
        }
    }
}

/// Driver that simulates the calculator page in memory
#[derive(Debug, Default)]
pub struct ModelDriver {
    url: Option<String>,
    fields: HashMap<CalculatorElement, String>,
    result: String,
    calculations: usize,
    closed: bool,
}

impl ModelDriver {
    /// Create a driver with no page loaded
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// URL of the loaded page, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Current value of an input field
    #[must_use]
    pub fn field(&self, element: CalculatorElement) -> &str {
        self.fields.get(&element).map_or("", String::as_str)
    }

    /// Current result label text
    #[must_use]
    pub fn result(&self) -> &str {
        &self.result
    }

    /// Number of times calculate was clicked
    #[must_use]
    pub const fn calculations(&self) -> usize {
        self.calculations
    }

    /// Whether the session was closed
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    fn reset(&mut self) {
        self.fields.clear();
        self.result.clear();
    }

    fn calculate(&mut self) {
        self.calculations += 1;
        self.result = result_label(
            self.field(CalculatorElement::FirstOperand),
            self.field(CalculatorElement::Operator),
            self.field(CalculatorElement::SecondOperand),
        );
        debug!(result = %self.result, "model calculated");
    }

    fn resolve(&self, selector: &Selector) -> ProbeResult<CalculatorElement> {
        if self.closed {
            return Err(ProbeError::page("model session already closed"));
        }
        if self.url.is_none() {
            return Err(ProbeError::page("no page loaded"));
        }
        CalculatorElement::from_id(selector.element_id()).ok_or_else(|| {
            ProbeError::ElementNotFound {
                selector: selector.to_css(),
                message: "not part of the calculator page".to_string(),
            }
        })
    }
}

#[async_trait]
impl ProbeDriver for ModelDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        if self.closed {
            return Err(ProbeError::Navigation {
                url: url.to_string(),
                message: "model session already closed".to_string(),
            });
        }
        self.url = Some(url.to_string());
        self.reset();
        Ok(())
    }

    async fn locate(&mut self, selector: &Selector) -> ProbeResult<bool> {
        match self.resolve(selector) {
            Ok(_) => Ok(true),
            Err(ProbeError::ElementNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        match self.resolve(selector)? {
            CalculatorElement::Reset => self.reset(),
            CalculatorElement::Calculate => self.calculate(),
            // Clicking a field only focuses it
            _ => {}
        }
        Ok(())
    }

    async fn type_text(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
        let element = self.resolve(selector)?;
        if element.role() != ElementRole::TextInput {
            return Err(ProbeError::input(
                selector.to_css(),
                "element does not accept text",
            ));
        }
        self.fields.entry(element).or_default().push_str(text);
        Ok(())
    }

    async fn text(&mut self, selector: &Selector) -> ProbeResult<String> {
        let element = self.resolve(selector)?;
        Ok(match element.role() {
            ElementRole::Label => self.result.clone(),
            ElementRole::TextInput => self.field(element).to_string(),
            ElementRole::Button => String::new(),
        })
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "model"
    }
}
