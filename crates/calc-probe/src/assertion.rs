//! Assertions on rendered page text.

use crate::result::{ProbeError, ProbeResult};

/// Result of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionResult {
    /// Whether the assertion passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
}

impl AssertionResult {
    /// Create a passing assertion result
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing assertion result
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    /// Convert into a `ProbeResult`
    ///
    /// # Errors
    ///
    /// Returns `AssertionFailed` carrying the message when the assertion
    /// did not pass
    pub fn into_result(self) -> ProbeResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(ProbeError::AssertionFailed {
                message: self.message,
            })
        }
    }
}

/// Assertion helpers
#[derive(Debug)]
pub struct Assertion;

impl Assertion {
    /// Assert rendered text equals `expected` exactly.
    ///
    /// No trimming or case folding: `"Result: 3"` and `"Result: 3 "` differ.
    #[must_use]
    pub fn text_equals(expected: &str, actual: &str) -> AssertionResult {
        if expected == actual {
            return AssertionResult::pass();
        }
        let mut message = format!("expected {expected:?}, got {actual:?}");
        if expected.trim() == actual.trim() {
            message.push_str(" (differs only in surrounding whitespace)");
        } else if let Some(at) = first_difference(expected, actual) {
            message.push_str(&format!(" (first difference at char {at})"));
        }
        AssertionResult::fail(message)
    }
}

fn first_difference(a: &str, b: &str) -> Option<usize> {
    let mut left = a.chars();
    let mut right = b.chars();
    let mut index = 0;
    loop {
        match (left.next(), right.next()) {
            (None, None) => return None,
            (l, r) if l != r => return Some(index),
            _ => index += 1,
        }
    }
}
