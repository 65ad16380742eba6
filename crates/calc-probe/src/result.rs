//! Result and error types for calc-probe.

use thiserror::Error;

/// Result type for calc-probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Errors that can occur while driving the calculator page
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// A required element never appeared on the page
    #[error("Element {selector} not found: {message}")]
    ElementNotFound {
        /// Selector that was queried
        selector: String,
        /// Error message
        message: String,
    },

    /// Page load timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// Input simulation error (click or typing)
    #[error("Input simulation failed on {selector}: {message}")]
    Input {
        /// Target selector
        selector: String,
        /// Error message
        message: String,
    },

    /// Page error (session closed, text unreadable, CDP failure)
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Assertion failed
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// Fixture error (setup/teardown failed)
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProbeError {
    /// Create a page error
    #[must_use]
    pub fn page(message: impl Into<String>) -> Self {
        Self::Page {
            message: message.into(),
        }
    }

    /// Create an input error for a selector
    #[must_use]
    pub fn input(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Whether this error aborts a whole suite rather than a single case
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::BrowserLaunch { .. }
                | Self::Navigation { .. }
                | Self::ElementNotFound { .. }
                | Self::Timeout { .. }
                | Self::Fixture { .. }
        )
    }
}
