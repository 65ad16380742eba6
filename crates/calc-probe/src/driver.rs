//! ProbeDriver - abstract browser automation seam.
//!
//! Everything above this trait (page object, fixture, harness) is written
//! once and runs against any backend:
//!
//! - `ChromiumDriver`: real browser over CDP (`browser` feature)
//! - [`ModelDriver`](crate::model::ModelDriver): offline model of the page
//! - [`MockDriver`]: scripted recorder for unit tests

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};

/// Abstract driver trait for browser automation
#[async_trait]
pub trait ProbeDriver: Send {
    /// Navigate the session's page to `url`
    async fn navigate(&mut self, url: &str) -> ProbeResult<()>;

    /// Query the page once for `selector`, caching the handle when found.
    ///
    /// Returns `Ok(false)` when the element is simply not there yet.
    async fn locate(&mut self, selector: &Selector) -> ProbeResult<bool>;

    /// Click an element
    async fn click(&mut self, selector: &Selector) -> ProbeResult<()>;

    /// Type text into an element, appending to whatever it holds
    async fn type_text(&mut self, selector: &Selector, text: &str) -> ProbeResult<()>;

    /// Rendered text of an element
    async fn text(&mut self, selector: &Selector) -> ProbeResult<String>;

    /// Close the session and release its resources
    async fn close(&mut self) -> ProbeResult<()>;

    /// Backend name for logs and reports
    fn name(&self) -> &str {
        "driver"
    }
}

#[async_trait]
impl<D: ProbeDriver + ?Sized> ProbeDriver for Box<D> {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        (**self).navigate(url).await
    }

    async fn locate(&mut self, selector: &Selector) -> ProbeResult<bool> {
        (**self).locate(selector).await
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        (**self).click(selector).await
    }

    async fn type_text(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
        (**self).type_text(selector, text).await
    }

    async fn text(&mut self, selector: &Selector) -> ProbeResult<String> {
        (**self).text(selector).await
    }

    async fn close(&mut self) -> ProbeResult<()> {
        (**self).close().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Shared view of whether a [`MockDriver`] session was closed.
///
/// Stays readable after the driver itself has been moved into a fixture.
#[derive(Debug, Clone, Default)]
pub struct SessionFlag(Arc<AtomicBool>);

impl SessionFlag {
    /// Whether `close` completed on the driver
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn mark_closed(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Mock driver for unit testing
///
/// Records every call as `"<method>:<css>[:<text>]"` and serves scripted
/// element texts. Elements are keyed by their CSS query.
#[derive(Debug, Default)]
pub struct MockDriver {
    /// Current URL
    pub current_url: String,
    /// Elements present on the page
    pub elements: HashSet<String>,
    /// Call history for verification
    pub call_history: Vec<String>,
    session: SessionFlag,
    pending: HashMap<String, u32>,
    texts: HashMap<String, VecDeque<String>>,
    typed: HashMap<String, String>,
    failing: HashSet<String>,
}

impl MockDriver {
    /// Create new mock driver with an empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose page contains elements with the given ids
    #[must_use]
    pub fn with_elements<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut driver = Self::new();
        for id in ids {
            driver.add_element(id.as_ref());
        }
        driver
    }

    /// Add an element by id
    pub fn add_element(&mut self, id: &str) {
        let _ = self.elements.insert(Selector::id(id).to_css());
    }

    /// Remove an element by id
    pub fn remove_element(&mut self, id: &str) {
        let _ = self.elements.remove(&Selector::id(id).to_css());
    }

    /// Make an element invisible to the next `polls` lookups
    pub fn delay_element(&mut self, id: &str, polls: u32) {
        let _ = self.pending.insert(Selector::id(id).to_css(), polls);
    }

    /// Script the texts an element returns, one per read.
    ///
    /// The last text sticks once the script runs out.
    pub fn script_text<I, S>(&mut self, id: &str, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let _ = self.texts.insert(
            Selector::id(id).to_css(),
            texts.into_iter().map(Into::into).collect(),
        );
    }

    /// Make every call whose history entry starts with `prefix` fail
    pub fn fail_on(&mut self, prefix: impl Into<String>) {
        let _ = self.failing.insert(prefix.into());
    }

    /// Handle on the session's closed state
    #[must_use]
    pub fn session(&self) -> SessionFlag {
        self.session.clone()
    }

    /// Whether `close` completed
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.session.is_closed()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.call_history
    }

    /// Check if a call with this prefix was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.call_history.iter().any(|c| c.starts_with(prefix))
    }

    /// Count calls with this prefix
    #[must_use]
    pub fn count_calls(&self, prefix: &str) -> usize {
        self.call_history
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Text typed into an element so far
    #[must_use]
    pub fn typed_into(&self, id: &str) -> Option<&str> {
        self.typed.get(&Selector::id(id).to_css()).map(String::as_str)
    }

    fn record(&mut self, call: String) -> ProbeResult<()> {
        let failing = self.failing.iter().any(|p| call.starts_with(p.as_str()));
        self.call_history.push(call.clone());
        if failing {
            return Err(ProbeError::page(format!("scripted failure on {call}")));
        }
        if self.is_closed() && call != "close" {
            return Err(ProbeError::page("session already closed"));
        }
        Ok(())
    }

    fn require(&self, selector: &Selector) -> ProbeResult<String> {
        let css = selector.to_css();
        if self.elements.contains(&css) {
            Ok(css)
        } else {
            Err(ProbeError::ElementNotFound {
                selector: css,
                message: "not on mock page".to_string(),
            })
        }
    }
}

#[async_trait]
impl ProbeDriver for MockDriver {
    async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
        self.record(format!("navigate:{url}"))
            .map_err(|e| ProbeError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.current_url = url.to_string();
        Ok(())
    }

    async fn locate(&mut self, selector: &Selector) -> ProbeResult<bool> {
        let css = selector.to_css();
        self.record(format!("locate:{css}"))?;
        if let Some(remaining) = self.pending.get_mut(&css) {
            if *remaining > 0 {
                *remaining -= 1;
                return Ok(false);
            }
        }
        Ok(self.elements.contains(&css))
    }

    async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
        self.record(format!("click:{selector}"))?;
        let _ = self.require(selector)?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
        self.record(format!("type:{selector}:{text}"))?;
        let css = self.require(selector)?;
        self.typed.entry(css).or_default().push_str(text);
        Ok(())
    }

    async fn text(&mut self, selector: &Selector) -> ProbeResult<String> {
        self.record(format!("text:{selector}"))?;
        let css = self.require(selector)?;
        let text = match self.texts.get_mut(&css) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(text.unwrap_or_default())
    }

    async fn close(&mut self) -> ProbeResult<()> {
        self.record("close".to_string())?;
        self.session.mark_closed();
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
