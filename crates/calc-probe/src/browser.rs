//! Browser control for headless testing.
//!
//! Real browser control goes through the Chrome `DevTools` Protocol. When
//! compiled with the `browser` feature, [`ChromiumDriver`] launches Chromium
//! with chromiumoxide and implements [`ProbeDriver`](crate::ProbeDriver)
//! on top of a single page.

use std::time::Duration;

/// Browser configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
    /// Timeout for a single CDP request
    pub request_timeout: Duration,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            sandbox: true,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Set the CDP request timeout
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::BrowserConfig;
    use crate::driver::ProbeDriver;
    use crate::locator::Selector;
    use crate::result::{ProbeError, ProbeResult};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::element::Element;
    use chromiumoxide::error::CdpError;
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::collections::HashMap;
    use tracing::{debug, info, warn};

    /// Chromium session driving one page over CDP
    pub struct ChromiumDriver {
        config: BrowserConfig,
        browser: CdpBrowser,
        page: CdpPage,
        handler: tokio::task::JoinHandle<()>,
        elements: HashMap<String, Element>,
        closed: bool,
    }

    impl std::fmt::Debug for ChromiumDriver {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ChromiumDriver")
                .field("config", &self.config)
                .field("cached_elements", &self.elements.len())
                .field("closed", &self.closed)
                .finish()
        }
    }

    impl ChromiumDriver {
        /// Launch a new browser instance with a blank page
        ///
        /// # Errors
        ///
        /// Returns error if browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height)
                .request_timeout(config.request_timeout);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|message| ProbeError::BrowserLaunch { message })?;

            let (browser, mut handler) =
                CdpBrowser::launch(cdp_config)
                    .await
                    .map_err(|e| ProbeError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            // CDP events must be pumped for any request to complete
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if let Err(e) = event {
                        debug!(error = %e, "cdp handler event error");
                    }
                }
            });

            let page = match browser.new_page("about:blank").await {
                Ok(page) => page,
                Err(e) => {
                    handler.abort();
                    return Err(ProbeError::BrowserLaunch {
                        message: format!("could not open page: {e}"),
                    });
                }
            };

            info!(headless = config.headless, "chromium launched");

            Ok(Self {
                config,
                browser,
                page,
                handler,
                elements: HashMap::new(),
                closed: false,
            })
        }

        /// Get the browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        fn ensure_open(&self) -> ProbeResult<()> {
            if self.closed {
                Err(ProbeError::page("browser session already closed"))
            } else {
                Ok(())
            }
        }

        /// Cached handle for `selector`, re-querying the page when absent
        async fn element(&mut self, selector: &Selector) -> ProbeResult<&Element> {
            self.ensure_open()?;
            let css = selector.to_css();
            if !self.elements.contains_key(&css) {
                let element = self.page.find_element(css.clone()).await.map_err(|e| {
                    ProbeError::ElementNotFound {
                        selector: css.clone(),
                        message: e.to_string(),
                    }
                })?;
                let _ = self.elements.insert(css.clone(), element);
            }
            self.elements
                .get(&css)
                .ok_or_else(|| ProbeError::page(format!("handle for {css} vanished")))
        }

        fn evict(&mut self, selector: &Selector) {
            let _ = self.elements.remove(&selector.to_css());
        }
    }

    #[async_trait]
    impl ProbeDriver for ChromiumDriver {
        async fn navigate(&mut self, url: &str) -> ProbeResult<()> {
            self.ensure_open()?;
            debug!(url, "navigating");
            self.elements.clear();
            let timeout_ms =
                u64::try_from(self.config.request_timeout.as_millis()).unwrap_or(u64::MAX);
            let _ = self.page.goto(url).await.map_err(|e| match e {
                CdpError::Timeout => ProbeError::Timeout { ms: timeout_ms },
                e => ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                },
            })?;
            Ok(())
        }

        async fn locate(&mut self, selector: &Selector) -> ProbeResult<bool> {
            self.ensure_open()?;
            let css = selector.to_css();
            match self.page.find_element(css.clone()).await {
                Ok(element) => {
                    let _ = self.elements.insert(css, element);
                    Ok(true)
                }
                Err(e) => {
                    debug!(selector = %css, error = %e, "element not present yet");
                    Ok(false)
                }
            }
        }

        async fn click(&mut self, selector: &Selector) -> ProbeResult<()> {
            let result = self.element(selector).await?.click().await.map(|_| ());
            if let Err(e) = result {
                self.evict(selector);
                return Err(ProbeError::input(selector.to_css(), e.to_string()));
            }
            Ok(())
        }

        async fn type_text(&mut self, selector: &Selector, text: &str) -> ProbeResult<()> {
            let element = self.element(selector).await?;
            // Focus via click, then type into the focused field
            let result = match element.click().await {
                Ok(focused) => focused.type_str(text).await.map(|_| ()),
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                self.evict(selector);
                return Err(ProbeError::input(selector.to_css(), e.to_string()));
            }
            Ok(())
        }

        async fn text(&mut self, selector: &Selector) -> ProbeResult<String> {
            let result = self.element(selector).await?.inner_text().await;
            match result {
                Ok(text) => Ok(text.unwrap_or_default()),
                Err(e) => {
                    self.evict(selector);
                    Err(ProbeError::page(format!(
                        "could not read text of {selector}: {e}"
                    )))
                }
            }
        }

        async fn close(&mut self) -> ProbeResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            self.elements.clear();
            let closed = self.browser.close().await;
            if let Err(e) = self.browser.wait().await {
                warn!(error = %e, "chromium process did not exit cleanly");
            }
            self.handler.abort();
            closed.map(|_| ()).map_err(|e| ProbeError::page(format!("close failed: {e}")))
        }

        fn name(&self) -> &str {
            "chromium"
        }
    }

    impl Drop for ChromiumDriver {
        fn drop(&mut self) {
            // chromiumoxide kills the child process when the browser drops
            self.handler.abort();
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::ChromiumDriver;
