//! Live run against the hosted page in real Chromium.
//!
//! Needs a Chromium binary and network access:
//!
//! ```text
//! cargo test -p calc-probe --features browser --test live_page -- --ignored
//! ```

use calc_probe::scenario::all_cases;
use calc_probe::{BrowserConfig, CalcCase, ChromiumDriver, HarnessConfig, TestHarness};

fn browser_config() -> BrowserConfig {
    let config = BrowserConfig::default().with_no_sandbox();
    match std::env::var("CHROMIUM_PATH") {
        Ok(path) => config.with_chromium_path(path),
        Err(_) => config,
    }
}

#[tokio::test]
#[ignore = "requires chromium and network access"]
async fn hosted_calculator_passes_every_case() {
    let driver = ChromiumDriver::launch(browser_config()).await.unwrap();
    let cases: Vec<&CalcCase> = all_cases().collect();

    let report = TestHarness::new(HarnessConfig::default())
        .run(driver, &cases, |outcome| {
            eprintln!("{} {}", outcome.status.label(), outcome.name);
        })
        .await
        .unwrap();

    assert!(report.all_passed(), "{}", report.render_text());
}

#[tokio::test]
#[ignore = "requires chromium"]
async fn unreachable_page_fails_setup() {
    let driver = ChromiumDriver::launch(browser_config()).await.unwrap();
    let err = TestHarness::new(HarnessConfig::default().with_url("http://127.0.0.1:9/"))
        .run(driver, &[], |_| {})
        .await
        .unwrap_err();
    assert!(err.is_fatal());
}
