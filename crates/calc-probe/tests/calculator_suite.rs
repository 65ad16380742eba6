//! Full suite runs against the offline calculator model.

use calc_probe::scenario::all_cases;
use calc_probe::{
    CalcCase, CalculatorElement, CalculatorPage, CaseStatus, HarnessConfig, MockDriver,
    ModelDriver, ProbeDriver, ScenarioGroup, Selection, TestHarness, WaitOptions, TARGET_URL,
};
use std::time::Duration;

fn harness() -> TestHarness {
    TestHarness::new(
        HarnessConfig::default().with_wait(
            WaitOptions::default()
                .with_timeout(Duration::from_millis(50))
                .with_poll_interval(Duration::from_millis(5)),
        ),
    )
}

async fn open_page() -> CalculatorPage<ModelDriver> {
    CalculatorPage::open(ModelDriver::new(), TARGET_URL, WaitOptions::default())
        .await
        .map_err(|(_, e)| e)
        .unwrap()
}

#[tokio::test]
async fn every_group_passes_against_model() {
    for group in ScenarioGroup::ALL {
        let cases = Selection::all().with_group(group).cases();
        let report = harness()
            .run(ModelDriver::new(), &cases, |_| {})
            .await
            .unwrap();
        assert!(
            report.all_passed(),
            "group {group} failed:\n{}",
            report.render_text()
        );
        assert_eq!(report.total_count(), group.cases().len());
    }
}

#[tokio::test]
async fn whole_suite_in_one_session() {
    let cases: Vec<&CalcCase> = all_cases().collect();
    let mut names = Vec::new();
    let report = harness()
        .run(ModelDriver::new(), &cases, |o| names.push(o.name.clone()))
        .await
        .unwrap();

    assert_eq!(report.total_count(), 37);
    assert_eq!(report.passed_count(), 37);
    assert_eq!(report.url, TARGET_URL);
    let expected: Vec<String> = cases.iter().map(|c| c.name()).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn filter_selects_single_case() {
    let cases = Selection::all().with_filter("1.8e99").cases();
    assert_eq!(cases.len(), 1);
    let report = harness()
        .run(ModelDriver::new(), &cases, |_| {})
        .await
        .unwrap();
    assert_eq!(report.outcomes[0].status, CaseStatus::Passed);
    assert_eq!(
        report.outcomes[0].actual.as_deref(),
        Some("Result: 1.8e+99")
    );
}

#[tokio::test]
async fn reset_clears_fields_and_label() {
    let mut page = open_page().await;
    let _ = page.execute(&ScenarioGroup::Integers.cases()[0]).await.unwrap();
    page.reset().await.unwrap();

    let driver = page.driver();
    assert_eq!(driver.field(CalculatorElement::FirstOperand), "");
    assert_eq!(driver.field(CalculatorElement::Operator), "");
    assert_eq!(driver.field(CalculatorElement::SecondOperand), "");
    assert_eq!(driver.result(), "");
}

#[tokio::test]
async fn reset_twice_equals_reset_once() {
    let mut page = open_page().await;
    page.enter(CalculatorElement::FirstOperand, "5").await.unwrap();
    page.reset().await.unwrap();
    let once = (
        page.driver().field(CalculatorElement::FirstOperand).to_string(),
        page.driver().result().to_string(),
    );
    page.reset().await.unwrap();
    let twice = (
        page.driver().field(CalculatorElement::FirstOperand).to_string(),
        page.driver().result().to_string(),
    );
    assert_eq!(once, twice);
}

#[tokio::test]
async fn empty_operand_leaves_field_untouched() {
    let mut page = open_page().await;
    let case = &ScenarioGroup::InvalidInput.cases()[0];
    assert_eq!(case.first, "");

    let text = page.execute(case).await.unwrap();
    assert_eq!(text, "Result: invalid input");
    assert_eq!(page.driver().field(CalculatorElement::FirstOperand), "");
    assert_eq!(page.driver().field(CalculatorElement::SecondOperand), "2");
}

#[tokio::test]
async fn cases_do_not_leak_into_each_other() {
    let mut page = open_page().await;
    for case in all_cases() {
        let text = page.execute(case).await.unwrap();
        assert_eq!(text, case.expected, "{case}");
    }
    assert_eq!(page.driver().calculations(), 37);
}

#[tokio::test]
async fn session_released_when_cases_fail() {
    let mut driver = MockDriver::with_elements(CalculatorElement::ALL.map(CalculatorElement::id));
    driver.script_text("result", ["Result: 3", "Result: 0"]);
    driver.fail_on("type:#number2:2");
    let session = driver.session();
    let cases: Vec<&CalcCase> = all_cases().collect();

    let report = harness().run(driver, &cases, |_| {}).await.unwrap();

    assert!(!report.all_passed());
    assert_eq!(report.total_count(), 37);
    assert!(report
        .failures()
        .iter()
        .any(|o| o.actual.is_none() && o.error.is_some()));
    assert!(session.is_closed());
}

#[tokio::test]
async fn setup_on_closed_session_is_fatal() {
    let mut driver = ModelDriver::new();
    driver.navigate(TARGET_URL).await.unwrap();
    driver.close().await.unwrap();

    let err = harness()
        .run(driver, &[], |_| {})
        .await
        .unwrap_err();
    assert!(err.is_fatal());
}
