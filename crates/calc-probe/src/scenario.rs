//! Scenario tables.
//!
//! Every case is four literals: the two operands, the operator and the
//! exact result label the page must show. An empty field value means the
//! field is left untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One parameterized calculator case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CalcCase {
    /// Group the case belongs to
    pub group: ScenarioGroup,
    /// Text for the first operand field
    pub first: &'static str,
    /// Text for the operator field
    pub operator: &'static str,
    /// Text for the second operand field
    pub second: &'static str,
    /// Exact result label text
    pub expected: &'static str,
}

impl CalcCase {
    const fn new(
        group: ScenarioGroup,
        first: &'static str,
        operator: &'static str,
        second: &'static str,
        expected: &'static str,
    ) -> Self {
        Self {
            group,
            first,
            operator,
            second,
            expected,
        }
    }

    /// Stable display name, `<group>::<first> <op> <second>`
    #[must_use]
    pub fn name(&self) -> String {
        format!(
            "{}::{} {} {}",
            self.group.name(),
            show(self.first),
            show(self.operator),
            show(self.second)
        )
    }
}

impl fmt::Display for CalcCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn show(field: &str) -> &str {
    if field.is_empty() {
        "<empty>"
    } else {
        field
    }
}

/// The scenario groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioGroup {
    /// Whole-number arithmetic
    Integers,
    /// Decimal operands
    Decimals,
    /// Exponential notation
    Exponential,
    /// Missing or non-numeric operands
    InvalidInput,
    /// Unsupported operators
    InvalidOperation,
    /// Infinity semantics
    Infinity,
}

impl ScenarioGroup {
    /// Every group in execution order
    pub const ALL: [Self; 6] = [
        Self::Integers,
        Self::Decimals,
        Self::Exponential,
        Self::InvalidInput,
        Self::InvalidOperation,
        Self::Infinity,
    ];

    /// Name used on the command line and in case names
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Integers => "integers",
            Self::Decimals => "decimals",
            Self::Exponential => "exponential",
            Self::InvalidInput => "invalid-input",
            Self::InvalidOperation => "invalid-operation",
            Self::Infinity => "infinity",
        }
    }

    /// Human description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Integers => "positive integers",
            Self::Decimals => "positive decimals",
            Self::Exponential => "exponential notation",
            Self::InvalidInput => "invalid inputs",
            Self::InvalidOperation => "invalid operation",
            Self::Infinity => "infinity handling",
        }
    }

    /// Look a group up by name, ignoring case
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.name().eq_ignore_ascii_case(name))
    }

    /// The group's cases in table order
    #[must_use]
    pub const fn cases(self) -> &'static [CalcCase] {
        match self {
            Self::Integers => INTEGERS,
            Self::Decimals => DECIMALS,
            Self::Exponential => EXPONENTIAL,
            Self::InvalidInput => INVALID_INPUT,
            Self::InvalidOperation => INVALID_OPERATION,
            Self::Infinity => INFINITY,
        }
    }
}

impl fmt::Display for ScenarioGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const INTEGERS: &[CalcCase] = &[
    CalcCase::new(ScenarioGroup::Integers, "1", "+", "2", "Result: 3"),
    CalcCase::new(ScenarioGroup::Integers, "1", "-", "2", "Result: -1"),
    CalcCase::new(ScenarioGroup::Integers, "1", "*", "2", "Result: 2"),
    CalcCase::new(ScenarioGroup::Integers, "6", "/", "2", "Result: 3"),
];

const DECIMALS: &[CalcCase] = &[
    CalcCase::new(ScenarioGroup::Decimals, "1.22", "+", "2.11", "Result: 3.33"),
    CalcCase::new(ScenarioGroup::Decimals, "1.899", "-", "0.888", "Result: 1.011"),
    CalcCase::new(ScenarioGroup::Decimals, "2.222", "*", "2.666", "Result: 5.923852"),
    CalcCase::new(
        ScenarioGroup::Decimals,
        "6.6666",
        "/",
        "-2.2e222",
        "Result: -3.03027272727e-222",
    ),
];

const EXPONENTIAL: &[CalcCase] = &[
    CalcCase::new(ScenarioGroup::Exponential, "1.2e2", "+", "2.11", "Result: 122.11"),
    CalcCase::new(ScenarioGroup::Exponential, "1.8e99", "-", "0.888", "Result: 1.8e+99"),
    CalcCase::new(ScenarioGroup::Exponential, "2.2e22", "*", "2.666", "Result: 5.8652e+22"),
    CalcCase::new(ScenarioGroup::Exponential, "1.5e53", "/", "-125", "Result: -1.2e+51"),
];

const INVALID_INPUT: &[CalcCase] = &[
    CalcCase::new(ScenarioGroup::InvalidInput, "", "+", "2", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "", "-", "2", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "1", "*", "", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "1", "/", "", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "1", "/", "qwe", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "qqqq", "/", "2", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "qqqq", "/", "ddd", "Result: invalid input"),
    CalcCase::new(ScenarioGroup::InvalidInput, "1.3", "/", "ssss", "Result: invalid input"),
];

const INVALID_OPERATION: &[CalcCase] = &[
    CalcCase::new(ScenarioGroup::InvalidOperation, "1", "@", "2", "Result: invalid operation"),
    CalcCase::new(ScenarioGroup::InvalidOperation, "1", "dsd", "2", "Result: invalid operation"),
    CalcCase::new(ScenarioGroup::InvalidOperation, "1", "@####", "2", "Result: invalid operation"),
    CalcCase::new(ScenarioGroup::InvalidOperation, "1", "", "2", "Result: invalid operation"),
    CalcCase::new(ScenarioGroup::InvalidOperation, "1", "!!!!", "2", "Result: invalid operation"),
];

const INFINITY: &[CalcCase] = &[
    CalcCase::new(ScenarioGroup::Infinity, "Infinity", "+", "2", "Result: Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "Infinity", "-", "2", "Result: Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "Infinity", "*", "2", "Result: Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "Infinity", "/", "2", "Result: Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "1", "+", "Infinity", "Result: Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "1", "-", "Infinity", "Result: -Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "1", "*", "Infinity", "Result: Infinity"),
    CalcCase::new(ScenarioGroup::Infinity, "1", "/", "Infinity", "Result: 0"),
    CalcCase::new(ScenarioGroup::Infinity, "Infinity", "+", "Infinity", "Result: Infinity"),
    CalcCase::new(
        ScenarioGroup::Infinity,
        "Infinity",
        "-",
        "Infinity",
        "Result: invalid calculation",
    ),
    CalcCase::new(ScenarioGroup::Infinity, "Infinity", "*", "Infinity", "Result: Infinity"),
    CalcCase::new(
        ScenarioGroup::Infinity,
        "Infinity",
        "/",
        "Infinity",
        "Result: invalid calculation",
    ),
];

/// Every case of every group, in execution order
pub fn all_cases() -> impl Iterator<Item = &'static CalcCase> {
    ScenarioGroup::ALL
        .into_iter()
        .flat_map(|group| group.cases().iter())
}

/// Which cases a run executes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Groups to include (empty = all)
    pub groups: Vec<ScenarioGroup>,
    /// Substring the case name must contain
    pub filter: Option<String>,
}

impl Selection {
    /// Select everything
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Add a group
    #[must_use]
    pub fn with_group(mut self, group: ScenarioGroup) -> Self {
        if !self.groups.contains(&group) {
            self.groups.push(group);
        }
        self
    }

    /// Set the name filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Whether `case` is selected
    #[must_use]
    pub fn matches(&self, case: &CalcCase) -> bool {
        let in_group = self.groups.is_empty() || self.groups.contains(&case.group);
        let named = self
            .filter
            .as_deref()
            .map_or(true, |filter| case.name().contains(filter));
        in_group && named
    }

    /// Selected cases, in table order regardless of the order groups were
    /// added
    #[must_use]
    pub fn cases(&self) -> Vec<&'static CalcCase> {
        all_cases().filter(|case| self.matches(case)).collect()
    }
}
