//! Test case models
//!
//! Defines the identity, parameters, category path and live status of a
//! discovered test case.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Label used for cases registered without any category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Separator between namespace segments
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Declaring identity of a test: the grouping key of the code view
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    pub namespace: String,
    pub type_name: String,
    pub method: String,
}

impl Identity {
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    /// Namespace split into its non-empty segments
    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .split(NAMESPACE_SEPARATOR)
            .filter(|segment| !segment.is_empty())
    }

    /// `namespace::Type`, or just `Type` for the root namespace
    pub fn qualified_type(&self) -> String {
        if self.namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}{}{}", self.namespace, NAMESPACE_SEPARATOR, self.type_name)
        }
    }

    /// True when both identities are declared by the same type
    pub fn same_declaring_type(&self, other: &Identity) -> bool {
        self.namespace == other.namespace && self.type_name == other.type_name
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.qualified_type(),
            NAMESPACE_SEPARATOR,
            self.method
        )
    }
}

/// Ordered category segments, e.g. `Net/HTTP`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryPath(Vec<String>);

impl CategoryPath {
    /// Parse a `/`-separated path, dropping empty segments
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('/')
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Append the segments of `other` to this path
    pub fn join(&self, other: &CategoryPath) -> Self {
        let mut segments = self.0.clone();
        segments.extend(other.0.iter().cloned());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments used for tree placement; an empty path lands in `Uncategorized`
    pub fn tree_segments(&self) -> Vec<&str> {
        if self.0.is_empty() {
            vec![UNCATEGORIZED]
        } else {
            self.0.iter().map(String::as_str).collect()
        }
    }

    /// True when this path starts with every segment of `prefix`
    pub fn starts_with(&self, prefix: &CategoryPath) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "{UNCATEGORIZED}")
        } else {
            write!(f, "{}", self.0.join("/"))
        }
    }
}

/// A resolved test argument
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
    pub value: serde_json::Value,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            value: value.into(),
        }
    }
}

/// Execution status of a test case
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    NotRun,
    Running,
    Succeeded,
    Failed,
    ExceptionThrown,
}

impl Status {
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::NotRun => "○",
            Status::Running => "◌",
            Status::Succeeded => "✓",
            Status::Failed => "✗",
            Status::ExceptionThrown => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Status::Succeeded)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::NotRun => write!(f, "NOT RUN"),
            Status::Running => write!(f, "RUNNING"),
            Status::Succeeded => write!(f, "PASS"),
            Status::Failed => write!(f, "FAIL"),
            Status::ExceptionThrown => write!(f, "ERROR"),
        }
    }
}

/// Outcome record of a settled case
#[derive(Clone, Debug, PartialEq)]
pub struct CaseResult {
    pub fail_message: Option<String>,
    pub duration: Duration,
}

impl CaseResult {
    pub fn success(duration: Duration) -> Self {
        Self {
            fail_message: None,
            duration,
        }
    }

    pub fn failure(duration: Duration, message: impl Into<String>) -> Self {
        Self {
            fail_message: Some(message.into()),
            duration,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// First line of the failure message, for one-line summaries
    pub fn headline(&self) -> Option<&str> {
        self.fail_message
            .as_deref()
            .and_then(|message| message.lines().find(|line| !line.trim().is_empty()))
            .map(str::trim)
    }
}

#[derive(Debug, Default)]
struct CaseState {
    status: Status,
    result: Option<CaseResult>,
}

/// A discovered test case.
///
/// Descriptive fields are immutable once registered. Status and result sit
/// behind a lock and are written only by the execution engine run that
/// claimed the case.
#[derive(Debug)]
pub struct TestCase {
    pub identity: Identity,
    pub test_name: String,
    pub case_name: Option<String>,
    pub is_default: bool,
    pub parameters: Vec<Parameter>,
    pub category_path: CategoryPath,
    state: RwLock<CaseState>,
}

impl TestCase {
    /// A default case: no parameters, labelled by its test name
    pub fn new(identity: Identity, test_name: impl Into<String>) -> Self {
        Self {
            identity,
            test_name: test_name.into(),
            case_name: None,
            is_default: true,
            parameters: Vec::new(),
            category_path: CategoryPath::default(),
            state: RwLock::new(CaseState::default()),
        }
    }

    /// Turn this into an explicit, named case
    pub fn with_case(mut self, case_name: impl Into<String>, parameters: Vec<Parameter>) -> Self {
        self.case_name = Some(case_name.into());
        self.parameters = parameters;
        self.is_default = false;
        self
    }

    pub fn with_category(mut self, category_path: CategoryPath) -> Self {
        self.category_path = category_path;
        self
    }

    /// Display label: case name, or the test name when absent
    pub fn label(&self) -> &str {
        self.case_name.as_deref().unwrap_or(&self.test_name)
    }

    pub fn parameter_values(&self) -> Vec<serde_json::Value> {
        self.parameters.iter().map(|p| p.value.clone()).collect()
    }

    pub fn status(&self) -> Status {
        self.state.read().status
    }

    pub fn result(&self) -> Option<CaseResult> {
        self.state.read().result.clone()
    }

    /// Status and result read under one lock
    pub fn snapshot(&self) -> (Status, Option<CaseResult>) {
        let state = self.state.read();
        (state.status, state.result.clone())
    }

    /// Move the case to `Running`, clearing any previous result.
    ///
    /// Returns false when the case is already running.
    pub(crate) fn try_claim(&self) -> bool {
        let mut state = self.state.write();
        if state.status == Status::Running {
            return false;
        }
        state.status = Status::Running;
        state.result = None;
        true
    }

    pub(crate) fn settle(&self, status: Status, result: CaseResult) {
        let mut state = self.state.write();
        state.status = status;
        state.result = Some(result);
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label(), self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_qualified_type() {
        let id = Identity::new("net::http", "ClientTests", "check");
        assert_eq!(id.qualified_type(), "net::http::ClientTests");
        assert_eq!(id.to_string(), "net::http::ClientTests::check");

        let root = Identity::new("", "Smoke", "boots");
        assert_eq!(root.qualified_type(), "Smoke");
        assert_eq!(root.namespace_segments().count(), 0);
    }

    #[test]
    fn test_category_path_parse() {
        let path = CategoryPath::parse("Net//HTTP/");
        assert_eq!(path.segments(), &["Net".to_string(), "HTTP".to_string()]);
        assert_eq!(path.to_string(), "Net/HTTP");

        let empty = CategoryPath::parse("");
        assert!(empty.is_empty());
        assert_eq!(empty.tree_segments(), vec![UNCATEGORIZED]);
    }

    #[test]
    fn test_category_join() {
        let base = CategoryPath::parse("Base");
        let joined = base.join(&CategoryPath::parse("Cat1/Cat2"));
        assert_eq!(joined.to_string(), "Base/Cat1/Cat2");
        assert!(joined.starts_with(&base));
    }

    #[test]
    fn test_case_label_falls_back_to_test_name() {
        let id = Identity::new("demo", "Math", "add");
        let plain = TestCase::new(id.clone(), "Addition");
        assert_eq!(plain.label(), "Addition");
        assert!(plain.is_default);

        let named = TestCase::new(id, "Addition").with_case("small", vec![]);
        assert_eq!(named.label(), "small");
        assert!(!named.is_default);
    }

    #[test]
    fn test_claim_rejects_running_case() {
        let case = TestCase::new(Identity::new("", "T", "m"), "m");
        assert!(case.try_claim());
        assert_eq!(case.status(), Status::Running);
        assert!(!case.try_claim());

        case.settle(Status::Succeeded, CaseResult::success(Duration::from_millis(3)));
        assert!(case.try_claim());
        assert!(case.result().is_none());
    }

    #[test]
    fn test_result_headline() {
        let result = CaseResult::failure(Duration::ZERO, "\n  Assertion:\n    x != y\n");
        assert_eq!(result.headline(), Some("Assertion:"));
    }
}
