//! Headless test runner
//!
//! Selects cases by filter, runs them as one batch and hands the settled
//! cases to the output formatter.

use std::sync::Arc;
use tracing::info;

use super::{EngineError, ExecutionEngine};
use crate::models::{BatchSummary, CategoryPath, TestCase};

/// Case selection for headless runs
#[derive(Clone, Debug, Default)]
pub struct CaseFilter {
    /// Category prefix, e.g. `Net/HTTP`
    pub category: Option<CategoryPath>,
    /// Case-insensitive substring of the label, test name or identity
    pub name: Option<String>,
}

impl CaseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, path: &str) -> Self {
        self.category = Some(CategoryPath::parse(path));
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into().to_lowercase());
        self
    }

    pub fn matches(&self, case: &TestCase) -> bool {
        if let Some(prefix) = &self.category {
            if !case.category_path.starts_with(prefix) {
                return false;
            }
        }

        if let Some(needle) = &self.name {
            let haystacks = [
                case.label().to_lowercase(),
                case.test_name.to_lowercase(),
                case.identity.to_string().to_lowercase(),
            ];
            if !haystacks.iter().any(|h| h.contains(needle.as_str())) {
                return false;
            }
        }

        true
    }
}

/// Settled cases of a headless run
#[derive(Debug)]
pub struct RunOutcome {
    pub summary: BatchSummary,
    pub cases: Vec<Arc<TestCase>>,
}

/// Runs filtered cases to completion
pub struct TestRunner {
    engine: ExecutionEngine,
}

impl TestRunner {
    pub fn new(engine: ExecutionEngine) -> Self {
        Self { engine }
    }

    /// Cases matching `filter`, in registry order
    pub fn select(cases: &[Arc<TestCase>], filter: &CaseFilter) -> Vec<Arc<TestCase>> {
        cases
            .iter()
            .filter(|case| filter.matches(case))
            .cloned()
            .collect()
    }

    pub async fn run(
        &self,
        cases: &[Arc<TestCase>],
        filter: &CaseFilter,
    ) -> Result<RunOutcome, EngineError> {
        let selected = Self::select(cases, filter);
        if selected.is_empty() {
            return Err(EngineError::EmptySelection);
        }

        info!("Running {} of {} test cases", selected.len(), cases.len());
        let summary = self.engine.run(selected.clone()).await;

        Ok(RunOutcome {
            summary,
            cases: selected,
        })
    }
}
