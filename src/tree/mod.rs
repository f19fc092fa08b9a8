//! Test trees
//!
//! The code view groups cases by where they are declared, the category view
//! by the categories they were registered with.

mod builder;
mod node;

pub use builder::{build_category_view, build_code_view};
pub use node::{Entry, TreeNode};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::models::TestCase;
use crate::registry::Registry;

/// The two views of the explorer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Code,
    Category,
}

impl ViewKind {
    pub fn title(&self) -> &'static str {
        match self {
            ViewKind::Code => "Code View",
            ViewKind::Category => "Category View",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ViewKind::Code => ViewKind::Category,
            ViewKind::Category => ViewKind::Code,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "code" => Some(ViewKind::Code),
            "category" | "categories" => Some(ViewKind::Category),
            _ => None,
        }
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewKind::Code => write!(f, "code"),
            ViewKind::Category => write!(f, "category"),
        }
    }
}

/// Immutable snapshot of the discovered cases and both views
#[derive(Debug, Clone)]
pub struct Explorer {
    cases: Vec<Arc<TestCase>>,
    code: TreeNode,
    category: TreeNode,
}

impl Explorer {
    pub fn new(cases: &[Arc<TestCase>]) -> Self {
        Self {
            cases: cases.to_vec(),
            code: build_code_view(cases),
            category: build_category_view(cases),
        }
    }

    pub fn from_registry(registry: &Registry) -> Self {
        Self::new(registry.cases())
    }

    /// All cases in registration order
    pub fn cases(&self) -> &[Arc<TestCase>] {
        &self.cases
    }

    pub fn root(&self, view: ViewKind) -> &TreeNode {
        match view {
            ViewKind::Code => &self.code,
            ViewKind::Category => &self.category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TestDef;

    #[test]
    fn test_view_kind_parse() {
        assert_eq!(ViewKind::from_str("Code"), Some(ViewKind::Code));
        assert_eq!(ViewKind::from_str("category"), Some(ViewKind::Category));
        assert_eq!(ViewKind::from_str("tree"), None);
        assert_eq!(ViewKind::Code.toggled(), ViewKind::Category);
    }

    #[test]
    fn test_explorer_shares_cases_between_views() {
        let mut registry = Registry::new();
        registry
            .suite("demo", "Math")
            .add(TestDef::sync("adds", |_| Ok(())))
            .unwrap();
        let explorer = Explorer::from_registry(&registry);

        let in_code = explorer.root(ViewKind::Code).cases()[0];
        let in_category = explorer.root(ViewKind::Category).cases()[0];
        assert!(Arc::ptr_eq(in_code, in_category));
        assert!(Arc::ptr_eq(in_code, &explorer.cases()[0]));
        assert_eq!(explorer.root(ViewKind::Code).name, "Code View");
    }
}
