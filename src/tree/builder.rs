//! View construction
//!
//! Both views are built once from the registry's case list and never change
//! afterwards. Nodes hold `Arc`s of the shared cases, so status updates made by
//! the engine show up in both views.

use std::sync::Arc;
use tracing::debug;

use super::{TreeNode, ViewKind};
use crate::models::TestCase;

/// Group cases by namespace segments, then type, then method.
///
/// Default cases sit directly under their type node; explicit cases get a
/// method node of their own.
pub fn build_code_view(cases: &[Arc<TestCase>]) -> TreeNode {
    let mut root = TreeNode::new(ViewKind::Code.title());

    for case in cases {
        let mut node = &mut root;
        for segment in case.identity.namespace_segments() {
            node = node.child_mut(segment);
        }
        node = node.child_mut(&case.identity.type_name);
        if !case.is_default {
            node = node.child_mut(&case.identity.method);
        }
        node.leaf_cases.push(Arc::clone(case));
    }

    debug!(
        "Built code view: {} cases, height {}",
        cases.len(),
        root.height()
    );
    root
}

/// Group cases by category segments.
///
/// Cases that share a method name and category with a case from another type
/// are gathered under a holder node named after the method.
pub fn build_category_view(cases: &[Arc<TestCase>]) -> TreeNode {
    let mut root = TreeNode::new(ViewKind::Category.title());

    let mut sorted: Vec<&Arc<TestCase>> = cases.iter().collect();
    sorted.sort_by(|a, b| {
        (&a.test_name, &a.category_path).cmp(&(&b.test_name, &b.category_path))
    });

    for case in sorted {
        let mut node = &mut root;
        for segment in case.category_path.tree_segments() {
            node = node.child_mut(segment);
        }

        if collides(case, cases) {
            node = node.holder_mut(&case.identity.method);
        }
        node.leaf_cases.push(Arc::clone(case));
    }

    debug!(
        "Built category view: {} cases, {} top-level categories",
        cases.len(),
        root.children.len()
    );
    root
}

/// True when another case would land next to `case` with the same method name
/// but a different declaring type
fn collides(case: &Arc<TestCase>, cases: &[Arc<TestCase>]) -> bool {
    cases.iter().any(|other| {
        !Arc::ptr_eq(other, case)
            && other.identity.method == case.identity.method
            && other.category_path == case.category_path
            && !other.identity.same_declaring_type(&case.identity)
    })
}
