//! Navigation over a view
//!
//! A navigation path holds one index per depth. Each index addresses the
//! entries of a node in the order leaf cases, holder nodes, children.

mod state;

pub use state::{Expansion, NavigationState};

use std::sync::Arc;
use thiserror::Error;

use crate::models::TestCase;
use crate::tree::{Entry, TreeNode};

/// Navigation errors. A path that does not resolve is a bug in the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavError {
    #[error("empty navigation path")]
    EmptyPath,

    #[error("invalid index {index} at depth {depth} of path [{path}] ({len} entries)")]
    InvalidIndex {
        path: String,
        depth: usize,
        index: usize,
        len: usize,
    },

    #[error("path [{path}] continues past a test case at depth {depth}")]
    PastLeaf { path: String, depth: usize },
}

/// What a navigation path points at
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Case(&'a Arc<TestCase>),
    Node(&'a TreeNode),
}

impl<'a> Selection<'a> {
    pub fn is_case(&self) -> bool {
        matches!(self, Selection::Case(_))
    }

    /// Case label or node name
    pub fn label(&self) -> &'a str {
        match *self {
            Selection::Case(case) => case.label(),
            Selection::Node(node) => node.name.as_str(),
        }
    }

    /// Every case at or below the selection
    pub fn cases(&self) -> Vec<Arc<TestCase>> {
        match self {
            Selection::Case(case) => vec![Arc::clone(case)],
            Selection::Node(node) => node.cases().into_iter().cloned().collect(),
        }
    }
}

/// Render a path as `0 -> 2 -> 1`
pub fn format_path(path: &[usize]) -> String {
    path.iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Walk `path` from `root`.
///
/// Out-of-range indices are reported, never clamped.
pub fn resolve<'a>(path: &[usize], root: &'a TreeNode) -> Result<Selection<'a>, NavError> {
    if path.is_empty() {
        return Err(NavError::EmptyPath);
    }

    let mut node = root;
    for (depth, &index) in path.iter().enumerate() {
        match node.entry(index) {
            Some(Entry::Leaf(case)) => {
                if depth + 1 != path.len() {
                    return Err(NavError::PastLeaf {
                        path: format_path(path),
                        depth,
                    });
                }
                return Ok(Selection::Case(case));
            }
            Some(Entry::Holder(next)) | Some(Entry::Child(next)) => node = next,
            None => {
                return Err(NavError::InvalidIndex {
                    path: format_path(path),
                    depth,
                    index,
                    len: node.entry_count(),
                })
            }
        }
    }

    Ok(Selection::Node(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;

    fn case(type_name: &str, method: &str) -> Arc<TestCase> {
        Arc::new(TestCase::new(Identity::new("ns", type_name, method), method))
    }

    // root
    //   leaf a
    //   holder h { leaf b (T), leaf b (U) }
    //   child k { leaf d }
    fn tree() -> TreeNode {
        let mut root = TreeNode::new("root");
        root.leaf_cases.push(case("T", "a"));
        let holder = root.holder_mut("h");
        holder.leaf_cases.push(case("T", "b"));
        holder.leaf_cases.push(case("U", "b"));
        root.child_mut("k").leaf_cases.push(case("T", "d"));
        root
    }

    #[test]
    fn test_resolve_each_segment() {
        let root = tree();
        assert_eq!(resolve(&[0], &root).unwrap().label(), "a");
        assert_eq!(resolve(&[1], &root).unwrap().label(), "h");
        assert_eq!(resolve(&[1, 1], &root).unwrap().label(), "b");
        assert_eq!(resolve(&[2], &root).unwrap().label(), "k");
        assert_eq!(resolve(&[2, 0], &root).unwrap().label(), "d");
        assert!(resolve(&[2, 0], &root).unwrap().is_case());
    }

    #[test]
    fn test_resolve_rejects_out_of_range() {
        let root = tree();
        let err = resolve(&[3], &root).unwrap_err();
        assert_eq!(
            err,
            NavError::InvalidIndex {
                path: "3".to_string(),
                depth: 0,
                index: 3,
                len: 3
            }
        );
        assert!(matches!(
            resolve(&[2, 5], &root),
            Err(NavError::InvalidIndex { depth: 1, .. })
        ));
        assert!(matches!(
            resolve(&[0, 0], &root),
            Err(NavError::PastLeaf { depth: 0, .. })
        ));
        assert_eq!(resolve(&[], &root).unwrap_err(), NavError::EmptyPath);
    }

    #[test]
    fn test_selection_cases() {
        let root = tree();
        assert_eq!(resolve(&[1], &root).unwrap().cases().len(), 2);
        assert_eq!(resolve(&[0], &root).unwrap().cases().len(), 1);
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[0, 2, 1]), "0 -> 2 -> 1");
        assert_eq!(format_path(&[]), "");
    }
}
