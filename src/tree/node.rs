//! Tree node shared by both views

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::TestCase;

/// A named node of a view.
///
/// Entries are addressed as `leaf_cases ++ holder_nodes ++ children`.
#[derive(Debug, Clone, Default)]
pub struct TreeNode {
    pub name: String,
    pub leaf_cases: Vec<Arc<TestCase>>,
    /// Disambiguation groups of same-named tests from different types
    pub holder_nodes: Vec<TreeNode>,
    pub children: Vec<TreeNode>,
}

/// Which of the three entry segments an index falls into
#[derive(Debug, Clone, Copy)]
pub enum Entry<'a> {
    Leaf(&'a Arc<TestCase>),
    Holder(&'a TreeNode),
    Child(&'a TreeNode),
}

impl<'a> Entry<'a> {
    /// The node behind this entry, if it is not a case
    pub fn node(self) -> Option<&'a TreeNode> {
        match self {
            Entry::Leaf(_) => None,
            Entry::Holder(node) | Entry::Child(node) => Some(node),
        }
    }
}

impl TreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of addressable entries directly below this node
    pub fn entry_count(&self) -> usize {
        self.leaf_cases.len() + self.holder_nodes.len() + self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// True when the node has holders or children and draws with thick lines
    pub fn has_branches(&self) -> bool {
        !self.holder_nodes.is_empty() || !self.children.is_empty()
    }

    /// Resolve a flat index into the leaf, holder or child segment
    pub fn entry(&self, index: usize) -> Option<Entry<'_>> {
        let mut index = index;
        if let Some(case) = self.leaf_cases.get(index) {
            return Some(Entry::Leaf(case));
        }
        index -= self.leaf_cases.len();
        if let Some(holder) = self.holder_nodes.get(index) {
            return Some(Entry::Holder(holder));
        }
        index -= self.holder_nodes.len();
        self.children.get(index).map(Entry::Child)
    }

    /// Child by name, created at the end when missing
    pub fn child_mut(&mut self, name: &str) -> &mut TreeNode {
        let index = find_or_push(&mut self.children, name);
        &mut self.children[index]
    }

    /// Holder by name, created at the end when missing
    pub fn holder_mut(&mut self, name: &str) -> &mut TreeNode {
        let index = find_or_push(&mut self.holder_nodes, name);
        &mut self.holder_nodes[index]
    }

    pub fn child(&self, name: &str) -> Option<&TreeNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn holder(&self, name: &str) -> Option<&TreeNode> {
        self.holder_nodes.iter().find(|h| h.name == name)
    }

    /// Levels from this node down to its deepest leaf, counting this node
    pub fn height(&self) -> usize {
        let below = self
            .holder_nodes
            .iter()
            .chain(self.children.iter())
            .map(TreeNode::height)
            .max()
            .unwrap_or(0);
        below + 1
    }

    /// Every case below this node, in render order
    pub fn cases(&self) -> Vec<&Arc<TestCase>> {
        let mut out = Vec::new();
        self.collect_cases(&mut out);
        out
    }

    fn collect_cases<'a>(&'a self, out: &mut Vec<&'a Arc<TestCase>>) {
        out.extend(self.leaf_cases.iter());
        for node in self.holder_nodes.iter().chain(self.children.iter()) {
            node.collect_cases(out);
        }
    }

    /// Case count per status for everything below this node
    pub fn status_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for case in self.cases() {
            *counts.entry(case.status().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

fn find_or_push(nodes: &mut Vec<TreeNode>, name: &str) -> usize {
    match nodes.iter().position(|n| n.name == name) {
        Some(index) => index,
        None => {
            nodes.push(TreeNode::new(name));
            nodes.len() - 1
        }
    }
}
