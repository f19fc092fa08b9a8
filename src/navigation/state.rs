//! Navigation state of the explorer

use std::collections::HashSet;

use super::{resolve, NavError, Selection};
use crate::tree::{Entry, TreeNode, ViewKind};

/// Expanded flags of one view, keyed by node path
#[derive(Debug, Clone, Default)]
pub struct Expansion {
    open_by_default: bool,
    toggled: HashSet<Vec<usize>>,
}

impl Expansion {
    pub fn new(open_by_default: bool) -> Self {
        Self {
            open_by_default,
            toggled: HashSet::new(),
        }
    }

    /// Every node open
    pub fn all() -> Self {
        Self::new(true)
    }

    pub fn is_expanded(&self, path: &[usize]) -> bool {
        self.open_by_default != self.toggled.contains(path)
    }

    pub fn set(&mut self, path: &[usize], expanded: bool) {
        if self.is_expanded(path) != expanded {
            self.toggle(path);
        }
    }

    pub fn toggle(&mut self, path: &[usize]) {
        if !self.toggled.remove(path) {
            self.toggled.insert(path.to_vec());
        }
    }
}

/// Active view, selection path and expanded flags
#[derive(Debug, Clone)]
pub struct NavigationState {
    view: ViewKind,
    path: Vec<usize>,
    code: Expansion,
    category: Expansion,
    selecting_leaf: bool,
}

impl NavigationState {
    pub fn new(view: ViewKind, expand_all: bool) -> Self {
        Self {
            view,
            path: vec![0],
            code: Expansion::new(expand_all),
            category: Expansion::new(expand_all),
            selecting_leaf: false,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// True when the path addresses a test case rather than a node
    pub fn selecting_leaf(&self) -> bool {
        self.selecting_leaf
    }

    /// Expanded flags of the active view
    pub fn expansion(&self) -> &Expansion {
        match self.view {
            ViewKind::Code => &self.code,
            ViewKind::Category => &self.category,
        }
    }

    fn expansion_mut(&mut self) -> &mut Expansion {
        match self.view {
            ViewKind::Code => &mut self.code,
            ViewKind::Category => &mut self.category,
        }
    }

    pub fn resolve<'a>(&self, root: &'a TreeNode) -> Result<Selection<'a>, NavError> {
        resolve(&self.path, root)
    }

    /// Move the last index by `delta`, stopping at either end
    pub fn move_sibling(&mut self, root: &TreeNode, delta: isize) -> Result<(), NavError> {
        let count = self.parent(root)?.entry_count();
        if count == 0 {
            return Ok(());
        }

        if let Some(last) = self.path.last_mut() {
            let moved = (*last as isize).saturating_add(delta);
            *last = moved.clamp(0, count as isize - 1) as usize;
        }
        self.refresh(root)
    }

    /// Open the addressed node and step into its first entry
    pub fn expand(&mut self, root: &TreeNode) -> Result<(), NavError> {
        if let Selection::Node(node) = self.resolve(root)? {
            let path = self.path.clone();
            self.expansion_mut().set(&path, true);
            if !node.is_empty() {
                self.path.push(0);
            }
        }
        self.refresh(root)
    }

    /// Step back to the parent node
    pub fn collapse(&mut self, root: &TreeNode) -> Result<(), NavError> {
        if self.path.len() > 1 {
            self.path.pop();
        }
        self.refresh(root)
    }

    /// Flip to the other view and select its first entry
    pub fn switch_view(&mut self, root: &TreeNode) {
        self.view = self.view.toggled();
        self.path = vec![0];
        self.clamp(root);
    }

    /// Flip the expanded flag of the addressed node. Returns false on a case.
    pub fn toggle_expanded(&mut self, root: &TreeNode) -> Result<bool, NavError> {
        match self.resolve(root)? {
            Selection::Node(_) => {
                let path = self.path.clone();
                self.expansion_mut().toggle(&path);
                Ok(true)
            }
            Selection::Case(_) => Ok(false),
        }
    }

    /// Pull every index back into range of `root`
    pub fn clamp(&mut self, root: &TreeNode) {
        let mut node = root;
        let mut clamped = Vec::with_capacity(self.path.len());

        for &index in &self.path {
            if node.is_empty() {
                break;
            }
            let index = index.min(node.entry_count() - 1);
            clamped.push(index);
            match node.entry(index) {
                Some(Entry::Holder(next)) | Some(Entry::Child(next)) => node = next,
                _ => break,
            }
        }

        if clamped.is_empty() {
            clamped.push(0);
        }
        self.path = clamped;
        self.selecting_leaf = self
            .resolve(root)
            .map(|selection| selection.is_case())
            .unwrap_or(false);
    }

    fn parent<'a>(&self, root: &'a TreeNode) -> Result<&'a TreeNode, NavError> {
        let parent_path = &self.path[..self.path.len().saturating_sub(1)];
        if parent_path.is_empty() {
            return Ok(root);
        }
        match resolve(parent_path, root)? {
            Selection::Node(node) => Ok(node),
            Selection::Case(_) => Err(NavError::PastLeaf {
                path: super::format_path(&self.path),
                depth: parent_path.len() - 1,
            }),
        }
    }

    fn refresh(&mut self, root: &TreeNode) -> Result<(), NavError> {
        self.selecting_leaf = self.resolve(root)?.is_case();
        Ok(())
    }
}
