//! Tree rendering

use std::sync::Arc;

use super::glyphs::{cross, line};
use super::label::{case_label, disambiguation_suffix};
use super::RenderError;
use crate::models::{Status, TestCase};
use crate::navigation::{format_path, resolve, Expansion};
use crate::tree::TreeNode;

/// One drawn row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub text: String,
    /// Status of the case on this row; `None` for node rows
    pub status: Option<Status>,
    /// The row's branch carries the `>` marker
    pub on_path: bool,
    /// The row is the selected entry itself
    pub cursor: bool,
}

/// Result of drawing a view
#[derive(Debug, Clone, Default)]
pub struct RenderedTree {
    pub lines: Vec<TreeLine>,
    /// Index into `lines` of the selected entry
    pub cursor: Option<usize>,
    pub selected_label: String,
    /// Selection path as `0 -> 2 -> 1`
    pub selected_path: String,
}

impl RenderedTree {
    /// All rows joined by newlines
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Draw `root` with the entries on `path` marked.
///
/// An empty path draws without a selection. Nodes open when expanded or when
/// the selection passes through them.
pub fn render_tree(
    root: &TreeNode,
    path: &[usize],
    expansion: &Expansion,
) -> Result<RenderedTree, RenderError> {
    let selected_label = if path.is_empty() {
        String::new()
    } else {
        resolve(path, root)?.label().to_string()
    };

    let mut renderer = Renderer {
        expansion,
        lines: Vec::new(),
        cursor: None,
    };
    renderer.push(root.name.clone(), None, false, false);

    let selection = if path.is_empty() { None } else { Some(path) };
    renderer.entries(root, &mut Vec::new(), "", selection)?;

    Ok(RenderedTree {
        lines: renderer.lines,
        cursor: renderer.cursor,
        selected_label,
        selected_path: format_path(path),
    })
}

/// Fully expanded drawing without a selection
pub fn render_listing(root: &TreeNode) -> Result<String, RenderError> {
    Ok(render_tree(root, &[], &Expansion::all())?.text())
}

struct Renderer<'e> {
    expansion: &'e Expansion,
    lines: Vec<TreeLine>,
    cursor: Option<usize>,
}

/// Selection state of one entry
struct Mark<'p> {
    on_path: bool,
    /// Remaining selection below the entry, when on the path
    rest: Option<&'p [usize]>,
}

impl Mark<'_> {
    fn is_cursor(&self) -> bool {
        self.on_path && self.rest.map_or(true, <[usize]>::is_empty)
    }

    fn passes_through(&self) -> bool {
        self.rest.map_or(false, |rest| !rest.is_empty())
    }
}

fn mark_of<'p>(selection: Option<&'p [usize]>, index: usize) -> Mark<'p> {
    match selection {
        Some([first, rest @ ..]) if *first == index => Mark {
            on_path: true,
            rest: Some(rest),
        },
        _ => Mark {
            on_path: false,
            rest: None,
        },
    }
}

impl Renderer<'_> {
    fn push(&mut self, text: String, status: Option<Status>, on_path: bool, cursor: bool) {
        if cursor {
            self.cursor = Some(self.lines.len());
        }
        self.lines.push(TreeLine {
            text,
            status,
            on_path,
            cursor,
        });
    }

    fn push_case(&mut self, text: String, case: &TestCase, mark: &Mark<'_>) {
        self.push(text, Some(case.status()), mark.on_path, mark.is_cursor());
    }

    fn is_open(&self, path: &[usize], mark: &Mark<'_>) -> bool {
        mark.passes_through() || self.expansion.is_expanded(path)
    }

    fn entries(
        &mut self,
        node: &TreeNode,
        node_path: &mut Vec<usize>,
        prefix: &str,
        selection: Option<&[usize]>,
    ) -> Result<(), RenderError> {
        let thick = node.has_branches();
        let leaves = node.leaf_cases.len();
        let holders = node.holder_nodes.len();
        let children = node.children.len();
        let mut index = 0;

        for (i, case) in node.leaf_cases.iter().enumerate() {
            let is_last = i + 1 == leaves && holders == 0 && children == 0;
            let mark = mark_of(selection, index);
            let glyph = cross(is_last, thick, false, mark.on_path)?;
            self.push_case(format!("{prefix}{glyph} {}", case_label(case)), case, &mark);
            index += 1;
        }

        for (i, holder) in node.holder_nodes.iter().enumerate() {
            let is_last = i + 1 == holders && children == 0;
            let mark = mark_of(selection, index);
            let glyph = cross(is_last, thick, true, mark.on_path)?;
            self.push(
                format!("{prefix}{glyph} {}", holder.name),
                None,
                mark.on_path,
                mark.is_cursor(),
            );

            node_path.push(index);
            if self.is_open(node_path, &mark) {
                let inner = format!("{prefix}{} ", line(is_last, thick));
                self.holder_leaves(&holder.leaf_cases, &inner, mark.rest)?;
            }
            node_path.pop();
            index += 1;
        }

        for (i, child) in node.children.iter().enumerate() {
            let is_last = i + 1 == children;
            let mark = mark_of(selection, index);
            let glyph = cross(is_last, thick, true, mark.on_path)?;
            self.push(
                format!("{prefix}{glyph} {}", child.name),
                None,
                mark.on_path,
                mark.is_cursor(),
            );

            node_path.push(index);
            if self.is_open(node_path, &mark) {
                let inner = format!("{prefix}{} ", line(is_last, thick));
                self.entries(child, node_path, &inner, mark.rest)?;
            }
            node_path.pop();
            index += 1;
        }

        Ok(())
    }

    fn holder_leaves(
        &mut self,
        cases: &[Arc<TestCase>],
        prefix: &str,
        selection: Option<&[usize]>,
    ) -> Result<(), RenderError> {
        for (i, case) in cases.iter().enumerate() {
            let is_last = i + 1 == cases.len();
            let mark = mark_of(selection, i);
            let glyph = cross(is_last, false, false, mark.on_path)?;
            let text = format!(
                "{prefix}{glyph} {}{}",
                case_label(case),
                disambiguation_suffix(case, cases)
            );
            self.push_case(text, case, &mark);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;
    use crate::navigation::NavError;
    use crate::tree::build_category_view;

    fn case(namespace: &str, type_name: &str, method: &str) -> Arc<TestCase> {
        Arc::new(
            TestCase::new(Identity::new(namespace, type_name, method), method)
                .with_category(crate::models::CategoryPath::parse("Net/HTTP")),
        )
    }

    fn check_view() -> TreeNode {
        build_category_view(&[
            case("net::http", "ClientTests", "Check"),
            case("net::http", "ServerTests", "Check"),
        ])
    }

    #[test]
    fn test_holder_listing() {
        let text = render_listing(&check_view()).unwrap();
        let expected = [
            "Category View",
            "╚═ Net",
            "   ╚═ HTTP",
            "      ╚═ Check",
            "         ├─ Check [ClientTests]",
            "         └─ Check [ServerTests]",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_selection_marks_each_depth() {
        let root = check_view();
        let tree = render_tree(&root, &[0, 0, 0, 1], &Expansion::default()).unwrap();
        let expected = [
            "Category View",
            "╚> Net",
            "   ╚> HTTP",
            "      ╚> Check",
            "         ├─ Check [ClientTests]",
            "         └> Check [ServerTests]",
        ]
        .join("\n");
        assert_eq!(tree.text(), expected);
        assert_eq!(tree.cursor, Some(5));
        assert_eq!(tree.selected_label, "Check");
        assert_eq!(tree.selected_path, "0 -> 0 -> 0 -> 1");
        assert_eq!(tree.lines[5].status, Some(Status::NotRun));
        assert!(tree.lines[1].on_path && !tree.lines[1].cursor);
    }

    #[test]
    fn test_mixed_weights() {
        let mut root = TreeNode::new("root");
        root.leaf_cases.push(case("", "T", "a"));
        let k = root.child_mut("k");
        k.leaf_cases.push(case("", "T", "b"));
        k.leaf_cases.push(case("", "T", "c"));
        root.child_mut("z");

        let text = render_listing(&root).unwrap();
        let expected = [
            "root", "╟─ a", "╠═ k", "║  ├─ b", "║  └─ c", "╚═ z",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_collapsed_nodes_show_header_only() {
        let mut root = TreeNode::new("root");
        root.child_mut("k").leaf_cases.push(case("", "T", "b"));
        root.child_mut("z").leaf_cases.push(case("", "T", "c"));

        let tree = render_tree(&root, &[1], &Expansion::default()).unwrap();
        assert_eq!(tree.text(), "root\n╠═ k\n╚> z");
        assert_eq!(tree.selected_label, "z");

        // the selection opens every node it passes through
        let tree = render_tree(&root, &[1, 0], &Expansion::default()).unwrap();
        assert_eq!(tree.text(), "root\n╠═ k\n╚> z\n   └> c");
        assert_eq!(tree.cursor, Some(3));
    }

    #[test]
    fn test_invalid_path_is_error() {
        let root = check_view();
        let err = render_tree(&root, &[4], &Expansion::default()).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Navigation(NavError::InvalidIndex { .. })
        ));
    }
}
