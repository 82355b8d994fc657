use hashlink::LinkedHashMap;

use crate::filesystem::TreeNode;

const BRANCH: &str = "├──";
const LAST_BRANCH: &str = "└──";
const CONTINUATION: &str = "│   ";
const LAST_CONTINUATION: &str = "    ";

/// Renders a tree as ASCII-art lines, one per entry.
///
/// The root node produces no line of its own. Every sibling except the
/// last uses the continuing connector; the last uses the closing one, and
/// its subtree is indented with blanks instead of a vertical bar so the
/// branch visually closes off.
pub fn render_lines(tree: &TreeNode) -> Vec<String> {
    let mut lines = Vec::new();
    if let TreeNode::Directory { children } = tree {
        render_children(children, "", &mut lines);
    }
    lines
}

fn render_children(
    children: &LinkedHashMap<String, TreeNode>,
    prefix: &str,
    lines: &mut Vec<String>,
) {
    let count = children.len();
    for (index, (name, node)) in children.iter().enumerate() {
        let last = index + 1 == count;
        let connector = if last { LAST_BRANCH } else { BRANCH };
        lines.push(format!("{prefix}{connector} {name}"));

        if let TreeNode::Directory { children } = node {
            let continuation = if last { LAST_CONTINUATION } else { CONTINUATION };
            render_children(children, &format!("{prefix}{continuation}"), lines);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(entries: Vec<(&str, TreeNode)>) -> TreeNode {
        TreeNode::Directory {
            children: entries
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        }
    }

    #[test]
    fn test_render_example_tree() {
        let tree = dir(vec![
            ("a.txt", TreeNode::File),
            ("b.txt", TreeNode::File),
            ("sub", dir(vec![("c.txt", TreeNode::File)])),
        ]);

        assert_eq!(
            render_lines(&tree),
            vec!["├── a.txt", "├── b.txt", "└── sub", "    └── c.txt"]
        );
    }

    #[test]
    fn test_open_branch_keeps_vertical_bar() {
        let tree = dir(vec![
            ("first", dir(vec![("inner.txt", TreeNode::File)])),
            ("second", dir(vec![("other.txt", TreeNode::File)])),
        ]);

        assert_eq!(
            render_lines(&tree),
            vec![
                "├── first",
                "│   └── inner.txt",
                "└── second",
                "    └── other.txt",
            ]
        );
    }

    #[test]
    fn test_deep_nesting_accumulates_prefixes() {
        let tree = dir(vec![
            (
                "outer",
                dir(vec![
                    ("inner", dir(vec![("leaf.txt", TreeNode::File)])),
                    ("z.txt", TreeNode::File),
                ]),
            ),
            ("tail.txt", TreeNode::File),
        ]);

        assert_eq!(
            render_lines(&tree),
            vec![
                "├── outer",
                "│   ├── inner",
                "│   │   └── leaf.txt",
                "│   └── z.txt",
                "└── tail.txt",
            ]
        );
    }

    #[test]
    fn test_empty_tree_renders_nothing() {
        let tree = dir(vec![]);

        assert!(render_lines(&tree).is_empty());
    }

    #[test]
    fn test_empty_subdirectory_renders_single_line() {
        let tree = dir(vec![("empty", dir(vec![]))]);

        assert_eq!(render_lines(&tree), vec!["└── empty"]);
    }

    #[test]
    fn test_file_node_renders_nothing() {
        assert!(render_lines(&TreeNode::File).is_empty());
    }
}
