use std::fs;
use std::path::{Path, PathBuf};

use hashlink::LinkedHashMap;
use snafu::{ResultExt, Snafu};

use crate::ext::BestEffortPathExt;

/// Version-control bookkeeping directory, excluded from all output.
const RESERVED_DIR: &str = ".git";

/// Represents one filesystem entry encountered during traversal.
///
/// Directory children are kept in an insertion-ordered map populated in
/// sorted name order, so iteration order is the visitation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File,
    Directory {
        children: LinkedHashMap<String, TreeNode>,
    },
}

impl TreeNode {
    /// Builds the tree for `root` in a single recursive pass.
    ///
    /// The root node itself is anonymous; its children are the top-level
    /// entries of the directory. Siblings are visited in ascending byte
    /// order of their names, and any entry named `.git` is skipped at
    /// every depth. Entries that are not directories (regular files,
    /// symlinks, sockets) become leaves; symlink targets are never
    /// followed.
    pub fn scan(root: &Path) -> Result<Self, TraversalError> {
        Ok(TreeNode::Directory {
            children: Self::scan_children(root)?,
        })
    }

    fn scan_children(dir: &Path) -> Result<LinkedHashMap<String, TreeNode>, TraversalError> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir).context(ListSnafu {
            path: dir.to_path_buf(),
        })? {
            let entry = entry.context(ListSnafu {
                path: dir.to_path_buf(),
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == RESERVED_DIR {
                continue;
            }
            let file_type = entry.file_type().context(InspectSnafu {
                path: entry.path(),
            })?;
            entries.push((name, entry.path(), file_type.is_dir()));
        }

        entries.sort_by(|(a, _, _), (b, _, _)| a.cmp(b));

        let mut children = LinkedHashMap::new();
        for (name, path, is_dir) in entries {
            let node = if is_dir {
                TreeNode::Directory {
                    children: Self::scan_children(&path)?,
                }
            } else {
                TreeNode::File
            };
            children.insert(name, node);
        }

        Ok(children)
    }
}

#[derive(Debug, Snafu)]
pub enum TraversalError {
    #[snafu(display("Failed to list directory {}", path.best_effort_path_display()))]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to inspect entry {}", path.best_effort_path_display()))]
    InspectError {
        path: PathBuf,
        source: std::io::Error,
    },
}
