//! Filesystem tree representation for a cloned working copy.
//!
//! This module provides a tree-like structure to represent a directory,
//! where nodes are either directories (that can contain other nodes) or
//! files, plus the rendering pass that turns a tree into ASCII art and
//! the workspace guard that owns the working copy on disk.

mod render;
mod tree;
mod workspace;

pub use render::render_lines;
pub use tree::{TraversalError, TreeNode};
pub use workspace::{DeletionError, Workspace};
