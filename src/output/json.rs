use std::path::{Path, PathBuf};

use compio::fs;
use serde::ser::{Serialize, SerializeMap, Serializer};
use snafu::{ResultExt, Snafu};
use tracing::info;

use crate::ext::BestEffortPathExt;
use crate::filesystem::TreeNode;

/// Directories serialize as objects of their children in visitation order;
/// files serialize as `null`.
impl Serialize for TreeNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TreeNode::File => serializer.serialize_none(),
            TreeNode::Directory { children } => {
                let mut map = serializer.serialize_map(Some(children.len()))?;
                for (name, node) in children {
                    map.serialize_entry(name, node)?;
                }
                map.end()
            }
        }
    }
}

/// Derives the output file stem from the repository's source location:
/// the last path segment, ignoring a trailing slash, with a trailing
/// `.git` suffix stripped.
pub fn output_name(source: &str) -> String {
    let trimmed = source.trim_end_matches('/');
    let base = trimmed.rsplit('/').next().unwrap_or(trimmed);
    base.strip_suffix(".git").unwrap_or(base).to_string()
}

/// Writes the tree as pretty-printed JSON to `<name>.json` in the current
/// working directory, overwriting any existing file.
pub async fn write_structure(tree: &TreeNode, name: &str) -> Result<PathBuf, SerializationError> {
    write_structure_in(tree, Path::new("."), name).await
}

pub async fn write_structure_in(
    tree: &TreeNode,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, SerializationError> {
    let path = dir.join(format!("{name}.json"));
    let bytes = serde_json::to_vec_pretty(tree).context(EncodeSnafu)?;

    fs::write(&path, bytes).await.0.context(WriteSnafu {
        path: path.clone(),
    })?;

    info!(
        "Directory structure written to {}",
        path.best_effort_path_display()
    );
    Ok(path)
}

#[derive(Debug, Snafu)]
pub enum SerializationError {
    #[snafu(display("Failed to encode the directory structure"))]
    EncodeError { source: serde_json::Error },
    #[snafu(display("Failed to write the directory structure to {}", path.best_effort_path_display()))]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn dir(entries: Vec<(&str, TreeNode)>) -> TreeNode {
        TreeNode::Directory {
            children: entries
                .into_iter()
                .map(|(name, node)| (name.to_string(), node))
                .collect(),
        }
    }

    #[rstest]
    #[case("https://example.com/org/myrepo.git", "myrepo")]
    #[case("https://example.com/org/myrepo", "myrepo")]
    #[case("https://example.com/org/myrepo/", "myrepo")]
    #[case("git@example.com:org/myrepo.git", "myrepo")]
    #[case("../local/checkout.git", "checkout")]
    #[case("plain-name", "plain-name")]
    fn test_output_name(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(output_name(source), expected);
    }

    #[test]
    fn test_serialized_shape_matches_tree() {
        let tree = dir(vec![
            ("a.txt", TreeNode::File),
            ("b.txt", TreeNode::File),
            ("sub", dir(vec![("c.txt", TreeNode::File)])),
        ]);

        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"a.txt": null, "b.txt": null, "sub": {"c.txt": null}})
        );
    }

    #[test]
    fn test_key_order_follows_visitation_order() {
        let tree = dir(vec![
            ("first", TreeNode::File),
            ("second", TreeNode::File),
            ("third", TreeNode::File),
        ]);

        assert_eq!(
            serde_json::to_string(&tree).unwrap(),
            r#"{"first":null,"second":null,"third":null}"#
        );
    }

    #[test]
    fn test_empty_directory_serializes_as_empty_object() {
        let tree = dir(vec![("empty", dir(vec![]))]);

        assert_eq!(
            serde_json::to_string(&tree).unwrap(),
            r#"{"empty":{}}"#
        );
    }

    #[compio::test]
    async fn test_write_structure_round_trips() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let tree = dir(vec![
            ("a.txt", TreeNode::File),
            ("sub", dir(vec![("c.txt", TreeNode::File)])),
        ]);

        let path = write_structure_in(&tree, temp_dir.path(), "myrepo")
            .await
            .expect("Write failed");

        assert_eq!(path.file_name().unwrap(), "myrepo.json");
        let bytes = std::fs::read(&path).expect("Failed to read output file");
        let parsed: Value = serde_json::from_slice(&bytes).expect("Output is not valid JSON");
        assert_eq!(parsed, json!({"a.txt": null, "sub": {"c.txt": null}}));
    }

    #[compio::test]
    async fn test_write_structure_overwrites_existing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(temp_dir.path().join("myrepo.json"), "stale").unwrap();

        let path = write_structure_in(&dir(vec![]), temp_dir.path(), "myrepo")
            .await
            .expect("Write failed");

        let bytes = std::fs::read(&path).expect("Failed to read output file");
        let parsed: Value = serde_json::from_slice(&bytes).expect("Output is not valid JSON");
        assert_eq!(parsed, json!({}));
    }
}
