use std::fs;
use std::path::{Path, PathBuf};

use snafu::{ResultExt, Snafu};
use tracing::debug;

use crate::ext::BestEffortPathExt;

/// Owns the working-copy directory on disk.
///
/// `prepare` clears any stale directory left by an earlier run before the
/// clone starts, and `cleanup` releases the directory once output has been
/// produced. Callers never touch permission flags themselves; write
/// protection handling lives entirely inside the force-removal below.
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    pub fn prepare(path: PathBuf) -> Result<Self, DeletionError> {
        if path.exists() {
            debug!(
                "Removing stale working copy at {}",
                path.best_effort_path_display()
            );
            force_remove_tree(&path)?;
        }
        Ok(Workspace { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cleanup(self) -> Result<(), DeletionError> {
        if self.path.exists() {
            debug!(
                "Removing working copy at {}",
                self.path.best_effort_path_display()
            );
            force_remove_tree(&self.path)?;
        }
        Ok(())
    }
}

/// Deletes `path` and everything beneath it.
///
/// A permission-denied deletion is retried once after clearing the entry's
/// write protection; if it fails again the error propagates.
fn force_remove_tree(path: &Path) -> Result<(), DeletionError> {
    let metadata = fs::symlink_metadata(path).context(InspectSnafu {
        path: path.to_path_buf(),
    })?;

    if metadata.is_dir() {
        for entry in fs::read_dir(path).context(ListSnafu {
            path: path.to_path_buf(),
        })? {
            let entry = entry.context(ListSnafu {
                path: path.to_path_buf(),
            })?;
            force_remove_tree(&entry.path())?;
        }
        remove_with_retry(path, |p| fs::remove_dir(p))
    } else {
        remove_with_retry(path, |p| fs::remove_file(p))
    }
}

fn remove_with_retry(
    path: &Path,
    remove: impl Fn(&Path) -> std::io::Result<()>,
) -> Result<(), DeletionError> {
    match remove(path) {
        Ok(()) => Ok(()),
        Err(source) if source.kind() == std::io::ErrorKind::PermissionDenied => {
            debug!(
                "Permission denied removing {}, clearing write protection",
                path.best_effort_path_display()
            );
            clear_write_protection(path)?;
            remove(path).context(RemoveSnafu {
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(DeletionError::RemoveError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn clear_write_protection(path: &Path) -> Result<(), DeletionError> {
    let metadata = fs::metadata(path).context(InspectSnafu {
        path: path.to_path_buf(),
    })?;
    let mut permissions = metadata.permissions();

    #[cfg(target_family = "unix")]
    {
        use std::os::unix::fs::PermissionsExt;
        permissions.set_mode(permissions.mode() | 0o200);
    }
    #[cfg(target_family = "windows")]
    {
        permissions.set_readonly(false);
    }

    fs::set_permissions(path, permissions).context(UnprotectSnafu {
        path: path.to_path_buf(),
    })
}

#[derive(Debug, Snafu)]
pub enum DeletionError {
    #[snafu(display("Failed to inspect {} for removal", path.best_effort_path_display()))]
    InspectError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to list directory {} for removal", path.best_effort_path_display()))]
    ListError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to remove {}", path.best_effort_path_display()))]
    RemoveError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to clear write protection on {}", path.best_effort_path_display()))]
    UnprotectError {
        path: PathBuf,
        source: std::io::Error,
    },
}
