use std::path::{Path, PathBuf};

/// Best-effort absolute rendering of a path for diagnostics. Paths that no
/// longer exist cannot be canonicalized; fall back to joining the current
/// directory instead of failing the error message itself.
pub fn best_effort_path_display(path: &Path) -> String {
    match path.canonicalize() {
        Ok(canonical_path) => canonical_path.display().to_string(),
        Err(_) => {
            let absolute_path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                match std::env::current_dir() {
                    Ok(current_dir) => current_dir.join(path),
                    Err(_) => path.to_path_buf(),
                }
            };
            absolute_path.display().to_string()
        }
    }
}

pub trait BestEffortPathExt {
    fn best_effort_path_display(&self) -> String;
}

impl BestEffortPathExt for Path {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}

impl BestEffortPathExt for PathBuf {
    fn best_effort_path_display(&self) -> String {
        best_effort_path_display(self)
    }
}
