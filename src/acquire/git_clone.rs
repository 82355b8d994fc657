use std::{path::Path, process::Stdio};

use compio::{io::compat::AsyncStream, process::Command, runtime::spawn};
use futures::{AsyncBufReadExt, StreamExt, io::BufReader};
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

/// Materializes a working copy of a remote repository by spawning
/// `git clone`. The target directory must not exist yet; the caller is
/// responsible for removing any stale working copy first.
pub struct GitAcquirer {
    source: String,
}

impl GitAcquirer {
    pub fn new(source: impl Into<String>) -> Self {
        GitAcquirer {
            source: source.into(),
        }
    }

    pub async fn acquire(&self, target: &Path) -> Result<(), AcquisitionError> {
        info!("Cloning repository from {}...", self.source);

        let mut cmd = self.create_command(target);
        let mut handle = cmd.spawn().context(SpawnSnafu {
            repository: self.source.clone(),
        })?;

        // git reports progress on stderr
        if let Some(stderr) = handle.stderr.take() {
            Self::spawn_progress_handler(stderr);
        }

        let status = handle.wait().await.context(WaitSnafu {
            repository: self.source.clone(),
        })?;

        if status.success() {
            info!("Cloned {} into {}", self.source, target.display());
            Ok(())
        } else {
            Err(AcquisitionError::UnsuccessfulClone {
                repository: self.source.clone(),
                status: status.code().unwrap_or(-1),
            })
        }
    }

    /// Creates and configures the clone command with proper stdio settings
    fn create_command(&self, target: &Path) -> Command {
        let mut cmd = Command::new("git");
        cmd.arg("clone").arg(&self.source).arg(target);
        let _ = cmd.stdout(Stdio::null());
        let _ = cmd.stderr(Stdio::piped());
        cmd
    }

    /// Spawns a task forwarding git's progress lines to the debug log
    fn spawn_progress_handler(stderr: compio::process::ChildStderr) {
        let stream = AsyncStream::new(stderr);
        spawn(async move {
            let reader = BufReader::new(stream);
            let mut lines = reader.lines();

            while let Some(line_result) = lines.next().await {
                match line_result {
                    Ok(line) => {
                        if !line.trim().is_empty() {
                            debug!("git: {}", line.trim());
                        }
                    }
                    Err(e) => {
                        debug!("Error reading git output: {}", e);
                    }
                }
            }
        })
        .detach();
    }
}

#[derive(Debug, Snafu)]
pub enum AcquisitionError {
    #[snafu(display("Failed to spawn git clone for '{}'", repository))]
    SpawnError {
        repository: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to wait for git clone of '{}'", repository))]
    WaitError {
        repository: String,
        source: std::io::Error,
    },
    #[snafu(display("git clone of '{}' failed with exit code {}", repository, status))]
    UnsuccessfulClone { repository: String, status: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[compio::test]
    async fn test_acquire_from_unreachable_location_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.path().join("working-copy");

        let acquirer = GitAcquirer::new("/this/path/does/not/exist/repo.git");
        let result = acquirer.acquire(&target).await;

        assert!(result.is_err());
    }
}
