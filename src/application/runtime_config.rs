use std::{env, path::PathBuf, process};

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub source: String,
    pub workdir: PathBuf,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.source,
            workdir: cli.workdir.unwrap_or_else(default_workdir),
        }
    }
}

/// Unique per running process, so concurrent invocations never share a
/// working copy.
fn default_workdir() -> PathBuf {
    env::temp_dir().join(format!("repotree-{}", process::id()))
}
