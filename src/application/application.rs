use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::acquire::{AcquisitionError, GitAcquirer};
use crate::application::RuntimeConfig;
use crate::filesystem::{DeletionError, TraversalError, TreeNode, Workspace, render_lines};
use crate::output::{SerializationError, output_name, write_structure};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let config: RuntimeConfig = app_config.into();
        debug!("Resolved runtime config: {config:?}");

        let workspace = Workspace::prepare(config.workdir.clone()).context(CleanupSnafu)?;

        // The working copy is released on every exit path, so a failure in
        // the middle stages still tears it down before propagating.
        let result = Self::clone_and_emit(&config, &workspace).await;
        workspace.cleanup().context(CleanupSnafu)?;

        result
    }

    async fn clone_and_emit(
        config: &RuntimeConfig,
        workspace: &Workspace,
    ) -> Result<(), ApplicationError> {
        GitAcquirer::new(&config.source)
            .acquire(workspace.path())
            .await
            .context(AcquireSnafu)?;

        let tree = TreeNode::scan(workspace.path()).context(TraverseSnafu)?;
        for line in render_lines(&tree) {
            println!("{line}");
        }

        write_structure(&tree, &output_name(&config.source))
            .await
            .context(SerializeSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while acquiring the repository"))]
    AcquireError { source: AcquisitionError },
    #[snafu(display("Critical failure encountered while walking the working copy"))]
    TraverseError { source: TraversalError },
    #[snafu(display("Critical failure encountered while persisting the structure"))]
    SerializeError { source: SerializationError },
    #[snafu(display("Critical failure encountered while releasing the working copy"))]
    CleanupError { source: DeletionError },
}
