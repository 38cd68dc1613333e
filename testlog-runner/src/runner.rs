// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Child process execution and output capture.

use crate::{errors::MavenExecError, maven_cli::MavenCli, run_log::RunLog};
use std::process::ExitStatus;
use tracing::debug;

/// Runs the Maven command, capturing its merged stdout/stderr stream into the
/// log file, and waits for it to complete.
///
/// The child's stderr is merged into its stdout, so the log preserves the
/// interleaving Maven produced. A non-zero exit from the child is not an
/// error; the returned [`ExitStatus`] is informational only, and callers must
/// not branch on it.
pub fn execute(maven_cli: &MavenCli<'_>, run_log: RunLog) -> Result<ExitStatus, MavenExecError> {
    let log_path = run_log.path().to_owned();
    let expression = maven_cli
        .to_expression()
        .stderr_to_stdout()
        .stdout_file(run_log.into_file())
        .unchecked();

    // Blocks until the child exits. There is no timeout and no cancellation
    // hook; an OS signal against the wrapper is the only way out early.
    let output = expression
        .run()
        .map_err(|error| MavenExecError::new(maven_cli.all_args(), error))?;

    debug!(
        "maven exited with {}, output captured to `{log_path}`",
        output.status
    );
    Ok(output.status)
}
