// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    output::{OutputContext, OutputOpts},
};
use camino::Utf8PathBuf;
use clap::Parser;
use owo_colors::OwoColorize;
use testlog_runner::{
    counter::CounterStore, exit_codes::TestlogExitCode, maven_cli::MavenCli, run_log::RunLog,
    runner,
};
use tracing::info;

/// A wrapper around `mvn test` that captures each run's output to a numbered log file.
///
/// Every invocation is assigned a run number from a counter persisted in
/// `current_test_number.txt` in the working directory, and the merged
/// stdout/stderr of the Maven run is written to `test_output<N>.log` (or
/// `test_output_<TEST>_<N>.log` when scoped to a single test case). Repeated
/// runs never overwrite prior logs.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub(crate) struct MvnTestlogApp {
    /// Test case to run (forwarded to Maven as -Dtest=<TEST>)
    #[arg(value_name = "TEST")]
    test_filter: Option<String>,

    #[clap(flatten)]
    output: OutputOpts,
}

impl MvnTestlogApp {
    /// Initializes the output context.
    pub(crate) fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the command.
    pub(crate) fn exec(self, output: OutputContext) -> Result<i32> {
        let styles = output.stderr_styles();

        let cwd = std::env::current_dir()
            .map_err(|error| ExpectedError::CurrentDirFailed { error })?;
        let cwd = Utf8PathBuf::try_from(cwd)
            .map_err(|error| ExpectedError::CurrentDirInvalidUtf8 { error })?;

        // Hold the counter lock only across read-and-advance: concurrent
        // invocations serialize on run-number assignment, not on the test
        // run itself. The guard is dropped at the end of this statement.
        let store = CounterStore::new(&cwd);
        let run_number = store.lock_exclusive()?.advance()?;

        let run_log = RunLog::create(&cwd, self.test_filter.as_deref(), run_number)?;
        let log_path = run_log.path().to_owned();

        let mut maven_cli = MavenCli::test();
        if let Some(filter) = &self.test_filter {
            maven_cli.add_test_filter(filter);
        }

        info!(
            "run {run_number}: executing `{}`, capturing output to `{}`",
            shell_words::join(maven_cli.all_args()).style(styles.bold),
            log_path.style(styles.bold),
        );

        // The child's exit status is deliberately not inspected: test failures
        // are Maven's business, not the wrapper's.
        runner::execute(&maven_cli, run_log)?;

        Ok(TestlogExitCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_app() {
        MvnTestlogApp::command().debug_assert();
    }
}
