// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::StderrStyles;
use camino::FromPathBufError;
use owo_colors::OwoColorize;
use std::error::Error;
use testlog_runner::{
    errors::{CounterStoreError, MavenExecError, RunLogCreateError},
    exit_codes::TestlogExitCode,
};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected failure while setting up or performing a run.
#[derive(Debug, Error)]
pub(crate) enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        error: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        error: FromPathBufError,
    },
    #[error("counter store error")]
    CounterStoreError {
        #[from]
        error: CounterStoreError,
    },
    #[error("log file create error")]
    RunLogCreateError {
        #[from]
        error: RunLogCreateError,
    },
    #[error("maven exec error")]
    MavenExecError {
        #[from]
        error: MavenExecError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub(crate) fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::CounterStoreError { .. } => TestlogExitCode::SETUP_ERROR,
            Self::RunLogCreateError { .. } => TestlogExitCode::WRITE_OUTPUT_ERROR,
            Self::MavenExecError { .. } => TestlogExitCode::MAVEN_LAUNCH_FAILED,
        }
    }

    /// Displays this error to stderr.
    pub(crate) fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { error } => {
                error!("could not determine current directory");
                Some(error as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { error } => {
                error!("current directory is not valid UTF-8");
                Some(error as &dyn Error)
            }
            Self::CounterStoreError { error } => {
                // The counter errors already name the offending path and
                // contents.
                error!("{error}");
                error.source()
            }
            Self::RunLogCreateError { error } => {
                error!(
                    "failed to create log file `{}`",
                    error.path().style(styles.bold)
                );
                error.source()
            }
            Self::MavenExecError { error } => {
                error!(
                    "failed to execute `{}`",
                    error.command().style(styles.bold)
                );
                error.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: "mvn_testlog::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
