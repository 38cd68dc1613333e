// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by testlog-runner.

use camino::Utf8PathBuf;
use std::num::ParseIntError;
use thiserror::Error;

/// An error that occurred while reading or advancing the run counter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CounterStoreError {
    /// An error occurred while opening or locking the counter lock file.
    #[error("error locking counter lock file `{path}`")]
    Lock {
        /// The path to the lock file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// Timed out while waiting for the counter lock.
    #[error("timed out after {timeout_secs}s waiting for lock on `{path}`")]
    LockTimeout {
        /// The path to the lock file.
        path: Utf8PathBuf,
        /// The timeout that elapsed, in seconds.
        timeout_secs: u64,
    },

    /// An error occurred while reading the counter file.
    #[error("error reading counter file `{path}`")]
    Read {
        /// The path to the counter file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The counter file exists but its contents are not a base-10
    /// non-negative integer.
    ///
    /// A corrupt counter is fatal: there is no fallback to zero, and the file
    /// is left untouched for inspection.
    #[error("counter file `{path}` contains `{contents}`, not a non-negative integer")]
    Parse {
        /// The path to the counter file.
        path: Utf8PathBuf,
        /// The trimmed contents that failed to parse.
        contents: String,
        /// The underlying error.
        #[source]
        error: ParseIntError,
    },

    /// An error occurred while writing the advanced counter value.
    #[error("error writing counter file `{path}`")]
    Write {
        /// The path to the counter file.
        path: Utf8PathBuf,
        /// The underlying error.
        #[source]
        error: atomicwrites::Error<std::io::Error>,
    },
}

/// An error that occurred while creating the log file for a run.
#[derive(Debug, Error)]
#[error("error creating log file `{path}`")]
pub struct RunLogCreateError {
    path: Utf8PathBuf,
    #[source]
    error: std::io::Error,
}

impl RunLogCreateError {
    pub(crate) fn new(path: Utf8PathBuf, error: std::io::Error) -> Self {
        Self { path, error }
    }

    /// Returns the path to the log file that could not be created.
    pub fn path(&self) -> &Utf8PathBuf {
        &self.path
    }
}

/// An error that occurred while launching the Maven child process.
///
/// A Maven process that launches and then exits non-zero is not an error;
/// this is only produced when the child could not be run at all.
#[derive(Debug, Error)]
#[error("error executing `{command}`")]
pub struct MavenExecError {
    command: String,
    #[source]
    error: std::io::Error,
}

impl MavenExecError {
    pub(crate) fn new(command: impl IntoIterator<Item = impl AsRef<str>>, error: std::io::Error) -> Self {
        Self {
            command: shell_words::join(command),
            error,
        }
    }

    /// Returns the shell-quoted command that failed to execute.
    pub fn command(&self) -> &str {
        &self.command
    }
}
