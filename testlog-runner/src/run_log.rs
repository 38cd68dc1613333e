// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log file naming and creation.
//!
//! Each run's merged output lands in a log file named after the run number
//! and, when present, the test filter. The name is a pure function of those
//! two values, so reruns with a fresh counter deterministically map to the
//! same file names.

use crate::{counter::RunNumber, errors::RunLogCreateError};
use camino::{Utf8Path, Utf8PathBuf};
use debug_ignore::DebugIgnore;
use std::fs::File;

/// Returns the log file name for a run.
///
/// Without a filter the name is `test_output<N>.log`; with a filter it is
/// `test_output_<filter>_<N>.log`. The filter is embedded verbatim, with no
/// escaping or validation.
pub fn run_log_file_name(test_filter: Option<&str>, run_number: RunNumber) -> String {
    match test_filter {
        Some(filter) => format!("test_output_{filter}_{run_number}.log"),
        None => format!("test_output{run_number}.log"),
    }
}

/// A freshly created log file for a single run.
///
/// Creation truncates any existing file with the same name, so a reset
/// counter overwrites the earlier run's log rather than appending to it.
#[derive(Debug)]
pub struct RunLog {
    path: Utf8PathBuf,
    file: DebugIgnore<File>,
}

impl RunLog {
    /// Creates the log file for the given run in `dir`.
    pub fn create(
        dir: &Utf8Path,
        test_filter: Option<&str>,
        run_number: RunNumber,
    ) -> Result<Self, RunLogCreateError> {
        let path = dir.join(run_log_file_name(test_filter, run_number));
        let file =
            File::create(&path).map_err(|error| RunLogCreateError::new(path.clone(), error))?;
        Ok(Self {
            path,
            file: DebugIgnore(file),
        })
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Consumes self, returning the open file handle for redirection into a
    /// child process.
    pub fn into_file(self) -> File {
        self.file.0
    }
}
