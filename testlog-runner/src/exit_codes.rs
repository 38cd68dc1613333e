// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `mvn-testlog` failures.
///
/// `mvn-testlog` invocations may fail for a variety of reasons. This structure
/// documents the exit codes that may occur in case of expected failures.
///
/// Note that a test suite failing inside Maven is not a wrapper failure: the
/// wrapper exits with [`OK`](Self::OK) regardless of the test outcome.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum TestlogExitCode {}

impl TestlogExitCode {
    /// No errors occurred and mvn-testlog exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up the invocation (resolving the
    /// working directory, or locking, reading, parsing, or writing the run
    /// counter).
    pub const SETUP_ERROR: i32 = 96;

    /// The Maven child process could not be launched.
    pub const MAVEN_LAUNCH_FAILED: i32 = 104;

    /// The log file for this run could not be created.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
