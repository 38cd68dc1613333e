// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [mvn-testlog](https://crates.io/crates/mvn-testlog). For a
//! higher-level overview, see that documentation.
//!
//! Each invocation of the wrapper is assigned a run number from a counter
//! persisted in the working directory, runs `mvn test` (optionally scoped to
//! a single test case), and captures the merged output stream to a log file
//! named after the run.

pub mod counter;
pub mod errors;
pub mod exit_codes;
pub mod maven_cli;
pub mod run_log;
pub mod runner;
