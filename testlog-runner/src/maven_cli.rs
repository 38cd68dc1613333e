// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maven CLI support.

use camino::Utf8PathBuf;
use std::{borrow::Cow, path::PathBuf};

/// A Maven command invocation under construction.
///
/// The base invocation is always `mvn test`; the only argument ever added on
/// top of that is the optional `-Dtest=<filter>` scope.
#[derive(Clone, Debug)]
pub struct MavenCli<'a> {
    maven_path: Utf8PathBuf,
    command: &'a str,
    args: Vec<Cow<'a, str>>,
}

impl<'a> MavenCli<'a> {
    /// Creates a new `mvn test` invocation.
    pub fn test() -> Self {
        Self {
            maven_path: maven_path(),
            command: "test",
            args: vec![],
        }
    }

    /// Adds a borrowed argument to the command.
    pub fn add_arg(&mut self, arg: &'a str) -> &mut Self {
        self.args.push(Cow::Borrowed(arg));
        self
    }

    /// Adds an owned argument to the command.
    pub fn add_owned_arg(&mut self, arg: String) -> &mut Self {
        self.args.push(Cow::Owned(arg));
        self
    }

    /// Scopes the test run to a single test case via `-Dtest=<filter>`.
    ///
    /// The filter is passed through verbatim, with no validation.
    pub fn add_test_filter(&mut self, filter: &str) -> &mut Self {
        self.add_owned_arg(format!("-Dtest={filter}"))
    }

    /// Returns all arguments of the command, including the program path.
    pub fn all_args(&self) -> Vec<&str> {
        let mut all_args = vec![self.maven_path.as_str(), self.command];
        all_args.extend(self.args.iter().map(|s| &**s));
        all_args
    }

    /// Converts the command into a `duct` expression for execution.
    pub fn to_expression(&self) -> duct::Expression {
        duct::cmd(
            // Ensure that mvn gets picked up from PATH if necessary, by calling as_str
            // rather than as_std_path.
            self.maven_path.as_str(),
            std::iter::once(self.command).chain(self.args.iter().map(|s| s.as_ref())),
        )
    }
}

fn maven_path() -> Utf8PathBuf {
    match std::env::var_os("MVN") {
        Some(maven_path) => PathBuf::from(maven_path)
            .try_into()
            .expect("MVN env var is not valid UTF-8"),
        None => Utf8PathBuf::from("mvn"),
    }
}
