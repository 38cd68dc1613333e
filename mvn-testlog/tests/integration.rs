// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests driving the mvn-testlog binary against a fake Maven.
//!
//! The fake runner is a shell script injected through the `MVN` environment
//! variable, so these tests are Unix-only.

#![cfg(unix)]

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::{Utf8TempDir, tempdir};
use pretty_assertions::assert_eq;
use std::{
    borrow::Cow,
    collections::HashMap,
    ffi::OsString,
    fmt, fs,
    os::unix::fs::PermissionsExt,
    process::{Command, ExitStatus},
};
use testlog_runner::exit_codes::TestlogExitCode;

#[derive(Clone, Debug)]
struct MvnTestlogCli {
    bin: Utf8PathBuf,
    args: Vec<String>,
    envs: HashMap<OsString, OsString>,
    dir: Utf8PathBuf,
    unchecked: bool,
}

impl MvnTestlogCli {
    fn for_test(dir: &Utf8Path) -> Self {
        Self {
            bin: env!("CARGO_BIN_EXE_mvn-testlog").into(),
            args: vec![],
            envs: HashMap::new(),
            dir: dir.to_owned(),
            unchecked: false,
        }
    }

    fn arg(&mut self, arg: impl Into<String>) -> &mut Self {
        self.args.push(arg.into());
        self
    }

    fn env(&mut self, k: impl Into<OsString>, v: impl Into<OsString>) -> &mut Self {
        self.envs.insert(k.into(), v.into());
        self
    }

    fn unchecked(&mut self, unchecked: bool) -> &mut Self {
        self.unchecked = unchecked;
        self
    }

    fn output(&self) -> MvnTestlogOutput {
        let mut command = Command::new(&self.bin);
        command.args(&self.args);
        command.current_dir(&self.dir);
        // Scrub ambient configuration so the tests are hermetic.
        command.env_remove("MVN");
        command.env_remove("MVN_TESTLOG_LOG");
        command.env_remove("MVN_TESTLOG_VERBOSE");
        command.env_remove("MVN_TESTLOG_COLOR");
        command.envs(&self.envs);
        let output = command.output().expect("failed to execute");

        let ret = MvnTestlogOutput {
            command,
            exit_status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        };

        if !self.unchecked && !output.status.success() {
            panic!("command failed:\n\n{ret}");
        }

        ret
    }
}

struct MvnTestlogOutput {
    command: Command,
    exit_status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl MvnTestlogOutput {
    fn stdout_as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    fn stderr_as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }
}

impl fmt::Display for MvnTestlogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "command: {:?}\nexit code: {:?}\n\
                   --- stdout ---\n{}\n\n--- stderr ---\n{}\n\n",
            self.command,
            self.exit_status.code(),
            String::from_utf8_lossy(&self.stdout),
            String::from_utf8_lossy(&self.stderr)
        )
    }
}

// Make Debug output the same as Display output, so `.unwrap()` and `.expect()` are nicer.
impl fmt::Debug for MvnTestlogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A working directory with a fake `mvn` script next to it.
///
/// The script echoes its arguments to stdout and a fixed line to stderr, so
/// tests can observe exactly what the wrapper invoked and that both streams
/// land in the log. `FAKE_MVN_MARKER` (a path) is touched when the script
/// runs, and `FAKE_MVN_EXIT` overrides its exit code.
struct FakeMavenEnv {
    temp_dir: Utf8TempDir,
    mvn_path: Utf8PathBuf,
}

impl FakeMavenEnv {
    fn new() -> Self {
        let temp_dir = tempdir().expect("tempdir should be created");
        let mvn_path = temp_dir.path().join("fake-mvn.sh");
        fs::write(
            &mvn_path,
            "#!/bin/sh\n\
             if [ -n \"$FAKE_MVN_MARKER\" ]; then : > \"$FAKE_MVN_MARKER\"; fi\n\
             echo \"fake-maven args: $*\"\n\
             echo \"fake-maven stderr line\" >&2\n\
             echo \"fake-maven done\"\n\
             exit \"${FAKE_MVN_EXIT:-0}\"\n",
        )
        .expect("fake mvn script should be written");
        fs::set_permissions(&mvn_path, fs::Permissions::from_mode(0o755))
            .expect("fake mvn script should be made executable");

        Self { temp_dir, mvn_path }
    }

    fn dir(&self) -> &Utf8Path {
        self.temp_dir.path()
    }

    fn cli(&self) -> MvnTestlogCli {
        let mut cli = MvnTestlogCli::for_test(self.dir());
        cli.env("MVN", self.mvn_path.as_str());
        cli
    }

    fn counter_contents(&self) -> String {
        fs::read_to_string(self.dir().join("current_test_number.txt"))
            .expect("counter file should exist")
    }

    fn log_contents(&self, name: &str) -> String {
        fs::read_to_string(self.dir().join(name))
            .unwrap_or_else(|error| panic!("log file {name} should exist: {error}"))
    }
}

fn expected_log(args: &str) -> String {
    format!("fake-maven args: {args}\nfake-maven stderr line\nfake-maven done\n")
}

#[test]
fn counter_is_monotonic_across_invocations() {
    let env = FakeMavenEnv::new();

    for k in 0..3 {
        let output = env.cli().output();
        assert_eq!(
            env.counter_contents(),
            (k + 1).to_string(),
            "counter value after invocation {k}"
        );
        assert_eq!(
            env.log_contents(&format!("test_output{k}.log")),
            expected_log("test"),
        );
        assert_eq!(output.stdout_as_str(), "", "wrapper writes nothing to stdout");
        assert_eq!(
            output.stderr_as_str(),
            "",
            "a successful run is silent by default"
        );
    }
}

#[test]
fn first_run_initializes_counter_to_one() {
    let env = FakeMavenEnv::new();
    assert!(
        !env.dir().join("current_test_number.txt").exists(),
        "fresh environment has no counter file"
    );

    env.cli().output();

    assert_eq!(env.counter_contents(), "1");
    assert!(env.dir().join("test_output0.log").exists());
}

#[test]
fn filter_is_forwarded_and_embedded_in_log_name() {
    let env = FakeMavenEnv::new();

    env.cli().arg("MyTest").output();

    assert_eq!(env.counter_contents(), "1");
    assert_eq!(
        env.log_contents("test_output_MyTest_0.log"),
        expected_log("test -Dtest=MyTest"),
    );
}

#[test]
fn log_captures_merged_streams_verbatim() {
    let env = FakeMavenEnv::new();

    env.cli().output();

    // The stderr line sits between the two stdout lines, preserving the
    // order in which the child wrote to the merged stream.
    assert_eq!(env.log_contents("test_output0.log"), expected_log("test"));
}

#[test]
fn failing_test_suite_is_not_a_wrapper_error() {
    let env = FakeMavenEnv::new();

    let output = env.cli().env("FAKE_MVN_EXIT", "1").output();

    assert_eq!(
        output.exit_status.code(),
        Some(TestlogExitCode::OK),
        "the wrapper exits 0 regardless of the test outcome: {output}"
    );
    assert_eq!(env.counter_contents(), "1");
    assert_eq!(env.log_contents("test_output0.log"), expected_log("test"));
}

#[test]
fn corrupt_counter_aborts_before_spawning_maven() {
    let env = FakeMavenEnv::new();
    fs::write(env.dir().join("current_test_number.txt"), "abc")
        .expect("counter file should be written");
    let marker = env.dir().join("maven-ran.marker");

    let output = env
        .cli()
        .env("FAKE_MVN_MARKER", marker.as_str())
        .unchecked(true)
        .output();

    assert_eq!(
        output.exit_status.code(),
        Some(TestlogExitCode::SETUP_ERROR),
        "corrupt counter is a setup error: {output}"
    );
    assert!(
        output.stderr_as_str().contains("error:")
            && output.stderr_as_str().contains("abc"),
        "stderr should name the offending contents: {output}"
    );
    assert_eq!(
        env.counter_contents(),
        "abc",
        "a rejected counter file must be left unmodified"
    );
    assert!(!marker.exists(), "maven must not be spawned");
    assert!(
        !env.dir().join("test_output0.log").exists(),
        "no log file is created for an aborted run"
    );
}

#[test]
fn missing_runner_exits_with_launch_failure() {
    let env = FakeMavenEnv::new();

    let output = env
        .cli()
        .env("MVN", env.dir().join("no-such-mvn").as_str())
        .unchecked(true)
        .output();

    assert_eq!(
        output.exit_status.code(),
        Some(TestlogExitCode::MAVEN_LAUNCH_FAILED),
        "unlaunchable runner: {output}"
    );
    assert!(
        output.stderr_as_str().contains("failed to execute"),
        "stderr should report the launch failure: {output}"
    );
    // The counter tracks runs attempted, so it advances even though the
    // child never started. The log file exists but is empty.
    assert_eq!(env.counter_contents(), "1");
    assert_eq!(env.log_contents("test_output0.log"), "");
}

#[test]
fn end_to_end_example() {
    let env = FakeMavenEnv::new();

    env.cli().output();
    assert_eq!(env.counter_contents(), "1");
    assert_eq!(env.log_contents("test_output0.log"), expected_log("test"));

    env.cli().arg("FooTest").output();
    assert_eq!(env.counter_contents(), "2");
    assert_eq!(
        env.log_contents("test_output_FooTest_1.log"),
        expected_log("test -Dtest=FooTest"),
    );
}

#[test]
fn verbose_run_reports_the_command() {
    let env = FakeMavenEnv::new();

    let output = env.cli().arg("--verbose").output();

    let stderr = output.stderr_as_str();
    assert!(
        stderr.contains("info:") && stderr.contains("test_output0.log"),
        "verbose output should name the log file: {output}"
    );
    assert_eq!(env.counter_contents(), "1");
}

#[test]
fn help_describes_the_wrapper() {
    let env = FakeMavenEnv::new();

    let output = env.cli().arg("--help").output();

    let stdout = output.stdout_as_str();
    assert!(
        stdout.contains("Usage:") && stdout.contains("TEST"),
        "help output should show usage: {output}"
    );
}
