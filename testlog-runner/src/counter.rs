// Copyright (c) The mvn-testlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent run counter management.
//!
//! The counter is a single base-10 integer stored in
//! `current_test_number.txt` in the working directory. It counts runs
//! attempted: each invocation reads the current value, immediately persists
//! the incremented value, and uses the pre-increment value as its run number.
//!
//! Updates happen under an exclusive advisory lock on a sidecar lock file,
//! and the counter itself is replaced via atomic rename, so concurrent
//! invocations serialize on run-number assignment and a crashed invocation
//! can never leave a torn counter file behind.

use crate::errors::CounterStoreError;
use camino::{Utf8Path, Utf8PathBuf};
use debug_ignore::DebugIgnore;
use std::{
    fmt,
    fs::{File, TryLockError},
    io::{self, Write},
    thread,
    time::{Duration, Instant},
};
use tracing::debug;

static COUNTER_FILE_NAME: &str = "current_test_number.txt";
static COUNTER_LOCK_FILE_NAME: &str = "current_test_number.txt.lock";

/// The run number assigned to a single invocation.
///
/// Run numbers start at 0 in a fresh working directory and increase by one
/// per invocation. The log file for a run embeds this pre-increment value,
/// not the value persisted at the end of counter assignment.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct RunNumber(
    /// The zero-based run index.
    pub u64,
);

impl RunNumber {
    /// Returns the run number of the following invocation.
    pub fn next(self) -> Self {
        RunNumber(self.0 + 1)
    }
}

impl fmt::Display for RunNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Manages the run counter file within a working directory.
///
/// Use [`CounterStore::lock_exclusive`] to acquire exclusive access before
/// reading or advancing the counter.
#[derive(Debug)]
pub struct CounterStore {
    counter_path: Utf8PathBuf,
    lock_path: Utf8PathBuf,
}

impl CounterStore {
    /// Creates a new `CounterStore` rooted at the given directory.
    ///
    /// No files are touched until the store is locked.
    pub fn new(dir: &Utf8Path) -> Self {
        Self {
            counter_path: dir.join(COUNTER_FILE_NAME),
            lock_path: dir.join(COUNTER_LOCK_FILE_NAME),
        }
    }

    /// Returns the path to the counter file.
    pub fn counter_path(&self) -> &Utf8Path {
        &self.counter_path
    }

    /// Acquires an exclusive lock on the counter.
    ///
    /// This lock should only be held for a short duration (just long enough
    /// to read the counter and persist the advanced value); release it before
    /// starting the test process.
    ///
    /// Uses non-blocking lock attempts with retries to handle both brief
    /// contention and filesystems where locking may not work (e.g., NFS).
    pub fn lock_exclusive(&self) -> Result<LockedCounterStore<'_>, CounterStoreError> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|error| CounterStoreError::Lock {
                path: self.lock_path.clone(),
                error,
            })?;

        acquire_lock_with_retry(&file, &self.lock_path)?;

        Ok(LockedCounterStore {
            store: self,
            locked_file: DebugIgnore(file),
        })
    }
}

/// A counter store that has been locked for exclusive access.
///
/// The lifetime parameter ensures this isn't held for longer than the
/// corresponding [`CounterStore`]. The lock is released when this struct is
/// dropped.
#[derive(Debug)]
pub struct LockedCounterStore<'store> {
    store: &'store CounterStore,
    // Held for RAII lock semantics; the lock is released when this struct is dropped.
    #[expect(dead_code)]
    locked_file: DebugIgnore<File>,
}

impl LockedCounterStore<'_> {
    /// Reads the current run number.
    ///
    /// A missing counter file reads as 0. Any other content than a base-10
    /// non-negative integer (surrounding whitespace tolerated) is an error;
    /// there is no fallback to zero.
    pub fn current(&self) -> Result<RunNumber, CounterStoreError> {
        let counter_path = self.store.counter_path();
        let contents = match std::fs::read_to_string(counter_path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!("no counter file at `{counter_path}`, starting from 0");
                return Ok(RunNumber(0));
            }
            Err(error) => {
                return Err(CounterStoreError::Read {
                    path: counter_path.to_owned(),
                    error,
                });
            }
        };

        let trimmed = contents.trim();
        let value = trimmed
            .parse::<u64>()
            .map_err(|error| CounterStoreError::Parse {
                path: counter_path.to_owned(),
                contents: trimmed.to_owned(),
                error,
            })?;
        Ok(RunNumber(value))
    }

    /// Assigns a run number to this invocation.
    ///
    /// Reads the current value, persists the incremented value, and returns
    /// the pre-increment number. The incremented value hits disk before this
    /// returns, so the counter counts runs attempted rather than runs
    /// completed. A parse failure leaves the counter file unmodified.
    pub fn advance(&self) -> Result<RunNumber, CounterStoreError> {
        let current = self.current()?;
        self.write(current.next())?;
        Ok(current)
    }

    fn write(&self, number: RunNumber) -> Result<(), CounterStoreError> {
        let counter_path = self.store.counter_path();
        let data = number.to_string();
        atomicwrites::AtomicFile::new(counter_path, atomicwrites::AllowOverwrite)
            .write(|file| file.write_all(data.as_bytes()))
            .map_err(|error| CounterStoreError::Write {
                path: counter_path.to_owned(),
                error,
            })?;
        Ok(())
    }
}

/// Acquires the counter lock with retries, timing out after 5 seconds.
///
/// This handles both brief contention (another invocation assigning its run
/// number) and filesystems where locking may not work properly (e.g., NFS).
fn acquire_lock_with_retry(file: &File, lock_path: &Utf8Path) -> Result<(), CounterStoreError> {
    const LOCK_TIMEOUT: Duration = Duration::from_secs(5);
    const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(100);

    let start = Instant::now();
    loop {
        match file.try_lock() {
            Ok(()) => return Ok(()),
            Err(TryLockError::WouldBlock) => {
                // Lock is held by another process. Retry if we haven't timed out.
                if start.elapsed() >= LOCK_TIMEOUT {
                    return Err(CounterStoreError::LockTimeout {
                        path: lock_path.to_owned(),
                        timeout_secs: LOCK_TIMEOUT.as_secs(),
                    });
                }
                thread::sleep(LOCK_RETRY_INTERVAL);
            }
            Err(TryLockError::Error(error)) => {
                // Some other error (e.g., locking not supported on this filesystem).
                return Err(CounterStoreError::Lock {
                    path: lock_path.to_owned(),
                    error,
                });
            }
        }
    }
}
