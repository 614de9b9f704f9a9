//! Test support utilities for envseal integration tests.
//!
//! Provides an isolated project directory with a fake `aws` executable
//! that records every call it receives.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated project directory.
///
/// No process-global state is mutated; child processes use `.current_dir()`
/// so tests can safely run in parallel.
pub struct Test {
    /// Temporary project directory
    pub dir: TempDir,
    /// Directory holding the fake AWS CLI and its call log
    pub bin: TempDir,
}

impl Test {
    /// Create a new empty test environment with a fake AWS CLI installed.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let bin = TempDir::new().expect("failed to create temp bin dir");

        let t = Self { dir, bin };
        t.install_fake_aws();
        t
    }

    /// Create a test environment with a `.secrets` file.
    pub fn with_secrets(contents: &str) -> Self {
        let t = Self::new();
        t.write(".secrets", contents);
        t
    }

    /// Write a file relative to the project directory.
    pub fn write(&self, name: &str, contents: &str) {
        fs::write(self.dir.path().join(name), contents).expect("failed to write file");
    }

    /// Read a file relative to the project directory.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(name)).expect("failed to read file")
    }

    /// Whether a file exists in the project directory.
    pub fn exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Path of the fake AWS CLI.
    pub fn aws(&self) -> PathBuf {
        self.bin.path().join("aws")
    }

    fn log_path(&self) -> PathBuf {
        self.bin.path().join("calls.log")
    }

    /// Every call the fake AWS CLI received, as argument lists.
    ///
    /// When the plaintext came through stdin, the last element is
    /// `stdin=<data>`.
    pub fn calls(&self) -> Vec<Vec<String>> {
        let log = match fs::read_to_string(self.log_path()) {
            Ok(log) => log,
            Err(_) => return Vec::new(),
        };

        let mut calls = Vec::new();
        let mut current = Vec::new();
        for line in log.lines() {
            if line == "---" {
                calls.push(std::mem::take(&mut current));
            } else {
                current.push(line.to_string());
            }
        }
        calls
    }

    fn install_fake_aws(&self) {
        let script = FAKE_AWS.replace("{log}", &self.log_path().display().to_string());
        write_executable(&self.aws(), &script);
    }
}

#[cfg(unix)]
fn write_executable(path: &Path, contents: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, contents).expect("failed to write fake aws");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("failed to make fake aws executable");
}

#[cfg(not(unix))]
fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).expect("failed to write fake aws");
}
