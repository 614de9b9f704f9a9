//! Error types for envseal.
//!
//! Errors are grouped by where they come from: run configuration, the
//! encryption backend, and the secrets files themselves. Every variant is
//! fatal to the run; per-line problems never surface as errors.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    SecretsFile(#[from] SecretsFileError),

    /// Encryption of one variable failed; the whole run is aborted.
    #[error("failed to encrypt {variable} (line {line}): {source}")]
    Seal {
        variable: String,
        line: usize,
        #[source]
        source: CipherError,
    },
}

/// Run configuration errors, raised before any file is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("required flag `--key-id` not set")]
    MissingKeyId,

    #[error("settings file not found: {0}")]
    SettingsNotFound(PathBuf),

    #[error("failed to read settings file {path}: {source}")]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown backend in settings: {0} (expected `cli` or `sdk`)")]
    UnknownBackend(String),

    #[error("backend `{0}` is not available in this build (rebuild with `--features aws`)")]
    BackendUnavailable(&'static str),
}

/// Failures of the external encryption service.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("AWS CLI not found: {0}")]
    CliNotFound(String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to pass plaintext to the AWS CLI: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed waiting for the AWS CLI: {0}")]
    Wait(#[source] std::io::Error),

    #[error("kms encrypt exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    #[error("kms encrypt did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("kms encrypt returned non-UTF-8 output")]
    InvalidOutput,

    #[error("invalid encryption context: {0}")]
    InvalidContext(String),

    #[error("KMS request failed: {0}")]
    Sdk(String),
}

/// Errors opening, reading or writing the secrets files.
#[derive(Error, Debug)]
pub enum SecretsFileError {
    #[error("cannot open secrets file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read secrets file at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot create output file {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output: {0}")]
    Write(#[source] std::io::Error),

    #[error("cannot move output into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
