//! Constants used throughout envseal.
//!
//! Centralizes magic strings and configuration values.

/// Default plaintext secrets file (.secrets).
pub const SECRETS_FILE: &str = ".secrets";

/// Default encrypted output file (.encrypted.secrets).
pub const ENCRYPTED_FILE: &str = ".encrypted.secrets";

/// Optional settings file read from the current directory.
pub const SETTINGS_FILE: &str = ".envseal.toml";

/// Default AWS CLI executable.
pub const AWS_CLI: &str = "aws";

/// Prefix marking a comment line in a secrets file.
pub const COMMENT_PREFIX: &str = "//";

/// Secrets starting with this prefix are handed to KMS as inline file data.
pub const URL_PREFIX: &str = "http";

/// `--plaintext` argument that makes the AWS CLI read raw bytes from stdin.
pub const STDIN_BLOB: &str = "fileb:///dev/stdin";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ENVSEAL_LOG";

/// Literal prefixes the AWS CLI would read as a file reference, not as text.
pub const PARAMFILE_PREFIXES: &[&str] = &["file://", "fileb://"];
