//! AWS KMS backend via the AWS CLI.
//!
//! Spawns one `aws kms encrypt` per secret with an explicit argument vector.
//! No shell is involved, so secret values are never interpreted as shell
//! syntax.
//!
//! ## Requirements
//!
//! - `aws` CLI installed (or pointed to with `--aws-cli`) and authenticated
//! - `kms:Encrypt` permission on the key
//!
//! ## Invocation
//!
//! ```text
//! aws kms encrypt --key-id <KEY> --plaintext <SECRET> \
//!     --output text --query CiphertextBlob \
//!     [--encryption-context <CTX>] [--region <R>] [--profile <P>]
//! ```
//!
//! Secrets the CLI would not take literally are passed as
//! `--plaintext fileb:///dev/stdin` with the secret written to the child's
//! stdin: URLs, values starting with `-` (read as an option) and values
//! starting with `file://` or `fileb://` (read as a local file).

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::trace;

use super::{process, Encryptor};
use crate::core::constants;
use crate::core::domain::{EncryptionContext, Plaintext};
use crate::core::types::KeyId;
use crate::error::{CipherError, Result};

/// AWS KMS encryptor backed by the AWS CLI.
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: PathBuf,
    key_id: KeyId,
    region: Option<String>,
    profile: Option<String>,
    timeout: Option<Duration>,
}

impl AwsCli {
    /// Create an encryptor using the given executable as-is.
    pub fn new(program: impl Into<PathBuf>, key_id: impl Into<KeyId>) -> Self {
        Self {
            program: program.into(),
            key_id: key_id.into(),
            region: None,
            profile: None,
            timeout: None,
        }
    }

    /// Resolve `program` on `PATH` (or check an explicit path) and create an encryptor.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::CliNotFound` if the executable cannot be found.
    pub fn locate(program: &str, key_id: impl Into<KeyId>) -> Result<Self> {
        let path = which::which(program)
            .map_err(|e| CipherError::CliNotFound(format!("{}: {}", program, e)))?;
        trace!(path = %path.display(), "resolved AWS CLI");
        Ok(Self::new(path, key_id))
    }

    pub fn with_region(mut self, region: Option<String>) -> Self {
        self.region = region;
        self
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    /// Kill calls that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Argument vector for one encryption call.
    fn args(&self, plaintext: &Plaintext, context: Option<&EncryptionContext>) -> Vec<OsString> {
        let plaintext_arg = if needs_stdin(plaintext) {
            constants::STDIN_BLOB
        } else {
            plaintext.expose()
        };

        let mut args: Vec<OsString> = [
            "kms",
            "encrypt",
            "--key-id",
            self.key_id.as_str(),
            "--plaintext",
            plaintext_arg,
            "--output",
            "text",
            "--query",
            "CiphertextBlob",
        ]
        .into_iter()
        .map(OsString::from)
        .collect();

        if let Some(ctx) = context {
            args.push("--encryption-context".into());
            args.push(ctx.as_str().into());
        }
        if let Some(region) = &self.region {
            args.push("--region".into());
            args.push(region.into());
        }
        if let Some(profile) = &self.profile {
            args.push("--profile".into());
            args.push(profile.into());
        }

        args
    }
}

/// Whether the secret has to bypass the CLI's own argument parsing.
fn needs_stdin(plaintext: &Plaintext) -> bool {
    if plaintext.is_inline_file() {
        return true;
    }
    let value = plaintext.expose();
    value.starts_with('-')
        || constants::PARAMFILE_PREFIXES
            .iter()
            .any(|prefix| value.starts_with(prefix))
}

impl Encryptor for AwsCli {
    fn name(&self) -> &'static str {
        "aws-cli"
    }

    fn encrypt(
        &self,
        plaintext: &Plaintext,
        context: Option<&EncryptionContext>,
    ) -> Result<String> {
        trace!(
            key_id = %self.key_id,
            plaintext_len = plaintext.len(),
            stdin = needs_stdin(plaintext),
            context = context.is_some(),
            "encrypting with AWS CLI"
        );

        let mut command = Command::new(&self.program);
        command.args(self.args(plaintext, context));

        let stdin = needs_stdin(plaintext).then(|| plaintext.expose().as_bytes());

        let output = process::run(command, stdin, self.timeout)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CipherError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            }
            .into());
        }

        let ciphertext = String::from_utf8(output.stdout).map_err(|_| CipherError::InvalidOutput)?;

        trace!(ciphertext_len = ciphertext.len(), "encrypted with AWS CLI");
        Ok(ciphertext)
    }
}
