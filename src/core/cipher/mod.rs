//! Encryption backends.
//!
//! Provides the encryption abstraction consumed by the sealing pipeline.
//!
//! ## Backends
//!
//! - **AWS CLI**: Default, always available. Spawns `aws kms encrypt` once per secret.
//! - **AWS SDK**: Feature-gated (`aws`). Calls KMS directly through `aws-sdk-kms`.

use std::fmt;

use crate::core::domain::{EncryptionContext, Plaintext};
use crate::error::Result;

mod aws_cli;
mod backend;
mod process;

#[cfg(feature = "aws")]
pub mod aws_sdk;

pub use aws_cli::AwsCli;
pub use backend::from_config;

#[cfg(feature = "aws")]
pub use aws_sdk::AwsSdk;

/// Encryption backend trait.
///
/// One call per secret; the key identifier is part of the backend's own
/// configuration. Any error is fatal to the run.
pub trait Encryptor: fmt::Debug {
    /// Encrypt a plaintext, binding the optional encryption context.
    ///
    /// # Returns
    ///
    /// Ciphertext text exactly as the service returned it.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the service cannot be reached or rejects the call.
    fn encrypt(&self, plaintext: &Plaintext, context: Option<&EncryptionContext>)
        -> Result<String>;

    /// Backend name for display/logs.
    fn name(&self) -> &'static str;
}

impl<E: Encryptor + ?Sized> Encryptor for Box<E> {
    fn encrypt(
        &self,
        plaintext: &Plaintext,
        context: Option<&EncryptionContext>,
    ) -> Result<String> {
        (**self).encrypt(plaintext, context)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Recording mock for testing.
///
/// Returns `mock(<hex plaintext>)` followed by a newline, like the text output
/// of the AWS CLI, and remembers every call it received.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockKms {
    calls: std::cell::RefCell<Vec<MockCall>>,
    fail_on: Option<String>,
}

/// One call seen by `MockKms`.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub plaintext: String,
    pub inline_file: bool,
    pub context: Option<String>,
}

#[cfg(test)]
impl MockKms {
    /// A mock that fails whenever the plaintext equals `value`.
    pub fn failing_on(value: &str) -> Self {
        Self {
            calls: Default::default(),
            fail_on: Some(value.to_string()),
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.borrow().clone()
    }

    pub fn ciphertext_for(plaintext: &str) -> String {
        let hex: String = plaintext.bytes().map(|b| format!("{:02x}", b)).collect();
        format!("mock({})\n", hex)
    }
}

#[cfg(test)]
impl Encryptor for MockKms {
    fn encrypt(
        &self,
        plaintext: &Plaintext,
        context: Option<&EncryptionContext>,
    ) -> Result<String> {
        self.calls.borrow_mut().push(MockCall {
            plaintext: plaintext.expose().to_string(),
            inline_file: plaintext.is_inline_file(),
            context: context.map(|c| c.as_str().to_string()),
        });

        if self.fail_on.as_deref() == Some(plaintext.expose()) {
            return Err(crate::error::CipherError::Failed {
                status: "exit status: 255".to_string(),
                stderr: "mock failure".to_string(),
            }
            .into());
        }

        Ok(Self::ciphertext_for(plaintext.expose()))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
