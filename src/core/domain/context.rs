//! Encryption context.

use std::fmt;

/// Opaque encryption context forwarded unchanged to every KMS call of a run.
///
/// KMS binds it to the ciphertext; the same value is required to decrypt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionContext(String);

impl EncryptionContext {
    /// Wrap a context string. An empty string means no context.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncryptionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
