//! Secret entry types.
//!
//! A `SecretEntry` lives for exactly one input line: it is encrypted, turned
//! into an `EncryptedEntry`, written out and dropped.

use std::fmt;
use zeroize::Zeroizing;

use crate::core::constants;
use crate::core::types::{Ciphertext, VariableName};

/// Plaintext handed to KMS.
///
/// Values that look like URLs are passed as inline file data rather than as
/// a literal argument, otherwise the AWS CLI tries to fetch them. The secret
/// bytes are identical in both cases.
#[derive(Clone, PartialEq, Eq)]
pub enum Plaintext {
    /// Passed as the `--plaintext` argument itself
    Literal(Zeroizing<String>),
    /// Passed as `fileb://` data, the equivalent of `fileb://<(echo -n '<secret>')`
    InlineFile(Zeroizing<String>),
}

impl Plaintext {
    /// Wrap a secret value, applying the URL rewrite.
    pub fn from_secret(secret: &str) -> Self {
        let value = Zeroizing::new(secret.to_string());
        if secret.starts_with(constants::URL_PREFIX) {
            Self::InlineFile(value)
        } else {
            Self::Literal(value)
        }
    }

    /// The literal secret text.
    pub fn expose(&self) -> &str {
        match self {
            Self::Literal(value) | Self::InlineFile(value) => value.as_str(),
        }
    }

    /// Whether this plaintext must be passed as inline file data.
    pub fn is_inline_file(&self) -> bool {
        matches!(self, Self::InlineFile(_))
    }

    pub fn len(&self) -> usize {
        self.expose().len()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl fmt::Debug for Plaintext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Literal(_) => "Literal",
            Self::InlineFile(_) => "InlineFile",
        };
        write!(f, "{}(<{} bytes redacted>)", kind, self.len())
    }
}

/// A variable and its plaintext value, parsed from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretEntry {
    variable: VariableName,
    plaintext: Plaintext,
}

impl SecretEntry {
    pub fn new(variable: impl Into<VariableName>, plaintext: Plaintext) -> Self {
        Self {
            variable: variable.into(),
            plaintext,
        }
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn plaintext(&self) -> &Plaintext {
        &self.plaintext
    }

    /// Pair the variable with its ciphertext.
    pub fn seal(self, ciphertext: Ciphertext) -> EncryptedEntry {
        EncryptedEntry {
            variable: self.variable,
            ciphertext,
        }
    }
}

/// A variable and the ciphertext KMS returned for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedEntry {
    variable: VariableName,
    ciphertext: Ciphertext,
}

impl EncryptedEntry {
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }
}

/// `VARIABLE=ciphertext`, ciphertext written verbatim.
impl fmt::Display for EncryptedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.variable, self.ciphertext)
    }
}
