//! Type aliases for domain concepts.

/// An environment variable name from the secrets file (e.g. DATABASE_URL).
///
/// Only A-Z, 0-9 and underscore.
pub type VariableName = String;

/// Ciphertext text exactly as returned by KMS.
pub type Ciphertext = String;

/// A KMS key identifier: key id, key ARN, alias name or alias ARN.
pub type KeyId = String;
