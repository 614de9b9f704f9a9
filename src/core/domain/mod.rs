//! Domain types for a sealing run.

mod context;
mod secret;

pub use context::EncryptionContext;
pub use secret::{EncryptedEntry, Plaintext, SecretEntry};
