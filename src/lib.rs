//! envseal - seal a plaintext secrets file with a KMS key before committing.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── mod           # Flags and dispatch
//! │   ├── seal          # Seal / dry-run handlers
//! │   └── output        # Terminal output helpers
//! └── core/             # Core library components
//!     ├── config        # Run configuration (.envseal.toml + flags)
//!     ├── line          # Secrets file line classification
//!     ├── seal          # Line-processing pipeline
//!     ├── domain/       # Secret entries, plaintext, encryption context
//!     └── cipher/       # Encryptor trait and AWS KMS backends
//! ```

pub mod cli;
pub mod core;
pub mod error;
