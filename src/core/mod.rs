//! Core library components.
//!
//! Everything with decision logic lives here: line classification, the
//! sealing pipeline and the encryption backends.

pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod line;
pub mod seal;
pub mod types;
