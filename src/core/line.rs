//! Secrets file line classification.
//!
//! Each line of a secrets file is one of:
//!
//! ```text
//!                              -> Blank      (skipped)
//! // a note                    -> Comment    (skipped)
//! bad line no equals           -> Malformed  (skipped, logged)
//! EMPTY_VAR=                   -> Unset      (skipped)
//! VAR_NAME=value               -> Secret     (encrypted)
//! ```
//!
//! A line is well formed when it matches `^[A-Z0-9=_]+=.*$` and does not
//! start with `=`. It is split once, at the first `=`: everything after it,
//! further `=` included, is the value.

use crate::core::constants;
use crate::core::domain::{Plaintext, SecretEntry};

/// Classification of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// Zero-length line
    Blank,
    /// Line starting with `//`
    Comment,
    /// Line that is not a `NAME=value` declaration
    Malformed,
    /// Declaration with an empty value
    Unset { variable: String },
    /// Declaration to encrypt
    Secret(SecretEntry),
}

/// Classify a line. Pure function of the line text.
pub fn classify(line: &str) -> Line {
    if line.is_empty() {
        return Line::Blank;
    }

    if line.starts_with(constants::COMMENT_PREFIX) {
        return Line::Comment;
    }

    let Some((variable, secret)) = split_declaration(line) else {
        return Line::Malformed;
    };

    if secret.is_empty() {
        return Line::Unset {
            variable: variable.to_string(),
        };
    }

    Line::Secret(SecretEntry::new(variable, Plaintext::from_secret(secret)))
}

/// The name part of a malformed line, for diagnostics.
///
/// Never includes anything after the first `=`, so values do not end up
/// in logs.
pub fn name_part(line: &str) -> &str {
    match line.split_once('=') {
        Some((name, _)) => name,
        None => line,
    }
}

/// Split a declaration at its first `=`, validating the variable name.
fn split_declaration(line: &str) -> Option<(&str, &str)> {
    let (variable, secret) = line.split_once('=')?;

    if variable.is_empty() || !variable.bytes().all(is_variable_byte) {
        return None;
    }

    Some((variable, secret))
}

fn is_variable_byte(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_'
}
