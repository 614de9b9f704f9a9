//! The sealing pipeline.
//!
//! Reads a secrets file one line at a time, classifies each line, encrypts
//! the value of every declaration and writes `VARIABLE=ciphertext` lines.
//! Lines are processed strictly in order, one encryption call at a time.
//!
//! Output goes to a temporary file next to the destination and is renamed
//! into place only once every line succeeded, so a failed run never leaves
//! a partially encrypted file behind.

use std::fs::{File, Permissions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use crate::core::cipher::Encryptor;
use crate::core::config::SealConfig;
use crate::core::domain::EncryptionContext;
use crate::core::line::{self, Line};
use crate::core::types::VariableName;
use crate::error::{Error, Result, SecretsFileError};

/// What happened to the lines of one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Variables written to the output, in input order
    pub sealed: Vec<VariableName>,
    pub blank: usize,
    pub comments: usize,
    /// Line numbers (1-based) of malformed lines
    pub malformed: Vec<usize>,
    /// Variables skipped because their value was empty
    pub unset: Vec<VariableName>,
}

impl Report {
    /// Total number of skipped lines.
    pub fn skipped(&self) -> usize {
        self.blank + self.comments + self.malformed.len() + self.unset.len()
    }

    fn record_skip(&mut self, number: usize, text: &str, class: &Line) {
        match class {
            Line::Blank => self.blank += 1,
            Line::Comment => self.comments += 1,
            Line::Malformed => {
                warn!(
                    line = number,
                    name = line::name_part(text),
                    "skipping malformed line, expected NAME=value with NAME in [A-Z0-9_]"
                );
                self.malformed.push(number);
            }
            Line::Unset { variable } => {
                debug!(line = number, variable = %variable, "skipping empty value");
                self.unset.push(variable.clone());
            }
            Line::Secret(_) => {}
        }
    }
}

/// Drives one sealing run against an encryptor.
#[derive(Debug)]
pub struct Sealer<'a, E: Encryptor + ?Sized> {
    encryptor: &'a E,
    context: Option<&'a EncryptionContext>,
}

impl<'a, E: Encryptor + ?Sized> Sealer<'a, E> {
    pub fn new(encryptor: &'a E, context: Option<&'a EncryptionContext>) -> Self {
        Self { encryptor, context }
    }

    /// Seal every declaration read from `input` into `output`.
    ///
    /// # Errors
    ///
    /// Read, write and encryption failures abort the run at the failing line.
    /// Malformed lines and empty values are skipped, never errors.
    pub fn seal<R: BufRead, W: Write>(&self, input: R, output: &mut W) -> Result<Report> {
        let mut report = Report::default();

        for (index, text) in input.lines().enumerate() {
            let number = index + 1;
            let text = text.map_err(|source| SecretsFileError::Read {
                line: number,
                source,
            })?;

            let entry = match line::classify(&text) {
                Line::Secret(entry) => entry,
                other => {
                    report.record_skip(number, &text, &other);
                    continue;
                }
            };

            debug!(
                line = number,
                variable = entry.variable(),
                inline_file = entry.plaintext().is_inline_file(),
                "encrypting"
            );

            let ciphertext = self
                .encryptor
                .encrypt(entry.plaintext(), self.context)
                .map_err(|e| match e {
                    Error::Cipher(source) => Error::Seal {
                        variable: entry.variable().to_string(),
                        line: number,
                        source,
                    },
                    other => other,
                })?;

            let sealed = entry.seal(ciphertext);
            trace!(
                line = number,
                variable = sealed.variable(),
                ciphertext_len = sealed.ciphertext().len(),
                "sealed"
            );
            write!(output, "{}", sealed).map_err(SecretsFileError::Write)?;
            report.sealed.push(sealed.variable().to_string());
        }

        Ok(report)
    }
}

/// Classify every line of `input` without encrypting anything.
pub fn plan<R: BufRead>(input: R) -> Result<Report> {
    let mut report = Report::default();

    for (index, text) in input.lines().enumerate() {
        let number = index + 1;
        let text = text.map_err(|source| SecretsFileError::Read {
            line: number,
            source,
        })?;

        match line::classify(&text) {
            Line::Secret(entry) => report.sealed.push(entry.variable().to_string()),
            other => report.record_skip(number, &text, &other),
        }
    }

    Ok(report)
}

/// Open the configured input file.
pub fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|source| SecretsFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

/// Seal `config.input` into `config.output`.
///
/// The input is opened and the temporary output created before any line is
/// processed. The destination is replaced atomically on success and left
/// untouched on failure. A symlinked destination is followed and its target
/// replaced. The new file keeps the mode of the file it replaces, or gets
/// `0644` when there was none.
pub fn seal_file<E: Encryptor + ?Sized>(config: &SealConfig, encryptor: &E) -> Result<Report> {
    let input = open_input(&config.input)?;

    let destination = resolve_destination(&config.output);
    let create_error = |source| SecretsFileError::Create {
        path: config.output.clone(),
        source,
    };
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = tempfile::Builder::new()
        .prefix(".envseal-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(create_error)?;
    if let Some(permissions) = output_permissions(&destination) {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(create_error)?;
    }

    debug!(
        input = %config.input.display(),
        output = %destination.display(),
        temp = %temp.path().display(),
        encryptor = encryptor.name(),
        "sealing"
    );

    let mut writer = BufWriter::new(temp);
    let report = Sealer::new(encryptor, config.context.as_ref()).seal(input, &mut writer)?;

    let temp = writer
        .into_inner()
        .map_err(|e| SecretsFileError::Write(e.into_error()))?;
    temp.as_file()
        .sync_all()
        .map_err(SecretsFileError::Write)?;
    temp.persist(&destination)
        .map_err(|e| SecretsFileError::Persist {
            path: destination.clone(),
            source: e.error,
        })?;

    debug!(sealed = report.sealed.len(), skipped = report.skipped(), "sealed");
    Ok(report)
}

/// The file actually replaced: symlinks are followed, anything else is
/// returned as given.
fn resolve_destination(output: &Path) -> PathBuf {
    match std::fs::symlink_metadata(output) {
        Ok(meta) if meta.file_type().is_symlink() => {
            std::fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf())
        }
        _ => output.to_path_buf(),
    }
}

/// Permissions for the new output file.
fn output_permissions(destination: &Path) -> Option<Permissions> {
    if let Ok(meta) = std::fs::metadata(destination) {
        return Some(meta.permissions());
    }
    default_permissions()
}

#[cfg(unix)]
fn default_permissions() -> Option<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<Permissions> {
    None
}
