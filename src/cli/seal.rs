//! Seal command handlers.

use tracing::debug;

use crate::cli::{output, Cli};
use crate::core::cipher;
use crate::core::config::{SealConfig, Settings};
use crate::core::seal::{self, Report};
use crate::error::Result;

/// Resolve the run configuration from flags and settings.
///
/// Fails on a missing key id before any secrets file is opened.
fn resolve(cli: &Cli) -> Result<SealConfig> {
    let settings = Settings::discover(cli.config.as_deref())?;
    SealConfig::resolve(cli.overrides(), settings)
}

/// Encrypt the secrets file and write the encrypted file.
pub fn execute(cli: &Cli) -> Result<()> {
    let config = resolve(cli)?;
    let encryptor = cipher::from_config(&config)?;
    debug!(encryptor = encryptor.name(), "encryptor ready");

    let report = seal::seal_file(&config, encryptor.as_ref())?;

    output::success(&format!(
        "sealed {} {} into {}",
        report.sealed.len(),
        plural(report.sealed.len(), "secret", "secrets"),
        output::path(config.output.display())
    ));
    print_skips(&report);

    Ok(())
}

/// Show what would be sealed without calling KMS.
pub fn dry_run(cli: &Cli) -> Result<()> {
    let config = resolve(cli)?;
    let report = seal::plan(seal::open_input(&config.input)?)?;

    output::dimmed(&format!(
        "dry run: {} {} would be sealed into {}",
        report.sealed.len(),
        plural(report.sealed.len(), "secret", "secrets"),
        config.output.display()
    ));
    for variable in &report.sealed {
        output::list_item(variable);
    }
    print_skips(&report);

    Ok(())
}

fn print_skips(report: &Report) {
    if !report.unset.is_empty() {
        output::kv("empty, skipped:", report.unset.join(", "));
    }
    if !report.malformed.is_empty() {
        let lines: Vec<String> = report.malformed.iter().map(|n| n.to_string()).collect();
        output::warn(&format!(
            "{} malformed {} skipped (line {})",
            report.malformed.len(),
            plural(report.malformed.len(), "line", "lines"),
            lines.join(", ")
        ));
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
