//! Command-line interface.

pub mod output;
pub mod seal;

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::config::{Backend, Overrides};

/// Long flags that may also be written with a single dash (`-ec`, `-key-id`).
const SINGLE_DASH_LONG: &[&str] = &[
    "ec",
    "encryption-context",
    "key-id",
    "file",
    "output",
    "region",
    "profile",
    "aws-cli",
    "backend",
    "timeout",
    "config",
    "dry-run",
    "verbose",
];

/// envseal - Encrypt a secrets file with AWS KMS before committing it.
#[derive(Parser, Debug)]
#[command(
    name = "envseal",
    about = "Encrypt a .secrets file with AWS KMS before committing it",
    version,
    after_help = "Commit the encrypted file, never the plaintext one."
)]
pub struct Cli {
    /// File path to read secrets from [default: .secrets]
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Output file path to write encrypted secrets to [default: .encrypted.secrets]
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Encryption context for authenticated encryption, e.g. type=credentials,env=production
    #[arg(long = "ec", visible_alias = "encryption-context", value_name = "CONTEXT")]
    pub encryption_context: Option<String>,

    /// KMS key used to encrypt the secrets, e.g. b82051cc-2488-4ae4-a4ec-27cfb6f65dc9
    #[arg(long, env = "ENVSEAL_KEY_ID", value_name = "KEY_ID")]
    pub key_id: Option<String>,

    /// AWS region passed to KMS
    #[arg(long)]
    pub region: Option<String>,

    /// AWS profile passed to KMS
    #[arg(long)]
    pub profile: Option<String>,

    /// AWS CLI executable [default: aws]
    #[arg(long, env = "ENVSEAL_AWS_CLI", value_name = "PATH")]
    pub aws_cli: Option<String>,

    /// Encryption backend: `cli` (aws kms encrypt) or `sdk` (needs the `aws` feature)
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Give up on a single encryption call after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Settings file [default: .envseal.toml when present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Show what would be encrypted without calling KMS or writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse the process arguments, accepting single-dash long flags.
    pub fn parse_normalized() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// Flag values as configuration overrides.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            key_id: self.key_id.clone(),
            encryption_context: self.encryption_context.clone(),
            input: self.input.clone(),
            output: self.output.clone(),
            backend: self.backend,
            aws_cli: self.aws_cli.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
            timeout_secs: self.timeout,
        }
    }
}

/// Short flags that may also be written with two dashes (`--f`, `--o=out`).
const DOUBLE_DASH_SHORT: &[&str] = &["f", "o"];

/// Rewrite Go-style flag spellings to what clap expects.
///
/// Single-dash long flags (`-ec`, `-key-id=K`) get a second dash, and
/// double-dash short flags (`--f`, `--o=out`) lose one. Arguments after `--`
/// and values of other flags are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut passthrough = false;
    let mut normalized = Vec::new();

    for arg in args {
        let Some(text) = arg.to_str().filter(|_| !passthrough) else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            passthrough = true;
            normalized.push(arg);
            continue;
        }

        if let Some(rest) = text.strip_prefix("--") {
            let (name, value) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };
            if DOUBLE_DASH_SHORT.contains(&name) {
                normalized.push(OsString::from(format!("-{}", name)));
                normalized.extend(value.map(OsString::from));
                continue;
            }
        } else if let Some(rest) = text.strip_prefix('-') {
            let name = rest.split_once('=').map_or(rest, |(name, _)| name);
            if SINGLE_DASH_LONG.contains(&name) {
                normalized.push(OsString::from(format!("-{}", text)));
                continue;
            }
        }
        normalized.push(arg);
    }

    normalized
}

/// Execute the command line.
pub fn execute(cli: &Cli) -> crate::error::Result<()> {
    if cli.dry_run {
        seal::dry_run(cli)
    } else {
        seal::execute(cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(args: &[&str]) -> Vec<String> {
        normalize_args(args.iter().map(OsString::from))
            .into_iter()
            .map(|a| a.to_string_lossy().to_string())
            .collect()
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(normalize_args(args.iter().map(OsString::from))).unwrap()
    }

    #[test]
    fn test_single_dash_long_flags() {
        assert_eq!(
            normalized(&["envseal", "-ec", "env=prod", "-key-id", "K1"]),
            vec!["envseal", "--ec", "env=prod", "--key-id", "K1"]
        );
        assert_eq!(
            normalized(&["envseal", "-key-id=K1"]),
            vec!["envseal", "--key-id=K1"]
        );
    }

    #[test]
    fn test_short_flags_untouched() {
        assert_eq!(
            normalized(&["envseal", "-f", "in", "-o", "out", "-v"]),
            vec!["envseal", "-f", "in", "-o", "out", "-v"]
        );
    }

    #[test]
    fn test_double_dash_short_flags() {
        assert_eq!(
            normalized(&["envseal", "--f", "in", "--o=out"]),
            vec!["envseal", "-f", "in", "-o", "out"]
        );
        assert_eq!(normalized(&["envseal", "--file", "in"]), vec!["envseal", "--file", "in"]);
    }

    #[test]
    fn test_parse_go_double_dash_invocation() {
        let cli = parse(&["envseal", "--f", "prod.secrets", "--o=prod.sealed", "--key-id=K1"]);
        assert_eq!(cli.input, Some(PathBuf::from("prod.secrets")));
        assert_eq!(cli.output, Some(PathBuf::from("prod.sealed")));
        assert_eq!(cli.key_id.as_deref(), Some("K1"));
    }

    #[test]
    fn test_values_and_passthrough_untouched() {
        assert_eq!(
            normalized(&["envseal", "--key-id", "K1", "--", "-ec"]),
            vec!["envseal", "--key-id", "K1", "--", "-ec"]
        );
    }

    #[test]
    fn test_parse_go_style_invocation() {
        let cli = parse(&[
            "envseal",
            "-f",
            "prod.secrets",
            "-o",
            "prod.encrypted",
            "-ec",
            "type=credentials,env=production",
            "--key-id",
            "b82051cc-2488-4ae4-a4ec-27cfb6f65dc9",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.input, Some(PathBuf::from("prod.secrets")));
        assert_eq!(overrides.output, Some(PathBuf::from("prod.encrypted")));
        assert_eq!(
            overrides.encryption_context.as_deref(),
            Some("type=credentials,env=production")
        );
        assert_eq!(
            overrides.key_id.as_deref(),
            Some("b82051cc-2488-4ae4-a4ec-27cfb6f65dc9")
        );
    }

    #[test]
    fn test_parse_long_aliases() {
        let cli = parse(&[
            "envseal",
            "--encryption-context",
            "env=dev",
            "--backend",
            "cli",
            "--timeout",
            "30",
        ]);
        assert_eq!(cli.encryption_context.as_deref(), Some("env=dev"));
        assert_eq!(cli.backend, Some(Backend::Cli));
        assert_eq!(cli.timeout, Some(30));
    }

    #[test]
    fn test_bad_backend_rejected() {
        let result = Cli::try_parse_from(["envseal", "--backend", "gpg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
