//! envseal - Encrypt a secrets file with AWS KMS before committing it.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envseal::cli::{execute, output, Cli};
use envseal::core::constants;
use envseal::error::{CipherError, ConfigError, Error};

fn main() {
    let cli = Cli::parse_normalized();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envseal=debug")
        } else {
            EnvFilter::new("envseal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(&cli) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingKeyId) => {
                Some("pass --key-id, e.g. --key-id b82051cc-2488-4ae4-a4ec-27cfb6f65dc9")
            }
            Error::Cipher(CipherError::CliNotFound(_)) => Some(
                "install the AWS CLI (https://aws.amazon.com/cli/) or point --aws-cli at it",
            ),
            Error::Seal {
                source: CipherError::TimedOut(_),
                ..
            } => Some("raise --timeout or check connectivity to KMS"),
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
