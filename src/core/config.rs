//! Run configuration.
//!
//! Settings come from three places, highest precedence first:
//!
//! 1. Command-line flags (and their environment variables)
//! 2. The optional `.envseal.toml` settings file
//! 3. Built-in defaults
//!
//! They are merged once at startup into an immutable [`SealConfig`].
//!
//! ```toml
//! key_id = "arn:aws:kms:us-east-1:123456789012:key/abc-123"
//! encryption_context = "type=credentials,env=production"
//! input = ".secrets"
//! output = ".encrypted.secrets"
//!
//! [aws]
//! region = "us-east-1"
//! timeout_secs = 30
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::core::domain::EncryptionContext;
use crate::core::types::KeyId;
use crate::error::{ConfigError, Result};

/// Encryption backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Spawn the AWS CLI per secret
    #[default]
    Cli,
    /// Call KMS through the AWS SDK (`aws` feature)
    Sdk,
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cli => "cli",
            Self::Sdk => "sdk",
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cli" => Ok(Self::Cli),
            "sdk" => Ok(Self::Sdk),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Contents of `.envseal.toml`. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub key_id: Option<KeyId>,
    pub encryption_context: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub backend: Option<String>,
    #[serde(default)]
    pub aws: AwsSettings,
}

/// `[aws]` table of the settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsSettings {
    /// AWS CLI executable
    pub cli: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    /// Per-call timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadSettings` or `ConfigError::ParseSettings`.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading settings");

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadSettings {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = toml::from_str(&contents).map_err(|source| ConfigError::ParseSettings {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(settings)
    }

    /// Load the explicitly requested settings file, or `.envseal.toml` if present.
    ///
    /// A missing default file is not an error; a missing explicit one is.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => {
                Err(ConfigError::SettingsNotFound(path.to_path_buf()).into())
            }
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(constants::SETTINGS_FILE);
                if default.exists() {
                    Self::load(default)
                } else {
                    debug!("no settings file, using flags and defaults");
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub key_id: Option<KeyId>,
    pub encryption_context: Option<String>,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub aws_cli: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Immutable configuration for one sealing run.
#[derive(Debug, Clone)]
pub struct SealConfig {
    pub key_id: KeyId,
    pub context: Option<EncryptionContext>,
    pub input: PathBuf,
    pub output: PathBuf,
    pub backend: Backend,
    pub aws_cli: String,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub timeout: Option<Duration>,
}

impl SealConfig {
    /// Merge command-line values over settings and defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKeyId` if no non-empty key id is given anywhere,
    /// or `ConfigError::UnknownBackend` for a bad `backend` setting.
    pub fn resolve(overrides: Overrides, settings: Settings) -> Result<Self> {
        let key_id = overrides
            .key_id
            .or(settings.key_id)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingKeyId)?;

        let backend = match (overrides.backend, settings.backend) {
            (Some(backend), _) => backend,
            (None, Some(name)) => name.parse()?,
            (None, None) => Backend::default(),
        };

        let context = overrides
            .encryption_context
            .or(settings.encryption_context)
            .and_then(EncryptionContext::new);

        let config = Self {
            key_id,
            context,
            input: overrides
                .input
                .or(settings.input)
                .unwrap_or_else(|| PathBuf::from(constants::SECRETS_FILE)),
            output: overrides
                .output
                .or(settings.output)
                .unwrap_or_else(|| PathBuf::from(constants::ENCRYPTED_FILE)),
            backend,
            aws_cli: overrides
                .aws_cli
                .or(settings.aws.cli)
                .unwrap_or_else(|| constants::AWS_CLI.to_string()),
            region: overrides.region.or(settings.aws.region),
            profile: overrides.profile.or(settings.aws.profile),
            timeout: overrides
                .timeout_secs
                .or(settings.aws.timeout_secs)
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        };

        debug!(
            key_id = %config.key_id,
            input = %config.input.display(),
            output = %config.output.display(),
            backend = config.backend.name(),
            context = config.context.is_some(),
            "run configuration resolved"
        );

        Ok(config)
    }
}
