//! Encryptor selection from run configuration.

use tracing::debug;

use super::{AwsCli, Encryptor};
use crate::core::config::{Backend, SealConfig};
#[cfg(not(feature = "aws"))]
use crate::error::ConfigError;
use crate::error::Result;

/// Build the encryptor a run is configured for.
///
/// # Errors
///
/// Returns `CipherError::CliNotFound` when the AWS CLI cannot be located, or
/// `ConfigError::BackendUnavailable` when the SDK backend is not compiled in.
pub fn from_config(config: &SealConfig) -> Result<Box<dyn Encryptor>> {
    match config.backend {
        Backend::Cli => {
            debug!(program = %config.aws_cli, "creating AWS CLI encryptor");
            let cli = AwsCli::locate(&config.aws_cli, config.key_id.clone())?
                .with_region(config.region.clone())
                .with_profile(config.profile.clone())
                .with_timeout(config.timeout);
            Ok(Box::new(cli))
        }
        Backend::Sdk => {
            #[cfg(feature = "aws")]
            {
                debug!("creating AWS SDK encryptor");
                let sdk = super::AwsSdk::connect(
                    config.key_id.clone(),
                    config.region.clone(),
                    config.profile.clone(),
                )?;
                Ok(Box::new(sdk))
            }
            #[cfg(not(feature = "aws"))]
            {
                Err(ConfigError::BackendUnavailable("sdk").into())
            }
        }
    }
}
