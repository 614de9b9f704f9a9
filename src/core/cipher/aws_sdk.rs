//! AWS KMS backend via the AWS SDK.
//!
//! Calls KMS `Encrypt` directly instead of spawning the CLI.
//! Enable with `--features aws`, select with `--backend sdk`.
//!
//! Uses AWS credentials from the environment (AWS_ACCESS_KEY_ID, etc.)
//! or from the default credential provider chain. The ciphertext blob is
//! base64-encoded, which is what `aws kms encrypt --output text` prints.

use std::collections::HashMap;
use tracing::trace;

use super::Encryptor;
use crate::core::domain::{EncryptionContext, Plaintext};
use crate::core::types::KeyId;
use crate::error::{CipherError, Result};

/// AWS KMS encryptor backed by `aws-sdk-kms`.
#[derive(Debug)]
pub struct AwsSdk {
    key_id: KeyId,
    client: aws_sdk_kms::Client,
    runtime: tokio::runtime::Runtime,
}

impl AwsSdk {
    /// Load AWS configuration and create a KMS client.
    pub fn connect(
        key_id: impl Into<KeyId>,
        region: Option<String>,
        profile: Option<String>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CipherError::Sdk(format!("failed to create runtime: {}", e)))?;

        let client = runtime.block_on(async {
            let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
            if let Some(region) = region {
                loader = loader.region(aws_sdk_kms::config::Region::new(region));
            }
            if let Some(profile) = profile {
                loader = loader.profile_name(profile);
            }
            aws_sdk_kms::Client::new(&loader.load().await)
        });

        Ok(Self {
            key_id: key_id.into(),
            client,
            runtime,
        })
    }
}

impl Encryptor for AwsSdk {
    fn name(&self) -> &'static str {
        "aws-sdk"
    }

    fn encrypt(
        &self,
        plaintext: &Plaintext,
        context: Option<&EncryptionContext>,
    ) -> Result<String> {
        use ::base64::Engine;

        trace!(
            key_id = %self.key_id,
            plaintext_len = plaintext.len(),
            "encrypting with AWS SDK"
        );

        let pairs = context.map(context_pairs).transpose()?;

        self.runtime.block_on(async {
            let result = self
                .client
                .encrypt()
                .key_id(&self.key_id)
                .plaintext(aws_sdk_kms::primitives::Blob::new(
                    plaintext.expose().as_bytes(),
                ))
                .set_encryption_context(pairs)
                .send()
                .await
                .map_err(|e| CipherError::Sdk(format!("KMS encrypt failed: {}", e)))?;

            let blob = result
                .ciphertext_blob()
                .ok_or_else(|| CipherError::Sdk("no ciphertext returned".into()))?;

            let mut encoded = ::base64::engine::general_purpose::STANDARD.encode(blob.as_ref());
            // match the CLI's text output
            encoded.push('\n');

            trace!(ciphertext_len = encoded.len(), "encrypted with AWS SDK");
            Ok::<_, crate::error::Error>(encoded)
        })
    }
}

/// Parse an encryption context the way the AWS CLI accepts it.
///
/// Either a JSON object of strings (`{"env":"prod"}`) or shorthand
/// (`env=prod,type=credentials`).
pub fn context_pairs(context: &EncryptionContext) -> Result<HashMap<String, String>> {
    let raw = context.as_str().trim();

    if raw.starts_with('{') {
        return serde_json::from_str(raw)
            .map_err(|e| CipherError::InvalidContext(format!("invalid JSON: {}", e)).into());
    }

    let mut pairs = HashMap::new();
    for item in raw.split(',') {
        let (key, value) = item.split_once('=').ok_or_else(|| {
            CipherError::InvalidContext(format!("expected key=value, got `{}`", item))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(CipherError::InvalidContext(format!("empty key in `{}`", item)).into());
        }
        pairs.insert(key.to_string(), value.trim().to_string());
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(s: &str) -> EncryptionContext {
        EncryptionContext::new(s).unwrap()
    }

    #[test]
    fn test_shorthand_context() {
        let pairs = context_pairs(&ctx("type=credentials,env=production")).unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs["type"], "credentials");
        assert_eq!(pairs["env"], "production");
    }

    #[test]
    fn test_json_context() {
        let pairs = context_pairs(&ctx(r#"{"env": "production"}"#)).unwrap();
        assert_eq!(pairs["env"], "production");
    }

    #[test]
    fn test_invalid_context() {
        assert!(context_pairs(&ctx("no-equals")).is_err());
        assert!(context_pairs(&ctx("=value")).is_err());
        assert!(context_pairs(&ctx("{not json")).is_err());
    }
}
