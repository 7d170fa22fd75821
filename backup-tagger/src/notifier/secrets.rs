use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_secretsmanager as secretsmanager;

use crate::error::TaggerError;

#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn secret_string(&self, secret_id: &str) -> Result<String>;
}

/// Reads plaintext secrets from AWS Secrets Manager. No caching: every call
/// goes to the service.
pub struct SecretsManagerSource {
    client: secretsmanager::Client,
}

impl SecretsManagerSource {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self {
            client: secretsmanager::Client::new(conf),
        }
    }
}

#[async_trait]
impl SecretSource for SecretsManagerSource {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        let out = self
            .client
            .get_secret_value()
            .secret_id(secret_id)
            .send()
            .await
            .with_context(|| format!("fetching secret {secret_id}"))?;

        out.secret_string()
            .map(str::to_string)
            .ok_or_else(|| {
                TaggerError::EmptySecret {
                    secret_id: secret_id.to_string(),
                }
                .into()
            })
    }
}
