use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_dynamodb as ddb;

use crate::config::BackupTag;
use crate::error::TaggerError;
use crate::tagger_core::ResourceApi;

/// DynamoDB tables. Listing yields names only; each name is described on
/// its turn to obtain the ARN used for tagging.
pub struct DynamoDbApi {
    client: ddb::Client,
}

impl DynamoDbApi {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self::from_client(ddb::Client::new(conf))
    }

    pub fn from_client(client: ddb::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceApi for DynamoDbApi {
    fn name(&self) -> &'static str {
        "dynamodb"
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut start: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_tables()
                .set_exclusive_start_table_name(start.clone())
                .send()
                .await?;

            names.extend(resp.table_names().iter().cloned());

            start = resp.last_evaluated_table_name().map(|s| s.to_string());
            if start.is_none() {
                break;
            }
        }
        Ok(names)
    }

    async fn resolve_id(&self, table_name: &str) -> Result<String> {
        let resp = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .with_context(|| format!("describing table {table_name}"))?;

        resp.table()
            .and_then(|t| t.table_arn())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TaggerError::MissingIdentifier {
                    kind: "dynamodb",
                    field: "TableArn",
                }
                .into()
            })
    }

    async fn tag_keys(&self, resource_id: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut next: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_tags_of_resource()
                .resource_arn(resource_id)
                .set_next_token(next.clone())
                .send()
                .await?;

            keys.extend(resp.tags().iter().map(|t| t.key().to_string()));

            next = resp.next_token().map(|s| s.to_string());
            if next.is_none() {
                break;
            }
        }
        Ok(keys)
    }

    async fn add_tag(&self, resource_id: &str, tag: &BackupTag) -> Result<()> {
        self.client
            .tag_resource()
            .resource_arn(resource_id)
            .tags(
                ddb::types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build()?,
            )
            .send()
            .await?;
        Ok(())
    }
}
