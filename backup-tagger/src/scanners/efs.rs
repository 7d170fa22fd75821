use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_efs as efs;

use crate::config::BackupTag;
use crate::tagger_core::ResourceApi;

/// EFS file systems, identified and tagged by file-system id.
///
/// Tags go through DescribeTags / CreateTags, so the execution role needs
/// `elasticfilesystem:DescribeTags` and `elasticfilesystem:CreateTags`.
pub struct EfsApi {
    client: efs::Client,
}

impl EfsApi {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self::from_client(efs::Client::new(conf))
    }

    pub fn from_client(client: efs::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceApi for EfsApi {
    fn name(&self) -> &'static str {
        "efs"
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut paginator = self.client.describe_file_systems().into_paginator().send();
        while let Some(page) = paginator.next().await.transpose()? {
            for fs in page.file_systems() {
                out.push(fs.file_system_id().to_string());
            }
        }
        Ok(out)
    }

    #[allow(deprecated)]
    async fn tag_keys(&self, resource_id: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let resp = self
                .client
                .describe_tags()
                .file_system_id(resource_id)
                .set_marker(marker.clone())
                .send()
                .await?;

            keys.extend(resp.tags().iter().map(|t| t.key().to_string()));

            marker = resp.next_marker().map(|s| s.to_string());
            if marker.is_none() {
                break;
            }
        }
        Ok(keys)
    }

    #[allow(deprecated)]
    async fn add_tag(&self, resource_id: &str, tag: &BackupTag) -> Result<()> {
        self.client
            .create_tags()
            .file_system_id(resource_id)
            .tags(
                efs::types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build()?,
            )
            .send()
            .await?;
        Ok(())
    }
}
