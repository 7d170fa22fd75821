use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_ec2 as ec2;

use crate::config::BackupTag;
use crate::error::TaggerError;
use crate::tagger_core::ResourceApi;

/// EBS volumes, identified and tagged by volume id.
pub struct EbsApi {
    client: ec2::Client,
}

impl EbsApi {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self::from_client(ec2::Client::new(conf))
    }

    pub fn from_client(client: ec2::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceApi for EbsApi {
    fn name(&self) -> &'static str {
        "ebs"
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut next: Option<String> = None;

        loop {
            let resp = self
                .client
                .describe_volumes()
                .set_next_token(next.clone())
                .send()
                .await?;

            for vol in resp.volumes() {
                let vol_id = vol.volume_id().ok_or(TaggerError::MissingIdentifier {
                    kind: "ebs",
                    field: "VolumeId",
                })?;
                out.push(vol_id.to_string());
            }

            next = resp.next_token().map(|s| s.to_string());
            if next.is_none() {
                break;
            }
        }
        Ok(out)
    }

    async fn tag_keys(&self, resource_id: &str) -> Result<Vec<String>> {
        let filter = ec2::types::Filter::builder()
            .name("resource-id")
            .values(resource_id)
            .build();

        let mut keys = Vec::new();
        let mut paginator = self
            .client
            .describe_tags()
            .filters(filter)
            .into_paginator()
            .send();
        while let Some(page) = paginator.next().await.transpose()? {
            keys.extend(page.tags().iter().filter_map(|t| t.key().map(|k| k.to_string())));
        }
        Ok(keys)
    }

    async fn add_tag(&self, resource_id: &str, tag: &BackupTag) -> Result<()> {
        self.client
            .create_tags()
            .resources(resource_id)
            .tags(
                ec2::types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build(),
            )
            .send()
            .await?;
        Ok(())
    }
}
