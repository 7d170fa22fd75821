use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_rds as rds;

use crate::config::BackupTag;
use crate::error::TaggerError;
use crate::tagger_core::ResourceApi;

/// RDS DB instances, identified and tagged by instance ARN.
pub struct RdsApi {
    client: rds::Client,
}

impl RdsApi {
    pub fn new(conf: &aws_config::SdkConfig) -> Self {
        Self::from_client(rds::Client::new(conf))
    }

    pub fn from_client(client: rds::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceApi for RdsApi {
    fn name(&self) -> &'static str {
        "rds"
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut out = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let resp = self
                .client
                .describe_db_instances()
                .set_marker(marker.clone())
                .send()
                .await?;

            for db in resp.db_instances() {
                let arn = db.db_instance_arn().ok_or(TaggerError::MissingIdentifier {
                    kind: "rds",
                    field: "DBInstanceArn",
                })?;
                out.push(arn.to_string());
            }

            marker = resp.marker().map(|s| s.to_string());
            if marker.is_none() {
                break;
            }
        }
        Ok(out)
    }

    async fn tag_keys(&self, resource_id: &str) -> Result<Vec<String>> {
        let resp = self
            .client
            .list_tags_for_resource()
            .resource_name(resource_id)
            .send()
            .await?;
        Ok(resp
            .tag_list()
            .iter()
            .filter_map(|t| t.key().map(|k| k.to_string()))
            .collect())
    }

    async fn add_tag(&self, resource_id: &str, tag: &BackupTag) -> Result<()> {
        self.client
            .add_tags_to_resource()
            .resource_name(resource_id)
            .tags(
                rds::types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build(),
            )
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rds::operation::add_tags_to_resource::AddTagsToResourceOutput;
    use aws_sdk_rds::operation::describe_db_instances::DescribeDbInstancesOutput;
    use aws_sdk_rds::operation::list_tags_for_resource::ListTagsForResourceOutput;
    use aws_sdk_rds::types::{DbInstance, Tag};
    use aws_sdk_rds::Client;
    use aws_smithy_mocks::{mock, mock_client, RuleMode};

    const DB1: &str = "arn:aws:rds:us-east-1:123:db:one";
    const DB2: &str = "arn:aws:rds:us-east-1:123:db:two";

    #[tokio::test]
    async fn list_follows_marker_across_pages() {
        let first = mock!(Client::describe_db_instances)
            .match_requests(|req| req.marker().is_none())
            .then_output(|| {
                DescribeDbInstancesOutput::builder()
                    .db_instances(DbInstance::builder().db_instance_arn(DB1).build())
                    .marker("page-2")
                    .build()
            });
        let second = mock!(Client::describe_db_instances)
            .match_requests(|req| req.marker() == Some("page-2"))
            .then_output(|| {
                DescribeDbInstancesOutput::builder()
                    .db_instances(DbInstance::builder().db_instance_arn(DB2).build())
                    .build()
            });
        let client = mock_client!(aws_sdk_rds, RuleMode::MatchAny, [&first, &second]);

        let ids = RdsApi::from_client(client).list().await.unwrap();

        assert_eq!(ids, vec![DB1, DB2]);
    }

    #[tokio::test]
    async fn instance_without_arn_is_an_error() {
        let page = mock!(Client::describe_db_instances).then_output(|| {
            DescribeDbInstancesOutput::builder()
                .db_instances(DbInstance::builder().db_instance_identifier("one").build())
                .build()
        });
        let client = mock_client!(aws_sdk_rds, [&page]);

        let err = RdsApi::from_client(client).list().await.unwrap_err();

        assert!(err.to_string().contains("DBInstanceArn"));
    }

    #[tokio::test]
    async fn reads_tag_keys_by_arn() {
        let tags = mock!(Client::list_tags_for_resource)
            .match_requests(|req| req.resource_name() == Some(DB1))
            .then_output(|| {
                ListTagsForResourceOutput::builder()
                    .tag_list(Tag::builder().key("Backup_Policy").value("weekly").build())
                    .tag_list(Tag::builder().key("env").value("prod").build())
                    .build()
            });
        let client = mock_client!(aws_sdk_rds, [&tags]);

        let keys = RdsApi::from_client(client).tag_keys(DB1).await.unwrap();

        assert_eq!(keys, vec!["Backup_Policy", "env"]);
    }

    #[tokio::test]
    async fn writes_exactly_the_backup_tag() {
        let write = mock!(Client::add_tags_to_resource)
            .match_requests(|req| {
                req.resource_name() == Some(DB1)
                    && req.tags()
                        == [Tag::builder()
                            .key("backup_policy")
                            .value("daily_two_weeks")
                            .build()]
            })
            .then_output(|| AddTagsToResourceOutput::builder().build());
        let client = mock_client!(aws_sdk_rds, [&write]);

        RdsApi::from_client(client)
            .add_tag(DB1, &BackupTag::default())
            .await
            .unwrap();

        assert_eq!(write.num_calls(), 1);
    }
}
