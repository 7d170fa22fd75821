use aws_config::BehaviorVersion;
use aws_types::region::Region;

use crate::scanners::ResourceKind;

pub const BACKUP_TAG_NAME: &str = "backup_policy";
pub const BACKUP_DEFAULT_VALUE: &str = "daily_two_weeks";

const DEFAULT_REGION: &str = "us-east-1";

/// Marker tag that makes a resource eligible for the AWS Backup selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupTag {
    pub key: String,
    pub value: String,
}

impl Default for BackupTag {
    fn default() -> Self {
        Self {
            key: BACKUP_TAG_NAME.to_string(),
            value: BACKUP_DEFAULT_VALUE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user_secret_id: String,
    pub pass_secret_id: String,
    pub mail_from: String,
    pub mail_to: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "email-smtp.us-east-1.amazonaws.com".to_string(),
            port: 465,
            user_secret_id: "ses/smtp_user".to_string(),
            pass_secret_id: "ses/smtp_pass".to_string(),
            mail_from: "ops-team@intraway.com".to_string(),
            mail_to: "ops-team@intraway.com".to_string(),
        }
    }
}

/// Immutable settings for one tagging run. Built once and handed to the
/// scanners, the notifier and the driver.
#[derive(Debug, Clone)]
pub struct TaggerConfig {
    pub backup_tag: BackupTag,
    pub smtp: SmtpSettings,
    pub rds_region: Option<String>,
    pub ebs_region: Option<String>,
    // efs and dynamodb clients were never pinned to a region; they follow
    // whatever the environment resolves.
    pub efs_region: Option<String>,
    pub dynamodb_region: Option<String>,
    pub secrets_region: Option<String>,
}

impl Default for TaggerConfig {
    fn default() -> Self {
        Self {
            backup_tag: BackupTag::default(),
            smtp: SmtpSettings::default(),
            rds_region: Some(DEFAULT_REGION.to_string()),
            ebs_region: Some(DEFAULT_REGION.to_string()),
            efs_region: None,
            dynamodb_region: None,
            secrets_region: None,
        }
    }
}

impl TaggerConfig {
    pub fn region_for(&self, kind: ResourceKind) -> Option<&str> {
        match kind {
            ResourceKind::Rds => self.rds_region.as_deref(),
            ResourceKind::Ebs => self.ebs_region.as_deref(),
            ResourceKind::Efs => self.efs_region.as_deref(),
            ResourceKind::DynamoDb => self.dynamodb_region.as_deref(),
        }
    }

    pub fn subject_for(&self, resource_id: &str) -> String {
        format!("Default backup policy set for ARN {resource_id}")
    }
}

/// Loads the ambient SDK configuration, pinned to `region` when one is given.
pub async fn sdk_config(region: Option<&str>) -> aws_config::SdkConfig {
    let loader = aws_config::defaults(BehaviorVersion::latest());
    match region {
        Some(r) => loader.region(Region::new(r.to_string())).load().await,
        None => loader.load().await,
    }
}
