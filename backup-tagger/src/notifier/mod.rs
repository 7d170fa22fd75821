//! Operator notification for resources that received the default backup tag.
//!
//! Every notice is logged first, then mailed. SMTP credentials are read from
//! the secret store on each call; any failure along the way is returned to the
//! scanner, which has already written the tag by then.

mod secrets;
mod smtp;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use crate::config::{BackupTag, TaggerConfig};

pub use secrets::{SecretSource, SecretsManagerSource};
pub use smtp::{MailTransport, SmtpMailer};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_missing_tag(&self, resource_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTagNotice {
    pub subject: String,
    pub body: String,
}

impl MissingTagNotice {
    pub fn new(config: &TaggerConfig, resource_id: &str) -> Self {
        Self {
            subject: config.subject_for(resource_id),
            body: notice_body(&config.backup_tag, resource_id),
        }
    }

    /// Wire form handed to the mail relay.
    pub fn raw(&self) -> String {
        format!("Subject: {}\n\n{}", self.subject, self.body)
    }
}

fn notice_body(tag: &BackupTag, resource_id: &str) -> String {
    format!(
        "The resource with ARN {resource_id} was missing its backup policy tag.\n\
         \n\
         The default tag \"{}: {}\" was added to force this resource to have backups.\n\
         \n\
         Please review if the default backup policy is adequate for this resource. \
         Apply any changes using terraform configuration files by adding tags to \
         the newly created resource.",
        tag.key, tag.value
    )
}

pub struct EmailNotifier {
    config: Arc<TaggerConfig>,
    secrets: Arc<dyn SecretSource>,
    mailer: Arc<dyn MailTransport>,
}

impl EmailNotifier {
    pub fn new(
        config: Arc<TaggerConfig>,
        secrets: Arc<dyn SecretSource>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            config,
            secrets,
            mailer,
        }
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify_missing_tag(&self, resource_id: &str) -> Result<()> {
        let notice = MissingTagNotice::new(&self.config, resource_id);
        info!("{}", notice.body);

        let smtp = &self.config.smtp;
        let user = self.secrets.secret_string(&smtp.user_secret_id).await?;
        let pass = self.secrets.secret_string(&smtp.pass_secret_id).await?;

        self.mailer
            .submit(&user, &pass, &smtp.mail_from, &smtp.mail_to, &notice.raw())
            .await
    }
}
