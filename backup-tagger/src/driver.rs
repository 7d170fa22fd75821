use std::backtrace::BacktraceStatus;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use crate::config::{sdk_config, TaggerConfig};
use crate::notifier::{EmailNotifier, Notifier, SecretsManagerSource, SmtpMailer};
use crate::scanners::build_apis;
use crate::tagger_core::{ResourceApi, Scanner};
use crate::utils::env_or;

const RUN_NAME: &str = "backup_auto_tagging";

/// Caller-supplied invocation metadata. Accepted for interface
/// compatibility with the scheduler; only logged.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub function_name: String,
    pub invoked_at: DateTime<Utc>,
}

impl InvocationContext {
    pub fn from_env() -> Self {
        Self {
            function_name: env_or("AWS_LAMBDA_FUNCTION_NAME", RUN_NAME),
            invoked_at: Utc::now(),
        }
    }
}

pub struct Driver {
    scanners: Vec<Scanner>,
}

impl Driver {
    pub fn new(
        config: &TaggerConfig,
        apis: Vec<Arc<dyn ResourceApi>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let scanners = apis
            .into_iter()
            .map(|api| Scanner::new(api, config.backup_tag.clone(), notifier.clone()))
            .collect();
        Self { scanners }
    }

    /// Wires the AWS-backed scanners and the e-mail notifier.
    pub async fn from_aws(config: Arc<TaggerConfig>) -> Self {
        let apis = build_apis(&config).await;
        let secrets_conf = sdk_config(config.secrets_region.as_deref()).await;
        let notifier = EmailNotifier::new(
            config.clone(),
            Arc::new(SecretsManagerSource::new(&secrets_conf)),
            Arc::new(SmtpMailer::new(config.smtp.host.clone(), config.smtp.port)),
        );
        Self::new(&config, apis, Arc::new(notifier))
    }

    /// Runs every scanner once. A failing scanner is logged and does not stop
    /// the others; the result is true only when none failed.
    pub async fn run(&self) -> bool {
        info!("Start {RUN_NAME}");
        let mut success = true;

        for scanner in &self.scanners {
            if let Err(e) = scanner.scan_and_tag().await {
                for line in failure_lines(scanner.name(), &e) {
                    error!("{line}");
                }
                success = false;
            }
        }

        info!("End {RUN_NAME}");
        success
    }

    /// One scheduled invocation. Neither argument affects the run.
    pub async fn handle(&self, event: serde_json::Value, context: InvocationContext) -> bool {
        debug!(
            "invoked as {} at {} with event {event}",
            context.function_name, context.invoked_at
        );
        self.run().await
    }
}

/// Breaks a scanner failure into single-line records: the headline, one
/// line per underlying cause, then the captured backtrace frames.
fn failure_lines(scanner: &str, err: &anyhow::Error) -> Vec<String> {
    let mut lines = vec![format!("{scanner} raised an error: {err}")];
    lines.extend(err.chain().skip(1).map(|cause| format!("caused by: {cause}")));

    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        lines.extend(
            backtrace
                .to_string()
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string),
        );
    }
    lines
}

/// Scheduler entry point: builds the AWS-backed driver from the fixed
/// configuration and runs it once.
pub async fn handle(event: serde_json::Value, context: InvocationContext) -> bool {
    let driver = Driver::from_aws(Arc::new(TaggerConfig::default())).await;
    driver.handle(event, context).await
}
