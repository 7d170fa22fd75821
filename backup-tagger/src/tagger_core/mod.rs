use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::BackupTag;
use crate::notifier::Notifier;

// Per-kind provider calls. Each implementation maps the three steps onto
// its own list / tag-read / tag-write API and identifier.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    fn name(&self) -> &'static str;

    /// Identifiers of every resource of this kind, all pages.
    async fn list(&self) -> Result<Vec<String>>;

    /// Maps a listed identifier to the one tags are read and written by.
    /// Runs inside the per-resource loop, so a failure only affects the
    /// resources from this one onwards.
    async fn resolve_id(&self, listed: &str) -> Result<String> {
        Ok(listed.to_string())
    }

    /// Current tag keys of one resource, as returned by the provider.
    async fn tag_keys(&self, resource_id: &str) -> Result<Vec<String>>;

    async fn add_tag(&self, resource_id: &str, tag: &BackupTag) -> Result<()>;
}

/// True when any key matches the marker key, ignoring case.
pub fn has_marker<S: AsRef<str>>(keys: &[S], marker_key: &str) -> bool {
    let marker = marker_key.to_lowercase();
    keys.iter().any(|k| k.as_ref().to_lowercase() == marker)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub inspected: usize,
    pub tagged: usize,
}

/// One scan-and-tag pass over a single resource kind.
pub struct Scanner {
    api: Arc<dyn ResourceApi>,
    tag: BackupTag,
    notifier: Arc<dyn Notifier>,
}

impl Scanner {
    pub fn new(api: Arc<dyn ResourceApi>, tag: BackupTag, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, tag, notifier }
    }

    pub fn name(&self) -> &'static str {
        self.api.name()
    }

    /// Tags every resource that lacks the marker and notifies once per tag.
    ///
    /// The first failing call aborts the pass. Tags written before the
    /// failure stay in place, including the one whose notification failed.
    pub async fn scan_and_tag(&self) -> Result<ScanSummary> {
        let name = self.api.name();
        let ids = self
            .api
            .list()
            .await
            .with_context(|| format!("{name}: listing resources"))?;

        let mut summary = ScanSummary::default();
        for listed in ids {
            summary.inspected += 1;

            let id = self
                .api
                .resolve_id(&listed)
                .await
                .with_context(|| format!("{name}: resolving {listed}"))?;

            let keys = self
                .api
                .tag_keys(&id)
                .await
                .with_context(|| format!("{name}: reading tags of {id}"))?;
            if has_marker(&keys, &self.tag.key) {
                debug!("{name}: {id} already carries {}", self.tag.key);
                continue;
            }

            self.api
                .add_tag(&id, &self.tag)
                .await
                .with_context(|| format!("{name}: tagging {id}"))?;
            summary.tagged += 1;

            self.notifier
                .notify_missing_tag(&id)
                .await
                .with_context(|| format!("{name}: notifying about {id}"))?;
        }

        info!(
            "{name}: {} resources inspected, {} tagged",
            summary.inspected, summary.tagged
        );
        Ok(summary)
    }
}
