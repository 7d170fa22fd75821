//! In-memory stand-ins for the provider, secret store and mail relay.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::config::BackupTag;
use crate::notifier::{MailTransport, Notifier, SecretSource};
use crate::tagger_core::{has_marker, ResourceApi};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    List,
    Resolve(String),
    ReadTags(String),
    AddTag(String),
}

pub struct FakeResourceApi {
    name: &'static str,
    order: Vec<String>,
    tags: Mutex<HashMap<String, Vec<String>>>,
    writes: Mutex<Vec<(String, String, String)>>,
    faults: Vec<Fault>,
    list_calls: Mutex<usize>,
}

impl FakeResourceApi {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            order: Vec::new(),
            tags: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            faults: Vec::new(),
            list_calls: Mutex::new(0),
        }
    }

    pub fn with_resource(mut self, id: &str, keys: &[&str]) -> Self {
        self.order.push(id.to_string());
        self.tags
            .get_mut()
            .unwrap()
            .insert(id.to_string(), keys.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.faults.push(fault);
        self
    }

    pub fn writes(&self) -> Vec<(String, String, String)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }

    pub fn has_marker(&self, id: &str) -> bool {
        self.tags
            .lock()
            .unwrap()
            .get(id)
            .map(|keys| has_marker(keys, "backup_policy"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ResourceApi for FakeResourceApi {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn list(&self) -> Result<Vec<String>> {
        *self.list_calls.lock().unwrap() += 1;
        if self.faults.contains(&Fault::List) {
            bail!("injected list failure");
        }
        Ok(self.order.clone())
    }

    async fn resolve_id(&self, listed: &str) -> Result<String> {
        if self.faults.contains(&Fault::Resolve(listed.to_string())) {
            bail!("injected resolve failure");
        }
        Ok(listed.to_string())
    }

    async fn tag_keys(&self, resource_id: &str) -> Result<Vec<String>> {
        if self.faults.contains(&Fault::ReadTags(resource_id.to_string())) {
            bail!("injected tag read failure");
        }
        self.tags
            .lock()
            .unwrap()
            .get(resource_id)
            .cloned()
            .ok_or_else(|| anyhow!("unknown resource {resource_id}"))
    }

    async fn add_tag(&self, resource_id: &str, tag: &BackupTag) -> Result<()> {
        if self.faults.contains(&Fault::AddTag(resource_id.to_string())) {
            bail!("injected tag write failure");
        }
        self.tags
            .lock()
            .unwrap()
            .entry(resource_id.to_string())
            .or_default()
            .push(tag.key.clone());
        self.writes.lock().unwrap().push((
            resource_id.to_string(),
            tag.key.clone(),
            tag.value.clone(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    fail: bool,
    notified: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            notified: Mutex::new(Vec::new()),
        }
    }

    pub fn notified(&self) -> Vec<String> {
        self.notified.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_missing_tag(&self, resource_id: &str) -> Result<()> {
        if self.fail {
            bail!("injected notification failure");
        }
        self.notified.lock().unwrap().push(resource_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSecrets {
    values: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl FakeSecrets {
    pub fn with(mut self, id: &str, value: &str) -> Self {
        self.values.insert(id.to_string(), value.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretSource for FakeSecrets {
    async fn secret_string(&self, secret_id: &str) -> Result<String> {
        self.lookups.lock().unwrap().push(secret_id.to_string());
        self.values
            .get(secret_id)
            .cloned()
            .ok_or_else(|| anyhow!("secret {secret_id} not found"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub user: String,
    pub pass: String,
    pub from: String,
    pub to: String,
    pub raw: String,
}

#[derive(Default)]
pub struct RecordingMailer {
    fail: bool,
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn submit(&self, user: &str, pass: &str, from: &str, to: &str, raw: &str) -> Result<()> {
        if self.fail {
            bail!("injected smtp failure");
        }
        self.sent.lock().unwrap().push(SentMail {
            user: user.to_string(),
            pass: pass.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            raw: raw.to_string(),
        });
        Ok(())
    }
}
