use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::address::{Address, Envelope};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use crate::error::TaggerError;

#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Submits an already formatted message. `raw` uses `\n` line endings;
    /// implementations convert them to what their protocol requires.
    async fn submit(&self, user: &str, pass: &str, from: &str, to: &str, raw: &str) -> Result<()>;
}

/// SMTP submission over implicit TLS (SMTPS), one connection per message.
pub struct SmtpMailer {
    host: String,
    port: u16,
}

impl SmtpMailer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

fn parse_address(address: &str) -> Result<Address, TaggerError> {
    address
        .parse::<Address>()
        .map_err(|source| TaggerError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

// SMTP requires CRLF line endings; the relay sees `raw` otherwise unchanged.
fn to_wire(raw: &str) -> Vec<u8> {
    raw.replace("\r\n", "\n").replace('\n', "\r\n").into_bytes()
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn submit(&self, user: &str, pass: &str, from: &str, to: &str, raw: &str) -> Result<()> {
        let envelope = Envelope::new(Some(parse_address(from)?), vec![parse_address(to)?])
            .context("building mail envelope")?;

        let transport: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)
                .with_context(|| format!("preparing TLS relay {}", self.host))?
                .port(self.port)
                .credentials(Credentials::new(user.to_string(), pass.to_string()))
                .build();

        transport
            .send_raw(&envelope, &to_wire(raw))
            .await
            .with_context(|| format!("submitting mail via {}:{}", self.host, self.port))?;
        Ok(())
    }
}
